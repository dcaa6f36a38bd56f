//! Binder state: scope-chain resolution over a finished [`ScopeTree`].

use rustc_hash::FxHashMap;
use scopetrace_parser::{BindingId, ScopeId, ScopeTree};
use smallvec::SmallVec;
use tracing::{Level, debug, span, trace};

use crate::occurrence::{Occurrence, OccurrenceId};

/// Output of [`BinderState::bind`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindResult {
    /// One occurrence per recorded reference, in source order.
    pub occurrences: Vec<Occurrence>,
    /// Occurrences of each binding, indexed by `BindingId`.
    pub bindings: Vec<SmallVec<[OccurrenceId; 4]>>,
}

impl BindResult {
    #[inline]
    pub fn occurrence(&self, id: OccurrenceId) -> Option<&Occurrence> {
        self.occurrences.get(id.index())
    }

    /// `None` when `binding` is not a binding of the analyzed tree.
    #[inline]
    pub fn occurrences_of(&self, binding: BindingId) -> Option<&[OccurrenceId]> {
        self.bindings.get(binding.index()).map(|ids| ids.as_slice())
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &Occurrence> {
        self.occurrences.iter().filter(|o| !o.is_resolved())
    }
}

pub struct BinderState<'a> {
    tree: &'a ScopeTree,
    /// Memoised lookups, hits and misses alike.
    resolved_cache: FxHashMap<(ScopeId, &'a str), Option<BindingId>>,
}

impl<'a> BinderState<'a> {
    pub fn new(tree: &'a ScopeTree) -> Self {
        BinderState {
            tree,
            resolved_cache: FxHashMap::default(),
        }
    }

    /// Resolve `name` as seen from `scope`: the first scope on the chain to
    /// the global scope that declares it wins.
    pub fn resolve(&mut self, scope: ScopeId, name: &'a str) -> Option<BindingId> {
        if let Some(&cached) = self.resolved_cache.get(&(scope, name)) {
            return cached;
        }

        let result = 'resolve: {
            for (depth, node) in self.tree.ancestors(scope).enumerate() {
                if let Some(binding) = node.lookup_local(name) {
                    trace!(name, scope = node.id.0, depth, binding = binding.0, "resolved");
                    break 'resolve Some(binding);
                }
            }
            trace!(name, scope = scope.0, "unresolved");
            None
        };

        self.resolved_cache.insert((scope, name), result);
        result
    }

    pub fn bind(mut self) -> BindResult {
        let tree = self.tree;
        let _span = span!(Level::DEBUG, "bind", references = tree.references.len()).entered();

        let mut occurrences = Vec::with_capacity(tree.references.len());
        let mut bindings: Vec<SmallVec<[OccurrenceId; 4]>> =
            vec![SmallVec::new(); tree.bindings.len()];

        for (idx, reference) in tree.references.iter().enumerate() {
            let id = OccurrenceId(idx as u32);
            let resolved = self.resolve(reference.scope, &reference.name);
            if let Some(binding) = resolved
                && let Some(slot) = bindings.get_mut(binding.index())
            {
                slot.push(id);
            }
            occurrences.push(Occurrence {
                id,
                name: reference.name.clone(),
                span: reference.span,
                scope: reference.scope,
                resolved,
            });
        }

        debug!(
            occurrences = occurrences.len(),
            unresolved = occurrences.iter().filter(|o| !o.is_resolved()).count(),
            cache_entries = self.resolved_cache.len(),
            "bind complete"
        );

        BindResult {
            occurrences,
            bindings,
        }
    }
}
