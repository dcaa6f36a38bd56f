//! Read-only queries over a completed [`Analysis`].

use scopetrace_binder::Occurrence;
use scopetrace_common::TextSpan;
use scopetrace_parser::{Ancestors, Binding, BindingId, ScopeId, ScopeNode};
use serde::Serialize;
use thiserror::Error;

use crate::analysis::Analysis;

#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NotFoundError {
    #[error("no scope with id {id}")]
    Scope { id: u32 },
    #[error("no binding with id {id}")]
    Binding { id: u32 },
    #[error("offset {offset} is past the end of the source ({len} bytes)")]
    Offset { offset: u32, len: u32 },
}

impl Analysis {
    fn scope_or_err(&self, id: ScopeId) -> Result<&ScopeNode, NotFoundError> {
        self.tree
            .scope(id)
            .ok_or(NotFoundError::Scope { id: id.0 })
    }

    /// Bindings declared directly in `scope`, in declaration order.
    pub fn variables_in(&self, scope: ScopeId) -> Result<Vec<&Binding>, NotFoundError> {
        let node = self.scope_or_err(scope)?;
        Ok(node
            .declarations
            .values()
            .filter_map(|&id| self.tree.binding(id))
            .collect())
    }

    /// Innermost scope whose range contains `offset`.
    ///
    /// Where a scope ends exactly at the offset another one starts, the later
    /// scope wins.
    pub fn scope_containing(&self, offset: u32) -> Result<&ScopeNode, NotFoundError> {
        let len = self.tree.source_len;
        if offset > len {
            return Err(NotFoundError::Offset { offset, len });
        }

        let mut current = self.tree.root();
        while let Some(child) = current
            .children
            .iter()
            .rev()
            .filter_map(|&id| self.tree.scope(id))
            .find(|child| child.range.contains(offset))
        {
            current = child;
        }
        Ok(current)
    }

    /// Every occurrence resolved to `binding`, in source order.
    pub fn occurrences_of(&self, binding: BindingId) -> Result<Vec<&Occurrence>, NotFoundError> {
        let ids = self
            .bound
            .occurrences_of(binding)
            .ok_or(NotFoundError::Binding { id: binding.0 })?;
        Ok(ids
            .iter()
            .filter_map(|&id| self.bound.occurrence(id))
            .collect())
    }

    pub fn declaration_of(&self, occurrence: &Occurrence) -> Option<&Binding> {
        occurrence.resolved.and_then(|id| self.tree.binding(id))
    }

    /// Occurrence whose name token touches `offset` (start to end inclusive).
    pub fn occurrence_at(&self, offset: u32) -> Option<&Occurrence> {
        let occurrences = self.occurrences();
        let after = occurrences.partition_point(|o| o.span.start <= offset);
        occurrences[..after]
            .last()
            .filter(|o| o.span.contains(offset))
    }

    /// Binding under the cursor, either at one of its declaration sites or
    /// through a resolved occurrence.
    pub fn binding_at(&self, offset: u32) -> Option<&Binding> {
        self.tree
            .bindings
            .iter()
            .find(|b| b.declaration_spans().any(|span| span.contains(offset)))
            .or_else(|| {
                self.occurrence_at(offset)
                    .and_then(|o| self.declaration_of(o))
            })
    }

    /// Spans to highlight for the name under the cursor, in source order.
    ///
    /// For a binding: its declarations and every occurrence. For an unresolved
    /// name: every unresolved occurrence with the same name.
    pub fn highlight(&self, offset: u32) -> Vec<TextSpan> {
        let mut spans = if let Some(binding) = self.binding_at(offset) {
            let mut spans: Vec<TextSpan> = binding.declaration_spans().collect();
            if let Some(ids) = self.bound.occurrences_of(binding.id) {
                spans.extend(
                    ids.iter()
                        .filter_map(|&id| self.bound.occurrence(id))
                        .map(|o| o.span),
                );
            }
            spans
        } else if let Some(hovered) = self.occurrence_at(offset) {
            self.unresolved()
                .filter(|o| o.name == hovered.name)
                .map(|o| o.span)
                .collect()
        } else {
            Vec::new()
        };
        spans.sort_unstable();
        spans
    }

    /// Occurrences no enclosing scope declares (implicit globals).
    pub fn unresolved(&self) -> impl Iterator<Item = &Occurrence> {
        self.bound.unresolved()
    }

    /// `scope` and its ancestors, innermost first.
    pub fn scope_chain(&self, scope: ScopeId) -> Result<Ancestors<'_>, NotFoundError> {
        self.scope_or_err(scope)?;
        Ok(self.tree.ancestors(scope))
    }
}
