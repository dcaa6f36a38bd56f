//! Scope tree types.
//!
//! Scopes, bindings and references are stored in flat arenas owned by the
//! [`ScopeTree`] and addressed by index newtypes. A scope's `parent` is an
//! index, never an owning pointer, so the whole tree is freed as a unit.

use indexmap::IndexMap;
use scopetrace_common::TextSpan;
use scopetrace_common::limits::MAX_SCOPE_WALK_ITERATIONS;
use serde::Serialize;

/// Index of a scope in [`ScopeTree::scopes`]. The global scope is always `ScopeId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a binding in [`ScopeTree::bindings`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BindingId(pub u32);

impl BindingId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScopeKind {
    Global,
    Function,
    Block,
    Loop,
}

impl ScopeKind {
    /// `var` and `function` declarations hoist to the nearest scope of this kind.
    #[inline]
    pub fn is_function_boundary(self) -> bool {
        matches!(self, ScopeKind::Global | ScopeKind::Function)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScopeKind::Global => "global",
            ScopeKind::Function => "function",
            ScopeKind::Block => "block",
            ScopeKind::Loop => "loop",
        }
    }
}

/// How a binding was declared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclKind {
    Var,
    Let,
    Const,
    Param,
    Function,
    CatchParam,
}

impl DeclKind {
    /// Function-scoped declarations (`var`, `function`).
    #[inline]
    pub fn hoists(self) -> bool {
        matches!(self, DeclKind::Var | DeclKind::Function)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Var => "var",
            DeclKind::Let => "let",
            DeclKind::Const => "const",
            DeclKind::Param => "param",
            DeclKind::Function => "function",
            DeclKind::CatchParam => "catch",
        }
    }
}

/// A name declared in a scope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub id: BindingId,
    pub name: String,
    pub kind: DeclKind,
    /// Span of the declaring name token. For re-declarations this is the latest one.
    pub declared_at: TextSpan,
    /// Earlier declaring name tokens of a re-declared name, in source order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub earlier_declarations: Vec<TextSpan>,
    /// The scope that owns this binding.
    pub scope: ScopeId,
}

impl Binding {
    /// Every declaring name token, in source order.
    pub fn declaration_spans(&self) -> impl Iterator<Item = TextSpan> + '_ {
        self.earlier_declarations
            .iter()
            .copied()
            .chain(std::iter::once(self.declared_at))
    }
}

/// An identifier use that is neither a declaration site nor a property name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub name: String,
    pub span: TextSpan,
    /// Innermost scope the identifier textually appears in.
    pub scope: ScopeId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeNode {
    pub id: ScopeId,
    pub kind: ScopeKind,
    /// Display name: the function name, `if-block`, `for-block`, `Global`, ...
    pub label: String,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    /// Declarations in insertion order; at most one binding per name.
    pub declarations: IndexMap<String, BindingId>,
    pub range: TextSpan,
}

impl ScopeNode {
    pub(crate) fn new(
        id: ScopeId,
        kind: ScopeKind,
        label: String,
        parent: Option<ScopeId>,
        start: u32,
    ) -> Self {
        ScopeNode {
            id,
            kind,
            label,
            parent,
            children: Vec::new(),
            declarations: IndexMap::new(),
            range: TextSpan::at(start),
        }
    }

    #[inline]
    pub fn is_global(&self) -> bool {
        self.kind == ScopeKind::Global
    }

    /// Binding declared directly in this scope under `name`.
    #[inline]
    pub fn lookup_local(&self, name: &str) -> Option<BindingId> {
        self.declarations.get(name).copied()
    }
}

/// The output of the scope builder.
///
/// Immutable once built: the binder and the query layer only read it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeTree {
    pub scopes: Vec<ScopeNode>,
    pub bindings: Vec<Binding>,
    /// Identifier references in source order.
    pub references: Vec<Reference>,
    /// Length in bytes of the analyzed source.
    pub source_len: u32,
}

impl ScopeTree {
    #[inline]
    pub fn root(&self) -> &ScopeNode {
        &self.scopes[ScopeId::GLOBAL.index()]
    }

    #[inline]
    pub fn scope(&self, id: ScopeId) -> Option<&ScopeNode> {
        self.scopes.get(id.index())
    }

    #[inline]
    pub fn binding(&self, id: BindingId) -> Option<&Binding> {
        self.bindings.get(id.index())
    }

    /// Number of scopes, the global scope included.
    #[inline]
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// The scope and its ancestors, innermost first, ending with the global scope.
    pub fn ancestors(&self, id: ScopeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.scope(id).map(|s| s.id),
            steps: 0,
        }
    }

    /// Nearest `Function` or `Global` scope enclosing (or equal to) `id`.
    pub fn function_scope_of(&self, id: ScopeId) -> ScopeId {
        self.ancestors(id)
            .find(|scope| scope.kind.is_function_boundary())
            .map(|scope| scope.id)
            .unwrap_or(ScopeId::GLOBAL)
    }

    /// Scopes in depth-first pre-order (source order).
    pub fn preorder(&self) -> Vec<ScopeId> {
        let mut order = Vec::with_capacity(self.scopes.len());
        if self.scopes.is_empty() {
            return order;
        }
        let mut stack = vec![ScopeId::GLOBAL];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(scope) = self.scope(id) {
                stack.extend(scope.children.iter().rev().copied());
            }
        }
        order
    }

    /// Depth of a scope below the global scope (global is 0).
    pub fn depth(&self, id: ScopeId) -> usize {
        self.ancestors(id).count().saturating_sub(1)
    }
}

/// Iterator over a scope chain, see [`ScopeTree::ancestors`].
pub struct Ancestors<'a> {
    tree: &'a ScopeTree,
    next: Option<ScopeId>,
    steps: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ScopeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let scope = self.tree.scope(self.next?)?;
        self.steps += 1;
        self.next = if self.steps >= MAX_SCOPE_WALK_ITERATIONS {
            None
        } else {
            scope.parent
        };
        Some(scope)
    }
}
