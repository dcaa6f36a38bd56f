use scopetrace_common::TextSpan;
use scopetrace_parser::{BindingId, ScopeId};
use serde::Serialize;

/// Index of an occurrence in [`BindResult::occurrences`](crate::BindResult).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OccurrenceId(pub u32);

impl OccurrenceId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A resolved (or unresolved) use of a name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub id: OccurrenceId,
    pub name: String,
    pub span: TextSpan,
    /// Innermost enclosing scope.
    pub scope: ScopeId,
    /// `None` for implicit globals and undeclared names.
    pub resolved: Option<BindingId>,
}

impl Occurrence {
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}
