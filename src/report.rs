//! Serializable snapshot of an analysis, as emitted by `scopetrace --format json`.

use scopetrace_common::{Position, TextSpan};
use scopetrace_parser::{DeclKind, ScopeKind, ScopeNode};
use serde::Serialize;

use crate::analysis::Analysis;

/// A byte range with its 0-indexed line/column endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRange {
    pub start: u32,
    pub end: u32,
    pub start_position: Position,
    pub end_position: Position,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableReport {
    pub id: u32,
    pub name: String,
    pub kind: DeclKind,
    pub declared_at: SourceRange,
    pub occurrences: Vec<SourceRange>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedReport {
    pub name: String,
    pub range: SourceRange,
}

/// One scope with its variables and nested scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeReport {
    pub id: u32,
    pub kind: ScopeKind,
    pub label: String,
    pub range: SourceRange,
    pub variables: Vec<VariableReport>,
    /// Unresolved occurrences whose innermost scope is this one.
    pub unresolved: Vec<UnresolvedReport>,
    pub children: Vec<ScopeReport>,
}

impl Analysis {
    pub fn source_range(&self, span: TextSpan) -> SourceRange {
        let (start_position, end_position) = self.line_map.span_positions(span, &self.source);
        SourceRange {
            start: span.start,
            end: span.end,
            start_position,
            end_position,
        }
    }

    /// Nested report rooted at the global scope.
    pub fn to_report(&self) -> ScopeReport {
        self.scope_report(self.root())
    }

    fn scope_report(&self, scope: &ScopeNode) -> ScopeReport {
        let variables = scope
            .declarations
            .values()
            .filter_map(|&id| self.binding(id))
            .map(|binding| VariableReport {
                id: binding.id.0,
                name: binding.name.clone(),
                kind: binding.kind,
                declared_at: self.source_range(binding.declared_at),
                occurrences: self
                    .occurrences_of(binding.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|o| self.source_range(o.span))
                    .collect(),
            })
            .collect();

        let unresolved = self
            .unresolved()
            .filter(|o| o.scope == scope.id)
            .map(|o| UnresolvedReport {
                name: o.name.clone(),
                range: self.source_range(o.span),
            })
            .collect();

        let children = scope
            .children
            .iter()
            .filter_map(|&id| self.scope(id))
            .map(|child| self.scope_report(child))
            .collect();

        ScopeReport {
            id: scope.id.0,
            kind: scope.kind,
            label: scope.label.clone(),
            range: self.source_range(scope.range),
            variables,
            unresolved,
            children,
        }
    }
}
