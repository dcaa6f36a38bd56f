//! scopetrace - lexical scope resolution for JavaScript source text.
//!
//! The pipeline lives in the workspace crates:
//!
//! - `scopetrace-scanner`: source text to tokens
//! - `scopetrace-parser`: tokens to a `ScopeTree` of scopes, bindings and references
//! - `scopetrace-binder`: references to resolved occurrences
//!
//! This crate ties them together behind [`analyze`] and exposes the query
//! interface on [`Analysis`], the JSON report, and the CLI driver.

pub mod analysis;
pub mod cli;
pub mod options;
pub mod query;
pub mod report;
pub mod tracing_config;

pub use analysis::{Analysis, AnalyzeError, analyze, analyze_batch, analyze_with_options};
pub use options::AnalyzeOptions;
pub use query::NotFoundError;
pub use report::{ScopeReport, SourceRange, UnresolvedReport, VariableReport};

pub use scopetrace_binder::{Occurrence, OccurrenceId};
pub use scopetrace_common::{LineMap, Position, TextSpan};
pub use scopetrace_parser::{
    Binding, BindingId, DeclKind, ParseError, ParseErrorKind, ScopeId, ScopeKind, ScopeNode,
    ScopeTree,
};
pub use scopetrace_scanner::{LexError, LexErrorKind};

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod query_tests;
#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod report_tests;
