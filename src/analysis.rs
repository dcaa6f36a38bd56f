//! The `analyze` pipeline: tokenize, build scopes, bind.

use rayon::prelude::*;
use scopetrace_binder::{BindResult, Occurrence, bind};
use scopetrace_common::{LineMap, TextSpan};
use scopetrace_parser::{
    Binding, BindingId, ParseError, ScopeId, ScopeNode, ScopeTree, build_scopes_with_options,
};
use scopetrace_scanner::{LexError, tokenize_with_limit};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, debug, span};

use crate::options::AnalyzeOptions;

/// Failure of the analysis pipeline. The first error wins; no partial
/// tree is produced.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "stage", rename_all = "camelCase")]
pub enum AnalyzeError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl AnalyzeError {
    /// Byte offset the error was reported at.
    pub fn position(&self) -> u32 {
        match self {
            AnalyzeError::Lex(err) => err.position,
            AnalyzeError::Parse(err) => err.position,
        }
    }
}

/// A resolved program: the scope tree plus every occurrence bound to its
/// declaration.
///
/// Immutable once built. All queries (see the `query` module) are pure reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Analysis {
    pub(crate) source: String,
    pub(crate) line_map: LineMap,
    pub(crate) tree: ScopeTree,
    pub(crate) bound: BindResult,
}

impl Analysis {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tree(&self) -> &ScopeTree {
        &self.tree
    }

    pub fn line_map(&self) -> &LineMap {
        &self.line_map
    }

    pub fn root(&self) -> &ScopeNode {
        self.tree.root()
    }

    pub fn scopes(&self) -> &[ScopeNode] {
        &self.tree.scopes
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.tree.bindings
    }

    /// Occurrences in source order.
    pub fn occurrences(&self) -> &[Occurrence] {
        &self.bound.occurrences
    }

    pub fn scope(&self, id: ScopeId) -> Option<&ScopeNode> {
        self.tree.scope(id)
    }

    pub fn binding(&self, id: BindingId) -> Option<&Binding> {
        self.tree.binding(id)
    }

    /// Source text covered by `span`, empty when the span is out of range.
    pub fn text(&self, span: TextSpan) -> &str {
        self.source
            .get(span.start as usize..span.end as usize)
            .unwrap_or_default()
    }
}

pub fn analyze(source: &str) -> Result<Analysis, AnalyzeError> {
    analyze_with_options(source, &AnalyzeOptions::default())
}

pub fn analyze_with_options(
    source: &str,
    options: &AnalyzeOptions,
) -> Result<Analysis, AnalyzeError> {
    let _span = span!(Level::DEBUG, "analyze", bytes = source.len()).entered();

    let tokens = tokenize_with_limit(source, options.max_tokens)?;
    debug!(tokens = tokens.len(), "tokenized");

    let tree = build_scopes_with_options(&tokens, options.builder_options())?;
    let bound = bind(&tree);

    Ok(Analysis {
        source: source.to_string(),
        line_map: LineMap::build(source),
        tree,
        bound,
    })
}

/// Analyze independent sources in parallel. Results keep the input order.
pub fn analyze_batch<S>(sources: &[S], options: &AnalyzeOptions) -> Vec<Result<Analysis, AnalyzeError>>
where
    S: AsRef<str> + Sync,
{
    sources
        .par_iter()
        .map(|source| analyze_with_options(source.as_ref(), options))
        .collect()
}
