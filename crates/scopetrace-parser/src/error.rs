//! Scope builder errors.

use serde::Serialize;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParseErrorKind {
    /// A closing `}`, `)` or `]` with no matching opener.
    #[error("unbalanced `{found}`")]
    UnbalancedBrace { found: String },
    #[error("expected {expected}, found {found}")]
    Unexpected { expected: String, found: String },
    /// End of input reached while a scope was still open.
    #[error("unterminated scope opened at offset {opened_at}")]
    UnterminatedScope { opened_at: u32 },
    /// `if (x) let y;` and friends.
    #[error("lexical declaration cannot appear in a single-statement context")]
    LexicalDeclarationInStatementPosition,
    #[error("{feature} are not supported")]
    Unsupported { feature: &'static str },
    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: u32 },
    #[error("token stream does not end with an end-of-input token")]
    MissingEndOfInput,
}

/// A scope builder failure at a byte offset.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[error("{reason} at offset {position}")]
pub struct ParseError {
    pub position: u32,
    pub reason: ParseErrorKind,
}

impl ParseError {
    pub fn new(position: u32, reason: ParseErrorKind) -> Self {
        ParseError { position, reason }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
