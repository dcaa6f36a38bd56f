//! Lexical errors.

use serde::Serialize;
use thiserror::Error;

/// Why tokenization stopped.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated template literal")]
    UnterminatedTemplate,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("unterminated regular expression literal")]
    UnterminatedRegex,
    #[error("unexpected character {character:?}")]
    UnexpectedCharacter { character: char },
    #[error("token limit of {limit} exceeded")]
    TokenLimitExceeded { limit: usize },
}

/// A tokenizer failure at a byte offset.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[error("{reason} at offset {position}")]
pub struct LexError {
    /// Byte offset where the offending token starts.
    pub position: u32,
    pub reason: LexErrorKind,
}

impl LexError {
    pub fn new(position: u32, reason: LexErrorKind) -> Self {
        LexError { position, reason }
    }
}
