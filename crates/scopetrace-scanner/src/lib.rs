//! JavaScript tokenizer for the scopetrace engine.
//!
//! This crate provides the lexical analysis phase:
//! - `Token`, `TokenKind`, `Keyword`, `Punctuation` - Token types
//! - `Scanner` - Lazy, restartable tokenizer over a source string
//! - `char_codes` - Character classification utilities

pub mod char_codes;
pub mod error;
pub mod scanner_impl;
pub mod token;

pub use error::{LexError, LexErrorKind};
pub use scanner_impl::{Scanner, tokenize, tokenize_with_limit};
pub use token::{Keyword, Punctuation, Token, TokenFlags, TokenKind};

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod scanner_tests;
