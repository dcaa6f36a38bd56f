//! Scanner implementation - the lexical analyzer.
//!
//! `Scanner` walks the source once, byte by byte over the ASCII structure of
//! JavaScript, and yields `Token`s lazily. Comment bodies, string bodies and
//! template bodies are consumed whole, so braces and keywords inside them
//! never reach the scope builder.

use std::iter::FusedIterator;

use memchr::{memchr2, memmem};
use scopetrace_common::TextSpan;
use scopetrace_common::limits::TOKENS_PER_BYTE_HINT;

use crate::char_codes::{
    is_identifier_part, is_identifier_start, is_line_break, is_numeric_part, is_whitespace,
};
use crate::error::{LexError, LexErrorKind};
use crate::token::{Keyword, Punctuation, Token, TokenFlags, TokenKind};

/// Punctuators, longest first so that a prefix scan is maximal munch.
const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "**", "<<", ">>", "{", "}", "(", ")", "[", "]", ";", ",", ".", ":", "?", "=",
    "<", ">", "+", "-", "*", "/", "%", "&", "|", "^", "!", "~",
];

/// Tokenize the whole source, stopping at the first lexical error.
///
/// The returned vector always ends with a `TokenKind::EndOfFile` token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    tokenize_with_limit(source, None)
}

/// Like [`tokenize`], failing with `TokenLimitExceeded` once more than
/// `max_tokens` tokens (comments included, end-of-input excluded) are produced.
pub fn tokenize_with_limit(source: &str, max_tokens: Option<usize>) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::with_capacity(source.len() / TOKENS_PER_BYTE_HINT + 1);
    for token in Scanner::with_limit(source, max_tokens) {
        tokens.push(token?);
    }
    Ok(tokens)
}

/// Lazy tokenizer over a borrowed source string.
///
/// Iteration yields every token including comments, then one `EndOfFile`
/// token, then `None`. After an error the iterator is exhausted.
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    max_tokens: Option<usize>,
    emitted: usize,
    /// The last significant token can end an expression, so a `/` here is division.
    after_operand: bool,
    /// A line break was crossed inside trivia since the last significant token.
    pending_line_break: bool,
    /// The last two significant token kinds, most recent first.
    recent: [Option<TokenKind>; 2],
    /// One entry per open `(`: whether it starts an `if` / `while` / `for` / `with` header.
    parens: Vec<bool>,
    /// One entry per open `{`: whether it opens a statement block.
    braces: Vec<bool>,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_limit(source, None)
    }

    pub fn with_limit(source: &'a str, max_tokens: Option<usize>) -> Self {
        Scanner {
            source,
            pos: 0,
            max_tokens,
            emitted: 0,
            after_operand: false,
            pending_line_break: false,
            recent: [None; 2],
            parens: Vec::new(),
            braces: Vec::new(),
            finished: false,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Restart from the beginning of the source.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.emitted = 0;
        self.after_operand = false;
        self.pending_line_break = false;
        self.recent = [None; 2];
        self.parens.clear();
        self.braces.clear();
        self.finished = false;
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    #[inline]
    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + offset).copied()
    }

    #[inline]
    fn advance(&mut self, count: usize) {
        self.pos = (self.pos + count).min(self.source.len());
    }

    fn error(&self, position: usize, reason: LexErrorKind) -> LexError {
        LexError::new(position as u32, reason)
    }

    /// Skip whitespace and line terminators; report whether a line break was crossed.
    fn skip_whitespace(&mut self) -> bool {
        let mut line_break = false;
        while let Some(ch) = self.source[self.pos..].chars().next() {
            if is_line_break(ch) {
                line_break = true;
            } else if !is_whitespace(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        line_break
    }

    /// Scan the next token.
    pub fn scan(&mut self) -> Result<Token, LexError> {
        let line_break = self.skip_whitespace() || self.pending_line_break;
        let mut flags = if line_break {
            TokenFlags::PRECEDING_LINE_BREAK
        } else {
            TokenFlags::empty()
        };
        let start = self.pos;

        let Some(byte) = self.peek() else {
            self.pending_line_break = false;
            return Ok(self.make(TokenKind::EndOfFile, start, flags));
        };

        if let Some(limit) = self.max_tokens {
            if self.emitted >= limit {
                return Err(self.error(start, LexErrorKind::TokenLimitExceeded { limit }));
            }
        }

        let next = self.peek_at(1);
        let kind = match byte {
            b'#' if start == 0 && next == Some(b'!') => {
                // hashbang
                self.scan_line_comment();
                TokenKind::Comment
            }
            b'/' if next == Some(b'/') => {
                self.scan_line_comment();
                TokenKind::Comment
            }
            b'/' if next == Some(b'*') => {
                self.scan_block_comment(start)?;
                flags |= TokenFlags::BLOCK_COMMENT;
                TokenKind::Comment
            }
            b'/' if !self.after_operand => {
                self.scan_regex(start)?;
                TokenKind::RegexLiteral
            }
            b'\'' | b'"' => {
                self.scan_string(start, byte)?;
                TokenKind::StringLiteral
            }
            b'`' => {
                flags |= TokenFlags::TEMPLATE;
                if self.scan_template(start)? {
                    flags |= TokenFlags::SUBSTITUTION;
                }
                TokenKind::StringLiteral
            }
            b'0'..=b'9' => {
                self.scan_number();
                TokenKind::NumericLiteral
            }
            b'.' if next.is_some_and(|b| b.is_ascii_digit()) => {
                self.scan_number();
                TokenKind::NumericLiteral
            }
            b if is_identifier_start(b) => {
                while self.peek().is_some_and(is_identifier_part) {
                    self.pos += 1;
                }
                match Keyword::from_text(&self.source[start..self.pos]) {
                    Some(keyword) => TokenKind::Keyword(keyword),
                    None => TokenKind::Identifier,
                }
            }
            _ => self.scan_punctuator(start)?,
        };

        let token = self.make(kind, start, flags);
        self.emitted += 1;
        if kind == TokenKind::Comment {
            self.pending_line_break = line_break || self.pending_line_break;
        } else {
            self.pending_line_break = false;
            self.after_operand = self.track_significant(&token);
        }
        Ok(token)
    }

    /// Record a significant token and report whether a following `/` is division.
    ///
    /// A `)` closing a control-flow header and a `}` closing a statement block
    /// end no expression, so `if (a) /re/.test(s)` and `{}\n/re/` scan regexes.
    fn track_significant(&mut self, token: &Token) -> bool {
        let ends_operand = match token.kind {
            TokenKind::Punctuation(Punctuation::OpenParen) => {
                let header = match self.recent {
                    [Some(TokenKind::Keyword(Keyword::If | Keyword::While | Keyword::For | Keyword::With)), _] => true,
                    [Some(TokenKind::Keyword(Keyword::Await)), Some(TokenKind::Keyword(Keyword::For))] => true,
                    _ => false,
                };
                self.parens.push(header);
                false
            }
            TokenKind::Punctuation(Punctuation::CloseParen) => !self.parens.pop().unwrap_or(false),
            TokenKind::Punctuation(Punctuation::OpenBrace) => {
                let block = match self.recent[0] {
                    None => true,
                    Some(TokenKind::Punctuation(
                        Punctuation::Semicolon
                        | Punctuation::OpenBrace
                        | Punctuation::CloseBrace
                        | Punctuation::CloseParen
                        | Punctuation::Arrow,
                    )) => true,
                    Some(TokenKind::Keyword(
                        Keyword::Else | Keyword::Try | Keyword::Finally | Keyword::Do,
                    )) => true,
                    _ => false,
                };
                self.braces.push(block);
                false
            }
            TokenKind::Punctuation(Punctuation::CloseBrace) => !self.braces.pop().unwrap_or(false),
            _ => token.can_end_expression(),
        };
        self.recent = [Some(token.kind), self.recent[0]];
        ends_operand
    }

    fn make(&self, kind: TokenKind, start: usize, flags: TokenFlags) -> Token {
        Token {
            kind,
            lexeme: self.source[start..self.pos].to_string(),
            span: TextSpan::new(start as u32, self.pos as u32),
            flags,
        }
    }

    fn scan_line_comment(&mut self) {
        let rest = &self.source.as_bytes()[self.pos..];
        match memchr2(b'\n', b'\r', rest) {
            Some(len) => self.pos += len,
            None => self.pos = self.source.len(),
        }
    }

    fn scan_block_comment(&mut self, start: usize) -> Result<(), LexError> {
        self.advance(2);
        let rest = &self.source.as_bytes()[self.pos..];
        let Some(len) = memmem::find(rest, b"*/") else {
            return Err(self.error(start, LexErrorKind::UnterminatedComment));
        };
        if memchr2(b'\n', b'\r', &rest[..len]).is_some() {
            self.pending_line_break = true;
        }
        self.pos += len + 2;
        Ok(())
    }

    fn scan_string(&mut self, start: usize, quote: u8) -> Result<(), LexError> {
        self.advance(1);
        loop {
            match self.peek() {
                None | Some(b'\n' | b'\r') => {
                    return Err(self.error(start, LexErrorKind::UnterminatedString));
                }
                Some(b'\\') => {
                    self.advance(1);
                    match self.peek() {
                        None => return Err(self.error(start, LexErrorKind::UnterminatedString)),
                        // Line continuation
                        Some(b'\r') if self.peek_at(1) == Some(b'\n') => self.advance(2),
                        Some(_) => self.advance(1),
                    }
                }
                Some(b) if b == quote => {
                    self.advance(1);
                    return Ok(());
                }
                Some(_) => self.advance(1),
            }
        }
    }

    /// Scan a template literal; returns whether it had a `${…}` substitution.
    fn scan_template(&mut self, start: usize) -> Result<bool, LexError> {
        self.advance(1);
        let mut has_substitution = false;
        loop {
            match self.peek() {
                None => return Err(self.error(start, LexErrorKind::UnterminatedTemplate)),
                Some(b'\\') => self.advance(2),
                Some(b'`') => {
                    self.advance(1);
                    return Ok(has_substitution);
                }
                Some(b'$') if self.peek_at(1) == Some(b'{') => {
                    has_substitution = true;
                    self.advance(2);
                    self.skip_substitution(start)?;
                }
                Some(_) => self.advance(1),
            }
        }
    }

    /// Skip the body of a `${…}` substitution up to and including its `}`.
    fn skip_substitution(&mut self, template_start: usize) -> Result<(), LexError> {
        let mut depth = 1usize;
        loop {
            let here = self.pos;
            match self.peek() {
                None => return Err(self.error(template_start, LexErrorKind::UnterminatedTemplate)),
                Some(b'{') => {
                    depth += 1;
                    self.advance(1);
                }
                Some(b'}') => {
                    depth -= 1;
                    self.advance(1);
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some(quote @ (b'\'' | b'"')) => self.scan_string(here, quote)?,
                Some(b'`') => {
                    self.scan_template(here)?;
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => self.scan_line_comment(),
                Some(b'/') if self.peek_at(1) == Some(b'*') => self.scan_block_comment(here)?,
                Some(_) => self.advance(1),
            }
        }
    }

    fn scan_regex(&mut self, start: usize) -> Result<(), LexError> {
        self.advance(1);
        let mut in_class = false;
        loop {
            match self.peek() {
                None | Some(b'\n' | b'\r') => {
                    return Err(self.error(start, LexErrorKind::UnterminatedRegex));
                }
                Some(b'\\') => {
                    self.advance(1);
                    if matches!(self.peek(), None | Some(b'\n' | b'\r')) {
                        return Err(self.error(start, LexErrorKind::UnterminatedRegex));
                    }
                    self.advance(1);
                }
                Some(b'[') => {
                    in_class = true;
                    self.advance(1);
                }
                Some(b']') => {
                    in_class = false;
                    self.advance(1);
                }
                Some(b'/') if !in_class => {
                    self.advance(1);
                    break;
                }
                Some(_) => self.advance(1),
            }
        }
        // flags
        while self.peek().is_some_and(is_identifier_part) {
            self.pos += 1;
        }
        Ok(())
    }

    fn scan_number(&mut self) {
        let radix_prefix = self.peek() == Some(b'0')
            && matches!(
                self.peek_at(1),
                Some(b'x' | b'X' | b'o' | b'O' | b'b' | b'B')
            );
        if radix_prefix {
            self.advance(2);
            while self.peek().is_some_and(is_numeric_part) {
                self.pos += 1;
            }
            return;
        }

        let is_digit = |b: u8| b.is_ascii_digit() || b == b'_';
        while self.peek().is_some_and(is_digit) {
            self.pos += 1;
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            while self.peek().is_some_and(is_digit) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let exponent_digits = match self.peek_at(1) {
                Some(b'+' | b'-') => self.peek_at(2).is_some_and(|b| b.is_ascii_digit()),
                Some(b) => b.is_ascii_digit(),
                None => false,
            };
            if exponent_digits {
                self.advance(2);
                while self.peek().is_some_and(is_digit) {
                    self.pos += 1;
                }
            }
        }
        if self.peek() == Some(b'n') {
            self.pos += 1;
        }
    }

    fn scan_punctuator(&mut self, start: usize) -> Result<TokenKind, LexError> {
        let rest = &self.source[start..];
        let Some(mut text) = PUNCTUATORS.iter().copied().find(|p| rest.starts_with(p)) else {
            let character = rest.chars().next().unwrap_or('\0');
            return Err(self.error(start, LexErrorKind::UnexpectedCharacter { character }));
        };
        // `a?.5:b` is a conditional, not optional chaining
        if text == "?." && rest.as_bytes().get(2).is_some_and(|b| b.is_ascii_digit()) {
            text = "?";
        }
        self.advance(text.len());
        Ok(Punctuation::from_text(text)
            .map(TokenKind::Punctuation)
            .unwrap_or(TokenKind::Operator))
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.scan();
        match &result {
            Ok(token) if !token.is_eof() => {}
            _ => self.finished = true,
        }
        Some(result)
    }
}

impl FusedIterator for Scanner<'_> {}
