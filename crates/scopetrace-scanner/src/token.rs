//! Token definitions.

use bitflags::bitflags;
use scopetrace_common::TextSpan;

/// Reserved words the scanner classifies as keywords.
///
/// Contextual words (`of`, `async`, `get`, `set`, `static`) are scanned as
/// identifiers; the scope builder recognises them by position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Await,
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Export,
    Extends,
    False,
    Finally,
    For,
    Function,
    If,
    Import,
    In,
    Instanceof,
    Let,
    New,
    Null,
    Return,
    Super,
    Switch,
    This,
    Throw,
    True,
    Try,
    Typeof,
    Var,
    Void,
    While,
    With,
    Yield,
}

impl Keyword {
    /// Look up the keyword spelled by `text`.
    pub fn from_text(text: &str) -> Option<Keyword> {
        let keyword = match text {
            "await" => Keyword::Await,
            "break" => Keyword::Break,
            "case" => Keyword::Case,
            "catch" => Keyword::Catch,
            "class" => Keyword::Class,
            "const" => Keyword::Const,
            "continue" => Keyword::Continue,
            "debugger" => Keyword::Debugger,
            "default" => Keyword::Default,
            "delete" => Keyword::Delete,
            "do" => Keyword::Do,
            "else" => Keyword::Else,
            "export" => Keyword::Export,
            "extends" => Keyword::Extends,
            "false" => Keyword::False,
            "finally" => Keyword::Finally,
            "for" => Keyword::For,
            "function" => Keyword::Function,
            "if" => Keyword::If,
            "import" => Keyword::Import,
            "in" => Keyword::In,
            "instanceof" => Keyword::Instanceof,
            "let" => Keyword::Let,
            "new" => Keyword::New,
            "null" => Keyword::Null,
            "return" => Keyword::Return,
            "super" => Keyword::Super,
            "switch" => Keyword::Switch,
            "this" => Keyword::This,
            "throw" => Keyword::Throw,
            "true" => Keyword::True,
            "try" => Keyword::Try,
            "typeof" => Keyword::Typeof,
            "var" => Keyword::Var,
            "void" => Keyword::Void,
            "while" => Keyword::While,
            "with" => Keyword::With,
            "yield" => Keyword::Yield,
            _ => return None,
        };
        Some(keyword)
    }

    /// Keywords that evaluate to a value and can therefore end an expression.
    pub fn is_value(self) -> bool {
        matches!(
            self,
            Keyword::This | Keyword::Super | Keyword::True | Keyword::False | Keyword::Null
        )
    }

    /// Keywords that begin a statement and can never appear inside an expression.
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            Keyword::Break
                | Keyword::Case
                | Keyword::Catch
                | Keyword::Class
                | Keyword::Const
                | Keyword::Continue
                | Keyword::Debugger
                | Keyword::Default
                | Keyword::Do
                | Keyword::Else
                | Keyword::Export
                | Keyword::Finally
                | Keyword::For
                | Keyword::If
                | Keyword::Import
                | Keyword::Let
                | Keyword::Return
                | Keyword::Switch
                | Keyword::Throw
                | Keyword::Try
                | Keyword::Var
                | Keyword::While
                | Keyword::With
        )
    }
}

/// Punctuators the scope builder cares about structurally.
/// Every other punctuator is scanned as `TokenKind::Operator`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Punctuation {
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Comma,
    Semicolon,
    Colon,
    Question,
    Dot,
    QuestionDot,
    Ellipsis,
    Equals,
    Arrow,
}

impl Punctuation {
    pub fn from_text(text: &str) -> Option<Punctuation> {
        let punct = match text {
            "{" => Punctuation::OpenBrace,
            "}" => Punctuation::CloseBrace,
            "(" => Punctuation::OpenParen,
            ")" => Punctuation::CloseParen,
            "[" => Punctuation::OpenBracket,
            "]" => Punctuation::CloseBracket,
            "," => Punctuation::Comma,
            ";" => Punctuation::Semicolon,
            ":" => Punctuation::Colon,
            "?" => Punctuation::Question,
            "." => Punctuation::Dot,
            "?." => Punctuation::QuestionDot,
            "..." => Punctuation::Ellipsis,
            "=" => Punctuation::Equals,
            "=>" => Punctuation::Arrow,
            _ => return None,
        };
        Some(punct)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Punctuation::OpenBrace => "{",
            Punctuation::CloseBrace => "}",
            Punctuation::OpenParen => "(",
            Punctuation::CloseParen => ")",
            Punctuation::OpenBracket => "[",
            Punctuation::CloseBracket => "]",
            Punctuation::Comma => ",",
            Punctuation::Semicolon => ";",
            Punctuation::Colon => ":",
            Punctuation::Question => "?",
            Punctuation::Dot => ".",
            Punctuation::QuestionDot => "?.",
            Punctuation::Ellipsis => "...",
            Punctuation::Equals => "=",
            Punctuation::Arrow => "=>",
        }
    }
}

/// Token category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Keyword(Keyword),
    Punctuation(Punctuation),
    Operator,
    /// `'…'`, `"…"` and `` `…` `` literals. Templates carry `TokenFlags::TEMPLATE`.
    StringLiteral,
    NumericLiteral,
    RegexLiteral,
    Comment,
    EndOfFile,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u8 {
        /// A line terminator appears between the previous token and this one.
        const PRECEDING_LINE_BREAK = 1 << 0;
        /// Backtick template literal.
        const TEMPLATE = 1 << 1;
        /// Template literal containing at least one `${…}` substitution.
        const SUBSTITUTION = 1 << 2;
        /// `/* … */` comment (as opposed to `// …`).
        const BLOCK_COMMENT = 1 << 3;
    }
}

/// A single token. `lexeme` is the raw source text of the token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: TextSpan,
    pub flags: TokenFlags,
}

impl Token {
    #[inline]
    pub fn start(&self) -> u32 {
        self.span.start
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.span.end
    }

    #[inline]
    pub fn is_punct(&self, punct: Punctuation) -> bool {
        self.kind == TokenKind::Punctuation(punct)
    }

    #[inline]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    #[inline]
    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    /// An identifier with the given contextual spelling (`of`, `async`, ...).
    #[inline]
    pub fn is_contextual(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.lexeme == word
    }

    #[inline]
    pub fn is_operator(&self, text: &str) -> bool {
        self.kind == TokenKind::Operator && self.lexeme == text
    }

    #[inline]
    pub fn is_trivia(&self) -> bool {
        self.kind == TokenKind::Comment
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfFile
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    /// Identifier or keyword spelling, usable as a property name after `.`.
    pub fn is_identifier_name(&self) -> bool {
        matches!(self.kind, TokenKind::Identifier | TokenKind::Keyword(_))
    }

    /// Whether this token can be the last token of an expression.
    ///
    /// This drives both regex-vs-division disambiguation in the scanner and
    /// automatic semicolon insertion in the scope builder.
    pub fn can_end_expression(&self) -> bool {
        match self.kind {
            TokenKind::Identifier
            | TokenKind::StringLiteral
            | TokenKind::NumericLiteral
            | TokenKind::RegexLiteral => true,
            TokenKind::Keyword(keyword) => keyword.is_value(),
            TokenKind::Punctuation(punct) => matches!(
                punct,
                Punctuation::CloseParen | Punctuation::CloseBracket | Punctuation::CloseBrace
            ),
            TokenKind::Operator => self.lexeme == "++" || self.lexeme == "--",
            TokenKind::Comment | TokenKind::EndOfFile => false,
        }
    }

    /// Short human-readable description used in parse errors.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EndOfFile => "end of input".to_string(),
            TokenKind::Identifier => format!("identifier `{}`", self.lexeme),
            TokenKind::Keyword(_) => format!("keyword `{}`", self.lexeme),
            TokenKind::StringLiteral => "string literal".to_string(),
            TokenKind::NumericLiteral => format!("number `{}`", self.lexeme),
            TokenKind::RegexLiteral => "regular expression".to_string(),
            TokenKind::Comment => "comment".to_string(),
            TokenKind::Punctuation(_) | TokenKind::Operator => format!("`{}`", self.lexeme),
        }
    }
}
