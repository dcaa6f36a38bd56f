//! Expression scanning for the scope builder.
//!
//! Expressions are not parsed into a tree. The scanner walks tokens until the
//! expression ends, recording identifier references and descending into the
//! constructs that matter for scoping: function and arrow expressions, object
//! literals (keys are not references) and bracketed groups.

use scopetrace_scanner::{Keyword, Punctuation, Token, TokenKind};

use crate::error::ParseResult;
use crate::scope::{DeclKind, ScopeKind};
use crate::state::{ExprContext, ScopeBuilder, ScopeOpener};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FunctionForm {
    /// Statement position. The name is required and binds in the enclosing function scope.
    Declaration,
    /// Expression position. An optional name binds inside the function's own scope.
    Expression,
}

/// Can `token` begin a new operand? Used to detect automatic semicolon insertion.
fn starts_operand(token: &Token) -> bool {
    match token.kind {
        TokenKind::Identifier
        | TokenKind::StringLiteral
        | TokenKind::NumericLiteral
        | TokenKind::RegexLiteral => true,
        TokenKind::Keyword(keyword) => !matches!(keyword, Keyword::In | Keyword::Instanceof),
        TokenKind::Punctuation(Punctuation::OpenBrace) => true,
        TokenKind::Operator => matches!(token.lexeme.as_str(), "++" | "--" | "!" | "~"),
        _ => false,
    }
}

/// Tokens that may follow `get` / `set` / `async` when those prefix a method.
fn starts_property_key(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::Identifier
            | TokenKind::Keyword(_)
            | TokenKind::StringLiteral
            | TokenKind::NumericLiteral
            | TokenKind::Punctuation(Punctuation::OpenBracket)
    ) || token.is_operator("*")
}

impl<'t> ScopeBuilder<'t> {
    fn prev_ends_expression(&self) -> bool {
        self.prev.is_some_and(Token::can_end_expression)
    }

    fn is_asi_boundary(&self, token: &Token) -> bool {
        token.has_preceding_line_break() && self.prev_ends_expression() && starts_operand(token)
    }

    /// Scan one expression, stopping at the first token that cannot continue it.
    pub(crate) fn parse_expression(&mut self, context: ExprContext) -> ParseResult<()> {
        let first = self.pos;
        let mut pending_colons = 0u32;

        loop {
            let token = self.current();
            if self.pos != first {
                if context.asi && self.is_asi_boundary(token) {
                    break;
                }
                if context.for_header
                    && (token.is_keyword(Keyword::In)
                        || (token.is_contextual("of") && self.prev_ends_expression()))
                {
                    break;
                }
            }

            match token.kind {
                TokenKind::EndOfFile => break,
                TokenKind::Punctuation(punct) => match punct {
                    Punctuation::Semicolon
                    | Punctuation::CloseBrace
                    | Punctuation::CloseParen
                    | Punctuation::CloseBracket => break,
                    Punctuation::Comma => {
                        if context.stop_at_comma {
                            break;
                        }
                        self.advance();
                    }
                    Punctuation::Question => {
                        pending_colons += 1;
                        self.advance();
                    }
                    Punctuation::Colon => {
                        // `case x:`, `{ key: ... }` and labels end here
                        if pending_colons == 0 {
                            break;
                        }
                        pending_colons -= 1;
                        self.advance();
                    }
                    Punctuation::OpenParen => {
                        if self.paren_starts_arrow(self.pos) {
                            self.parse_arrow_function(context)?;
                        } else {
                            self.parse_group(Punctuation::CloseParen)?;
                        }
                    }
                    Punctuation::OpenBracket => self.parse_group(Punctuation::CloseBracket)?,
                    Punctuation::OpenBrace => self.parse_object_literal()?,
                    Punctuation::Dot | Punctuation::QuestionDot => {
                        self.advance();
                        if self.current().is_identifier_name() {
                            // property name, not a reference
                            self.advance();
                        }
                    }
                    Punctuation::Ellipsis | Punctuation::Equals => self.advance(),
                    Punctuation::Arrow => return Err(self.unexpected("an expression")),
                },
                TokenKind::Identifier => self.parse_identifier_operand(context)?,
                TokenKind::Keyword(keyword) => match keyword {
                    Keyword::Function => self.parse_function(FunctionForm::Expression)?,
                    Keyword::Class => return Err(self.unsupported("class expressions")),
                    Keyword::Import => return Err(self.unsupported("modules")),
                    keyword if keyword.starts_statement() => break,
                    _ => self.advance(),
                },
                _ => self.advance(),
            }
        }
        Ok(())
    }

    /// `( ... )` or `[ ... ]` that is not an arrow parameter list.
    fn parse_group(&mut self, close: Punctuation) -> ParseResult<()> {
        self.advance();
        self.enter()?;
        self.parse_expression(ExprContext::NESTED)?;
        self.expect(close)?;
        self.leave();
        Ok(())
    }

    fn parse_identifier_operand(&mut self, context: ExprContext) -> ParseResult<()> {
        let token = self.current();
        let next = self.peek(1);

        if next.is_punct(Punctuation::Arrow) {
            return self.parse_arrow_function(context);
        }
        if token.is_contextual("async") && !next.has_preceding_line_break() {
            if next.is_keyword(Keyword::Function) {
                self.advance();
                return self.parse_function(FunctionForm::Expression);
            }
            let async_arrow = (next.is_identifier() && self.peek(2).is_punct(Punctuation::Arrow))
                || (next.is_punct(Punctuation::OpenParen) && self.paren_starts_arrow(self.pos + 1));
            if async_arrow {
                self.advance();
                return self.parse_arrow_function(context);
            }
        }

        self.reference(token);
        self.advance();
        Ok(())
    }

    /// `x => body` or `(params) => body`, cursor on `x` or `(`.
    fn parse_arrow_function(&mut self, context: ExprContext) -> ParseResult<()> {
        let start = self.current().start();
        let id = self.open_scope(ScopeKind::Function, "arrow", start, ScopeOpener::Header)?;

        if self.at(Punctuation::OpenParen) {
            self.parse_parameters()?;
        } else {
            let param = self.current();
            self.declare(param, DeclKind::Param);
            self.advance();
        }
        self.expect(Punctuation::Arrow)?;

        if self.at(Punctuation::OpenBrace) {
            return self.parse_brace_body(id);
        }
        let body = ExprContext {
            stop_at_comma: true,
            asi: context.asi,
            for_header: false,
        };
        self.parse_expression(body)?;
        let end = self.prev_end();
        self.close_scope(id, end);
        Ok(())
    }

    /// Function declaration or expression, cursor on `function`.
    pub(crate) fn parse_function(&mut self, form: FunctionForm) -> ParseResult<()> {
        self.advance();
        if self.current().is_operator("*") {
            self.advance();
        }
        let name = self.current().is_identifier().then(|| self.current());
        if name.is_some() {
            self.advance();
        }

        match form {
            FunctionForm::Declaration => {
                let Some(name) = name else {
                    return Err(self.unexpected("a function name"));
                };
                self.declare(name, DeclKind::Function);
                self.parse_function_tail(name.lexeme.clone(), None)
            }
            FunctionForm::Expression => {
                let label = name.map_or_else(|| "anonymous".to_string(), |n| n.lexeme.clone());
                self.parse_function_tail(label, name)
            }
        }
    }

    /// Parameter list and body of a function or method, cursor on `(`.
    fn parse_function_tail(&mut self, label: String, own_name: Option<&'t Token>) -> ParseResult<()> {
        if !self.at(Punctuation::OpenParen) {
            return Err(self.unexpected("`(`"));
        }
        let start = self.current().start();
        let id = self.open_scope(ScopeKind::Function, label, start, ScopeOpener::Header)?;
        if let Some(name) = own_name {
            self.declare(name, DeclKind::Function);
        }
        self.parse_parameters()?;
        self.parse_brace_body(id)
    }

    /// `( a, b = a, ...rest )`, declaring each name in the current scope.
    fn parse_parameters(&mut self) -> ParseResult<()> {
        self.advance();
        self.enter()?;
        while !self.at(Punctuation::CloseParen) {
            if self.at(Punctuation::Ellipsis) {
                self.advance();
            }
            let param = self.current();
            match param.kind {
                TokenKind::Identifier => {
                    self.declare(param, DeclKind::Param);
                    self.advance();
                }
                TokenKind::Punctuation(Punctuation::OpenBrace | Punctuation::OpenBracket) => {
                    return Err(self.unsupported("destructuring patterns"));
                }
                _ => return Err(self.unexpected("a parameter name")),
            }
            if self.at(Punctuation::Equals) {
                self.advance();
                self.parse_expression(ExprContext::LIST_ITEM)?;
            }
            if !self.at(Punctuation::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(Punctuation::CloseParen)?;
        self.leave();
        Ok(())
    }

    fn parse_object_literal(&mut self) -> ParseResult<()> {
        self.advance();
        self.enter()?;
        while !self.at(Punctuation::CloseBrace) {
            self.parse_property()?;
            if self.at(Punctuation::Comma) {
                self.advance();
            } else if !self.at(Punctuation::CloseBrace) {
                return Err(self.unexpected("`,` or `}`"));
            }
        }
        self.advance();
        self.leave();
        Ok(())
    }

    /// One object literal member: `key: value`, shorthand, method, accessor or spread.
    fn parse_property(&mut self) -> ParseResult<()> {
        if self.at(Punctuation::Ellipsis) {
            self.advance();
            return self.parse_expression(ExprContext::LIST_ITEM);
        }

        let mut method_only = false;
        let token = self.current();
        if token.is_operator("*") {
            self.advance();
            method_only = true;
        } else if (token.is_contextual("get")
            || token.is_contextual("set")
            || token.is_contextual("async"))
            && starts_property_key(self.peek(1))
        {
            self.advance();
            method_only = true;
            if self.current().is_operator("*") {
                self.advance();
            }
        }

        let key = self.current();
        let label = match key.kind {
            TokenKind::Identifier | TokenKind::Keyword(_) | TokenKind::NumericLiteral => {
                self.advance();
                key.lexeme.clone()
            }
            TokenKind::StringLiteral => {
                self.advance();
                key.lexeme.trim_matches(['\'', '"']).to_string()
            }
            TokenKind::Punctuation(Punctuation::OpenBracket) => {
                self.parse_group(Punctuation::CloseBracket)?;
                "anonymous".to_string()
            }
            _ => return Err(self.unexpected("a property name")),
        };

        if self.at(Punctuation::OpenParen) {
            return self.parse_function_tail(label, None);
        }
        if method_only {
            return Err(self.unexpected("`(`"));
        }
        match self.current().kind {
            TokenKind::Punctuation(Punctuation::Colon) => {
                self.advance();
                self.parse_expression(ExprContext::LIST_ITEM)
            }
            TokenKind::Punctuation(Punctuation::Comma | Punctuation::CloseBrace) => {
                if key.is_identifier() {
                    self.reference(key);
                }
                Ok(())
            }
            TokenKind::Punctuation(Punctuation::Equals) => {
                Err(self.unsupported("destructuring patterns"))
            }
            _ => Err(self.unexpected("`:`")),
        }
    }
}
