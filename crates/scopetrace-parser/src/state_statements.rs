//! Statement grammar for the scope builder.
//!
//! Opens Block / Loop scopes for braced blocks and control-flow bodies and
//! records `var` / `let` / `const` / function / catch declarations.

use scopetrace_scanner::{Keyword, Punctuation, TokenKind};

use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::scope::{DeclKind, ScopeId, ScopeKind};
use crate::state::{ExprContext, ScopeBuilder, ScopeOpener, StatementPosition};
use crate::state_expressions::FunctionForm;

impl<'t> ScopeBuilder<'t> {
    pub(crate) fn parse_statement(&mut self, position: StatementPosition) -> ParseResult<()> {
        // labels: `a: b: stmt`
        while self.current().kind == TokenKind::Identifier
            && self.peek(1).is_punct(Punctuation::Colon)
        {
            self.advance();
            self.advance();
        }

        let token = self.current();
        match token.kind {
            TokenKind::Punctuation(Punctuation::OpenBrace) => {
                self.parse_block(ScopeKind::Block, "block")
            }
            TokenKind::Punctuation(Punctuation::Semicolon) => {
                self.advance();
                Ok(())
            }
            TokenKind::Punctuation(
                Punctuation::CloseBrace | Punctuation::CloseParen | Punctuation::CloseBracket,
            ) => Err(self.unexpected("a statement")),
            TokenKind::Keyword(keyword) => self.parse_keyword_statement(keyword, position),
            TokenKind::Identifier
                if token.is_contextual("async")
                    && self.peek(1).is_keyword(Keyword::Function)
                    && !self.peek(1).has_preceding_line_break() =>
            {
                self.advance();
                self.parse_function(FunctionForm::Declaration)
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_keyword_statement(
        &mut self,
        keyword: Keyword,
        position: StatementPosition,
    ) -> ParseResult<()> {
        match keyword {
            Keyword::Var => {
                self.parse_variable_declarations(DeclKind::Var, ExprContext::STATEMENT)?;
                self.consume_semicolon()
            }
            Keyword::Let | Keyword::Const => {
                if position == StatementPosition::Body {
                    return Err(ParseError::new(
                        self.current().start(),
                        ParseErrorKind::LexicalDeclarationInStatementPosition,
                    ));
                }
                let kind = if keyword == Keyword::Let {
                    DeclKind::Let
                } else {
                    DeclKind::Const
                };
                self.parse_variable_declarations(kind, ExprContext::STATEMENT)?;
                self.consume_semicolon()
            }
            Keyword::Function => self.parse_function(FunctionForm::Declaration),
            Keyword::If => self.parse_if(),
            Keyword::For => self.parse_for(),
            Keyword::While => {
                self.advance();
                self.parse_condition()?;
                self.parse_body(ScopeKind::Loop, "while-block")
            }
            Keyword::Do => self.parse_do(),
            Keyword::Try => self.parse_try(),
            Keyword::Switch => self.parse_switch(),
            Keyword::Return | Keyword::Throw => {
                self.advance();
                if !self.at_statement_end() {
                    self.parse_expression(ExprContext::STATEMENT)?;
                }
                self.consume_semicolon()
            }
            Keyword::Break | Keyword::Continue => {
                self.advance();
                let next = self.current();
                if next.is_identifier() && !next.has_preceding_line_break() {
                    self.advance();
                }
                self.consume_semicolon()
            }
            Keyword::Debugger => {
                self.advance();
                self.consume_semicolon()
            }
            Keyword::Class => Err(self.unsupported("class declarations")),
            Keyword::Import | Keyword::Export => Err(self.unsupported("modules")),
            Keyword::With => Err(self.unsupported("with statements")),
            Keyword::Else
            | Keyword::Catch
            | Keyword::Finally
            | Keyword::Case
            | Keyword::Default => Err(self.unexpected("a statement")),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) -> ParseResult<()> {
        let start = self.pos;
        self.parse_expression(ExprContext::STATEMENT)?;
        if self.pos == start {
            return Err(self.unexpected("a statement"));
        }
        self.consume_semicolon()
    }

    fn at_statement_end(&self) -> bool {
        let token = self.current();
        token.is_eof()
            || token.is_punct(Punctuation::Semicolon)
            || token.is_punct(Punctuation::CloseBrace)
            || token.has_preceding_line_break()
    }

    /// Explicit `;`, or an automatically inserted one before `}`, end of
    /// input, or a line break.
    pub(crate) fn consume_semicolon(&mut self) -> ParseResult<()> {
        if self.at(Punctuation::Semicolon) {
            self.advance();
            return Ok(());
        }
        if self.at_statement_end() {
            return Ok(());
        }
        Err(self.unexpected("`;`"))
    }

    /// Statements up to (not including) the `}` closing the current scope.
    pub(crate) fn parse_statement_list(&mut self) -> ParseResult<()> {
        while !self.at(Punctuation::CloseBrace) {
            if self.current().is_eof() {
                return Err(self.unexpected("`}`"));
            }
            self.parse_statement(StatementPosition::List)?;
        }
        Ok(())
    }

    /// `{ ... }` opening its own scope.
    pub(crate) fn parse_block(&mut self, kind: ScopeKind, label: &str) -> ParseResult<()> {
        if !self.at(Punctuation::OpenBrace) {
            return Err(self.unexpected("`{`"));
        }
        let open = self.pos;
        let start = self.current().start();
        let id = self.open_scope(kind, label, start, ScopeOpener::Brace(open))?;
        self.advance();
        self.parse_statement_list()?;
        self.close_brace_scope(id)
    }

    /// `{ ... }` continuing a scope opened at its header (function, `for`, `catch`).
    pub(crate) fn parse_brace_body(&mut self, id: ScopeId) -> ParseResult<()> {
        if !self.at(Punctuation::OpenBrace) {
            return Err(self.unexpected("`{`"));
        }
        self.attach_brace();
        self.advance();
        self.parse_statement_list()?;
        self.close_brace_scope(id)
    }

    /// Body of a control-flow statement: a block, or a single statement that
    /// still gets its own scope.
    fn parse_body(&mut self, kind: ScopeKind, label: &str) -> ParseResult<()> {
        if self.at(Punctuation::OpenBrace) {
            return self.parse_block(kind, label);
        }
        let start = self.current().start();
        let id = self.open_scope(kind, label, start, ScopeOpener::Statement)?;
        self.parse_statement(StatementPosition::Body)?;
        let end = self.prev_end();
        self.close_scope(id, end);
        Ok(())
    }

    fn parse_loop_body(&mut self, id: ScopeId) -> ParseResult<()> {
        if self.at(Punctuation::OpenBrace) {
            return self.parse_brace_body(id);
        }
        if let Some(top) = self.scope_stack.last_mut() {
            top.opener = ScopeOpener::Statement;
        }
        self.parse_statement(StatementPosition::Body)?;
        let end = self.prev_end();
        self.close_scope(id, end);
        Ok(())
    }

    /// `( expression )` after `if`, `while`, `switch`.
    fn parse_condition(&mut self) -> ParseResult<()> {
        self.expect(Punctuation::OpenParen)?;
        self.enter()?;
        self.parse_expression(ExprContext::NESTED)?;
        self.expect(Punctuation::CloseParen)?;
        self.leave();
        Ok(())
    }

    pub(crate) fn parse_variable_declarations(
        &mut self,
        kind: DeclKind,
        context: ExprContext,
    ) -> ParseResult<()> {
        self.advance();
        loop {
            let name = self.current();
            match name.kind {
                TokenKind::Identifier => {
                    self.declare(name, kind);
                    self.advance();
                }
                TokenKind::Punctuation(Punctuation::OpenBrace | Punctuation::OpenBracket) => {
                    return Err(self.unsupported("destructuring patterns"));
                }
                _ => return Err(self.unexpected("a variable name")),
            }
            if self.at(Punctuation::Equals) {
                self.advance();
                self.parse_expression(context.with_comma_stop())?;
            }
            if !self.at(Punctuation::Comma) {
                return Ok(());
            }
            self.advance();
        }
    }

    fn parse_if(&mut self) -> ParseResult<()> {
        loop {
            self.advance();
            self.parse_condition()?;
            self.parse_body(ScopeKind::Block, "if-block")?;
            if !self.at_keyword(Keyword::Else) {
                return Ok(());
            }
            self.advance();
            if !self.at_keyword(Keyword::If) {
                return self.parse_body(ScopeKind::Block, "else-block");
            }
        }
    }

    /// `for (init; test; update)`, `for (x in o)`, `for (x of xs)`, `for await`.
    ///
    /// The Loop scope opens at `(` so header declarations and the body share it.
    fn parse_for(&mut self) -> ParseResult<()> {
        self.advance();
        if self.at_keyword(Keyword::Await) {
            self.advance();
        }
        if !self.at(Punctuation::OpenParen) {
            return Err(self.unexpected("`(`"));
        }
        let start = self.current().start();
        let id = self.open_scope(ScopeKind::Loop, "for-block", start, ScopeOpener::Header)?;
        self.advance();

        match self.current().kind {
            TokenKind::Punctuation(Punctuation::Semicolon) => {}
            TokenKind::Keyword(Keyword::Var) => {
                self.parse_variable_declarations(DeclKind::Var, ExprContext::FOR_HEADER)?
            }
            TokenKind::Keyword(Keyword::Let) => {
                self.parse_variable_declarations(DeclKind::Let, ExprContext::FOR_HEADER)?
            }
            TokenKind::Keyword(Keyword::Const) => {
                self.parse_variable_declarations(DeclKind::Const, ExprContext::FOR_HEADER)?
            }
            _ => self.parse_expression(ExprContext::FOR_HEADER)?,
        }

        if self.at_keyword(Keyword::In) || self.current().is_contextual("of") {
            self.advance();
            self.parse_expression(ExprContext::NESTED)?;
        } else {
            self.expect(Punctuation::Semicolon)?;
            if !self.at(Punctuation::Semicolon) {
                self.parse_expression(ExprContext::NESTED)?;
            }
            self.expect(Punctuation::Semicolon)?;
            if !self.at(Punctuation::CloseParen) {
                self.parse_expression(ExprContext::NESTED)?;
            }
        }
        self.expect(Punctuation::CloseParen)?;
        self.parse_loop_body(id)
    }

    fn parse_do(&mut self) -> ParseResult<()> {
        self.advance();
        self.parse_body(ScopeKind::Loop, "do-block")?;
        if !self.at_keyword(Keyword::While) {
            return Err(self.unexpected("`while`"));
        }
        self.advance();
        self.parse_condition()?;
        if self.at(Punctuation::Semicolon) {
            self.advance();
        }
        Ok(())
    }

    fn parse_try(&mut self) -> ParseResult<()> {
        self.advance();
        self.parse_block(ScopeKind::Block, "try-block")?;

        let mut handled = false;
        if self.at_keyword(Keyword::Catch) {
            handled = true;
            self.advance();
            if self.at(Punctuation::OpenParen) {
                let start = self.current().start();
                let id =
                    self.open_scope(ScopeKind::Block, "catch-block", start, ScopeOpener::Header)?;
                self.advance();
                let param = self.current();
                match param.kind {
                    TokenKind::Identifier => {
                        self.declare(param, DeclKind::CatchParam);
                        self.advance();
                    }
                    TokenKind::Punctuation(Punctuation::OpenBrace | Punctuation::OpenBracket) => {
                        return Err(self.unsupported("destructuring patterns"));
                    }
                    _ => return Err(self.unexpected("a catch parameter")),
                }
                self.expect(Punctuation::CloseParen)?;
                self.parse_brace_body(id)?;
            } else {
                self.parse_block(ScopeKind::Block, "catch-block")?;
            }
        }
        if self.at_keyword(Keyword::Finally) {
            handled = true;
            self.advance();
            self.parse_block(ScopeKind::Block, "finally-block")?;
        }
        if !handled {
            return Err(self.unexpected("`catch` or `finally`"));
        }
        Ok(())
    }

    fn parse_switch(&mut self) -> ParseResult<()> {
        self.advance();
        self.parse_condition()?;
        if !self.at(Punctuation::OpenBrace) {
            return Err(self.unexpected("`{`"));
        }
        let open = self.pos;
        let start = self.current().start();
        let id = self.open_scope(
            ScopeKind::Block,
            "switch-block",
            start,
            ScopeOpener::Brace(open),
        )?;
        self.advance();

        while !self.at(Punctuation::CloseBrace) {
            if self.current().is_eof() {
                return Err(self.unexpected("`}`"));
            }
            if self.at_keyword(Keyword::Case) {
                self.advance();
                self.parse_expression(ExprContext::NESTED)?;
                self.expect(Punctuation::Colon)?;
            } else if self.at_keyword(Keyword::Default) {
                self.advance();
                self.expect(Punctuation::Colon)?;
            } else {
                self.parse_statement(StatementPosition::List)?;
            }
        }
        self.close_brace_scope(id)
    }
}
