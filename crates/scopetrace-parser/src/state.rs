//! ScopeBuilder - recursive descent over statements with an explicit scope stack.
//!
//! Statement grammar lives in `state_statements.rs`, the loose expression
//! scanner in `state_expressions.rs`. This file holds the builder state, the
//! token cursor, and scope/declaration bookkeeping.
//!
//! Every scope the builder opens is pushed on `scope_stack`. Brace-delimited
//! scopes remember the token index of their `{`; closing one requires the
//! current `}` to be the bracket partner of that `{`, as computed up front by
//! `match_brackets`. Input that ends with frames still open is an
//! `UnterminatedScope` error, never a tree.

use scopetrace_common::TextSpan;
use scopetrace_common::limits::MAX_NESTING_DEPTH;
use scopetrace_scanner::{Keyword, Punctuation, Token, TokenKind};
use smallvec::SmallVec;
use tracing::{Level, debug, span, trace};

use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::scope::{
    Binding, BindingId, DeclKind, Reference, ScopeId, ScopeKind, ScopeNode, ScopeTree,
};

/// Configuration options for the scope builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuilderOptions {
    /// Maximum combined nesting of scopes and bracketed groups.
    pub max_nesting_depth: u32,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        BuilderOptions {
            max_nesting_depth: MAX_NESTING_DEPTH,
        }
    }
}

/// Build a scope tree from a token stream ending in `EndOfFile`.
pub fn build_scopes(tokens: &[Token]) -> ParseResult<ScopeTree> {
    build_scopes_with_options(tokens, BuilderOptions::default())
}

pub fn build_scopes_with_options(
    tokens: &[Token],
    options: BuilderOptions,
) -> ParseResult<ScopeTree> {
    ScopeBuilder::new(tokens, options)?.build()
}

/// What opened a scope frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScopeOpener {
    Root,
    /// Token index (into the significant tokens) of the `{` that opened it.
    Brace(usize),
    /// A parameter list or loop/catch header; becomes `Brace` once the body starts.
    Header,
    /// A brace-less single-statement body.
    Statement,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct OpenScope {
    pub(crate) id: ScopeId,
    pub(crate) opener: ScopeOpener,
    pub(crate) start: u32,
}

/// Where a statement appears.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StatementPosition {
    /// Inside a statement list (program, block, function body, case clause).
    List,
    /// The single-statement body of `if`/`else`/`for`/`while`/`do`.
    Body,
}

/// Termination rules for the expression scanner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ExprContext {
    /// Stop at a `,` at this level (list items, declarators, arrow bodies).
    pub(crate) stop_at_comma: bool,
    /// Apply automatic semicolon insertion at line breaks.
    pub(crate) asi: bool,
    /// Stop at `in` / `of` (the init clause of a `for` header).
    pub(crate) for_header: bool,
}

impl ExprContext {
    pub(crate) const STATEMENT: ExprContext = ExprContext {
        stop_at_comma: false,
        asi: true,
        for_header: false,
    };
    pub(crate) const NESTED: ExprContext = ExprContext {
        stop_at_comma: false,
        asi: false,
        for_header: false,
    };
    pub(crate) const LIST_ITEM: ExprContext = ExprContext {
        stop_at_comma: true,
        asi: false,
        for_header: false,
    };
    pub(crate) const FOR_HEADER: ExprContext = ExprContext {
        stop_at_comma: false,
        asi: false,
        for_header: true,
    };

    pub(crate) fn with_comma_stop(self) -> ExprContext {
        ExprContext {
            stop_at_comma: true,
            ..self
        }
    }
}

/// Scope builder state.
pub struct ScopeBuilder<'t> {
    /// Significant tokens (comments removed); always ends with `EndOfFile`.
    pub(crate) tokens: Vec<&'t Token>,
    /// Bracket partner of every `{ } ( ) [ ]` token, by significant-token index.
    pub(crate) matching: Vec<Option<usize>>,
    pub(crate) pos: usize,
    /// Last consumed token.
    pub(crate) prev: Option<&'t Token>,
    pub(crate) scopes: Vec<ScopeNode>,
    pub(crate) bindings: Vec<Binding>,
    pub(crate) references: Vec<Reference>,
    pub(crate) scope_stack: Vec<OpenScope>,
    pub(crate) depth: u32,
    pub(crate) options: BuilderOptions,
    pub(crate) source_len: u32,
}

impl<'t> ScopeBuilder<'t> {
    pub fn new(tokens: &'t [Token], options: BuilderOptions) -> ParseResult<Self> {
        let Some(eof) = tokens.last().filter(|t| t.is_eof()) else {
            let position = tokens.last().map(Token::end).unwrap_or(0);
            return Err(ParseError::new(position, ParseErrorKind::MissingEndOfInput));
        };

        let significant: Vec<&'t Token> = tokens.iter().filter(|t| !t.is_trivia()).collect();
        let matching = match_brackets(&significant);

        Ok(ScopeBuilder {
            tokens: significant,
            matching,
            pos: 0,
            prev: None,
            scopes: Vec::new(),
            bindings: Vec::new(),
            references: Vec::new(),
            scope_stack: Vec::new(),
            depth: 0,
            options,
            source_len: eof.end(),
        })
    }

    /// Run the builder over the whole token stream.
    pub fn build(mut self) -> ParseResult<ScopeTree> {
        let _span = span!(Level::DEBUG, "build_scopes", tokens = self.tokens.len()).entered();

        self.scopes.push(ScopeNode::new(
            ScopeId::GLOBAL,
            ScopeKind::Global,
            "Global".to_string(),
            None,
            0,
        ));
        self.scope_stack.push(OpenScope {
            id: ScopeId::GLOBAL,
            opener: ScopeOpener::Root,
            start: 0,
        });

        while !self.current().is_eof() {
            self.parse_statement(StatementPosition::List)?;
        }

        if let Some(open) = self.scope_stack.last().filter(|s| s.id != ScopeId::GLOBAL) {
            return Err(ParseError::new(
                self.source_len,
                ParseErrorKind::UnterminatedScope {
                    opened_at: open.start,
                },
            ));
        }
        self.scope_stack.clear();
        self.scopes[ScopeId::GLOBAL.index()].range = TextSpan::new(0, self.source_len);

        debug!(
            scopes = self.scopes.len(),
            bindings = self.bindings.len(),
            references = self.references.len(),
            "scope tree built"
        );

        Ok(ScopeTree {
            scopes: self.scopes,
            bindings: self.bindings,
            references: self.references,
            source_len: self.source_len,
        })
    }

    // Token cursor

    #[inline]
    pub(crate) fn current(&self) -> &'t Token {
        self.tokens[self.pos]
    }

    #[inline]
    pub(crate) fn peek(&self, offset: usize) -> &'t Token {
        let last = self.tokens.len() - 1;
        self.tokens[(self.pos + offset).min(last)]
    }

    #[inline]
    pub(crate) fn at(&self, punct: Punctuation) -> bool {
        self.current().is_punct(punct)
    }

    #[inline]
    pub(crate) fn at_keyword(&self, keyword: Keyword) -> bool {
        self.current().is_keyword(keyword)
    }

    pub(crate) fn advance(&mut self) {
        let token = self.current();
        self.prev = Some(token);
        if !token.is_eof() {
            self.pos += 1;
        }
    }

    /// End offset of the last consumed token.
    #[inline]
    pub(crate) fn prev_end(&self) -> u32 {
        self.prev.map(Token::end).unwrap_or(0)
    }

    pub(crate) fn expect(&mut self, punct: Punctuation) -> ParseResult<&'t Token> {
        if self.at(punct) {
            let token = self.current();
            self.advance();
            Ok(token)
        } else {
            Err(self.unexpected(&format!("`{}`", punct.as_str())))
        }
    }

    /// Error for the current token not being what the grammar wants here.
    ///
    /// Closers without a partner report `UnbalancedBrace`; reaching the end of
    /// input with scopes still open reports `UnterminatedScope`.
    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.current();
        let position = token.start();
        if let TokenKind::Punctuation(
            punct @ (Punctuation::CloseBrace | Punctuation::CloseParen | Punctuation::CloseBracket),
        ) = token.kind
            && self.matching[self.pos].is_none()
        {
            return ParseError::new(
                position,
                ParseErrorKind::UnbalancedBrace {
                    found: punct.as_str().to_string(),
                },
            );
        }
        if token.is_eof()
            && let Some(open) = self.scope_stack.last().filter(|s| s.id != ScopeId::GLOBAL)
        {
            return ParseError::new(
                position,
                ParseErrorKind::UnterminatedScope {
                    opened_at: open.start,
                },
            );
        }
        ParseError::new(
            position,
            ParseErrorKind::Unexpected {
                expected: expected.to_string(),
                found: token.describe(),
            },
        )
    }

    pub(crate) fn unsupported(&self, feature: &'static str) -> ParseError {
        ParseError::new(
            self.current().start(),
            ParseErrorKind::Unsupported { feature },
        )
    }

    /// Index of the `)` partnering the `(` at `open`, when it is followed by `=>`.
    pub(crate) fn paren_starts_arrow(&self, open: usize) -> bool {
        self.matching
            .get(open)
            .copied()
            .flatten()
            .and_then(|close| self.tokens.get(close + 1))
            .is_some_and(|t| t.is_punct(Punctuation::Arrow))
    }

    // Nesting limits

    pub(crate) fn enter(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > self.options.max_nesting_depth {
            return Err(ParseError::new(
                self.current().start(),
                ParseErrorKind::NestingTooDeep {
                    limit: self.options.max_nesting_depth,
                },
            ));
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // Scope management

    #[inline]
    pub(crate) fn current_scope(&self) -> ScopeId {
        self.scope_stack
            .last()
            .map(|s| s.id)
            .unwrap_or(ScopeId::GLOBAL)
    }

    pub(crate) fn open_scope(
        &mut self,
        kind: ScopeKind,
        label: impl Into<String>,
        start: u32,
        opener: ScopeOpener,
    ) -> ParseResult<ScopeId> {
        self.enter()?;
        let id = ScopeId(self.scopes.len() as u32);
        let parent = self.current_scope();
        let label = label.into();
        debug!(scope = id.0, parent = parent.0, kind = kind.as_str(), label = %label, start, "open scope");

        self.scopes
            .push(ScopeNode::new(id, kind, label, Some(parent), start));
        self.scopes[parent.index()].children.push(id);
        self.scope_stack.push(OpenScope { id, opener, start });
        Ok(id)
    }

    /// Record that the scope on top of the stack continues into the `{` at the cursor.
    pub(crate) fn attach_brace(&mut self) {
        let open = self.pos;
        if let Some(top) = self.scope_stack.last_mut() {
            top.opener = ScopeOpener::Brace(open);
        }
    }

    pub(crate) fn close_scope(&mut self, id: ScopeId, end: u32) {
        let frame = self.scope_stack.pop();
        debug_assert_eq!(frame.map(|f| f.id), Some(id), "scope stack out of sync");
        self.scopes[id.index()].range.end = end;
        self.leave();
        debug!(scope = id.0, end, "close scope");
    }

    /// Consume the `}` closing brace scope `id`.
    pub(crate) fn close_brace_scope(&mut self, id: ScopeId) -> ParseResult<()> {
        if !self.at(Punctuation::CloseBrace) {
            return Err(self.unexpected("`}`"));
        }
        let close = self.current();
        let opened_by = self.scope_stack.last().map(|f| f.opener);
        let matches = match opened_by {
            Some(ScopeOpener::Brace(open)) => self.matching[open] == Some(self.pos),
            _ => false,
        };
        if !matches {
            return Err(ParseError::new(
                close.start(),
                ParseErrorKind::UnbalancedBrace {
                    found: "}".to_string(),
                },
            ));
        }
        self.advance();
        self.close_scope(id, close.end());
        Ok(())
    }

    /// Scope a declaration of `kind` lands in: the nearest function (or the
    /// global) scope for hoisted kinds, the innermost open scope otherwise.
    fn declaration_target(&self, kind: DeclKind) -> ScopeId {
        if !kind.hoists() {
            return self.current_scope();
        }
        self.scope_stack
            .iter()
            .rev()
            .map(|frame| frame.id)
            .find(|id| self.scopes[id.index()].kind.is_function_boundary())
            .unwrap_or(ScopeId::GLOBAL)
    }

    pub(crate) fn declare(&mut self, name: &Token, kind: DeclKind) -> BindingId {
        let target = self.declaration_target(kind);
        let scope = &mut self.scopes[target.index()];

        if let Some(&existing) = scope.declarations.get(&name.lexeme) {
            let binding = &mut self.bindings[existing.index()];
            trace!(name = %name.lexeme, scope = target.0, from = binding.kind.as_str(), to = kind.as_str(), "redeclare");
            binding.kind = kind;
            binding.earlier_declarations.push(binding.declared_at);
            binding.declared_at = name.span;
            return existing;
        }

        let id = BindingId(self.bindings.len() as u32);
        scope.declarations.insert(name.lexeme.clone(), id);
        self.bindings.push(Binding {
            id,
            name: name.lexeme.clone(),
            kind,
            declared_at: name.span,
            earlier_declarations: Vec::new(),
            scope: target,
        });
        trace!(name = %name.lexeme, scope = target.0, kind = kind.as_str(), "declare");
        id
    }

    pub(crate) fn reference(&mut self, name: &Token) {
        self.references.push(Reference {
            name: name.lexeme.clone(),
            span: name.span,
            scope: self.current_scope(),
        });
    }
}

/// Pair every bracket with its partner. Closers that do not match the
/// innermost opener are left unpaired and surface later as parse errors.
fn match_brackets(tokens: &[&Token]) -> Vec<Option<usize>> {
    let mut matching = vec![None; tokens.len()];
    let mut open: SmallVec<[(usize, Punctuation); 32]> = SmallVec::new();

    for (idx, token) in tokens.iter().enumerate() {
        let TokenKind::Punctuation(punct) = token.kind else {
            continue;
        };
        match punct {
            Punctuation::OpenBrace => open.push((idx, Punctuation::CloseBrace)),
            Punctuation::OpenParen => open.push((idx, Punctuation::CloseParen)),
            Punctuation::OpenBracket => open.push((idx, Punctuation::CloseBracket)),
            Punctuation::CloseBrace | Punctuation::CloseParen | Punctuation::CloseBracket => {
                if let Some(&(start, closer)) = open.last()
                    && closer == punct
                {
                    open.pop();
                    matching[start] = Some(idx);
                    matching[idx] = Some(start);
                }
            }
            _ => {}
        }
    }

    matching
}
