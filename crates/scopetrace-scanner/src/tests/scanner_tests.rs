//! Tests for the scanner.

use crate::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .expect("source should tokenize")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn lexemes(source: &str) -> Vec<String> {
    tokenize(source)
        .expect("source should tokenize")
        .into_iter()
        .filter(|t| !t.is_eof())
        .map(|t| t.lexeme)
        .collect()
}

#[test]
fn test_scan_empty() {
    assert_eq!(kinds(""), vec![TokenKind::EndOfFile]);
    assert_eq!(kinds("   \n\t "), vec![TokenKind::EndOfFile]);
}

#[test]
fn test_scan_punctuation() {
    assert_eq!(
        kinds("{}()[];,"),
        vec![
            TokenKind::Punctuation(Punctuation::OpenBrace),
            TokenKind::Punctuation(Punctuation::CloseBrace),
            TokenKind::Punctuation(Punctuation::OpenParen),
            TokenKind::Punctuation(Punctuation::CloseParen),
            TokenKind::Punctuation(Punctuation::OpenBracket),
            TokenKind::Punctuation(Punctuation::CloseBracket),
            TokenKind::Punctuation(Punctuation::Semicolon),
            TokenKind::Punctuation(Punctuation::Comma),
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn test_scan_compound_operators_maximal_munch() {
    assert_eq!(
        lexemes("=== !== == != => && || ?? ?. ... >>>= ++ --"),
        vec![
            "===", "!==", "==", "!=", "=>", "&&", "||", "??", "?.", "...", ">>>=", "++", "--"
        ]
    );
    let tokens = tokenize("a => b").unwrap();
    assert!(tokens[1].is_punct(Punctuation::Arrow));
    let tokens = tokenize("a += b").unwrap();
    assert!(tokens[1].is_operator("+="));
}

#[test]
fn test_optional_chain_followed_by_digit_is_conditional() {
    assert_eq!(lexemes("a?.5:b"), vec!["a", "?", ".5", ":", "b"]);
}

#[test]
fn test_scan_keywords_and_identifiers() {
    let tokens = tokenize("function foo let $bar _baz of async").unwrap();
    assert!(tokens[0].is_keyword(Keyword::Function));
    assert!(tokens[1].is_identifier());
    assert!(tokens[2].is_keyword(Keyword::Let));
    assert_eq!(tokens[3].lexeme, "$bar");
    assert_eq!(tokens[4].lexeme, "_baz");
    assert!(tokens[5].is_contextual("of"));
    assert!(tokens[6].is_contextual("async"));
}

#[test]
fn test_keyword_lookup() {
    assert_eq!(Keyword::from_text("while"), Some(Keyword::While));
    assert_eq!(Keyword::from_text("catch"), Some(Keyword::Catch));
    assert_eq!(Keyword::from_text("whilst"), None);
    assert!(Keyword::This.is_value());
    assert!(!Keyword::Typeof.is_value());
    assert!(Keyword::If.starts_statement());
    assert!(!Keyword::Function.starts_statement());
}

#[test]
fn test_scan_string_literals() {
    let tokens = tokenize(r#"'single' "double" "esc\"aped" 'it\'s'"#).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[0].lexeme, "'single'");
    assert_eq!(tokens[1].lexeme, "\"double\"");
    assert_eq!(tokens[2].lexeme, r#""esc\"aped""#);
    assert_eq!(tokens[3].lexeme, r"'it\'s'");
    assert!(tokens[4].is_eof());
}

#[test]
fn test_string_contents_are_not_scanned() {
    assert_eq!(
        kinds(r#""{ not a scope }""#),
        vec![TokenKind::StringLiteral, TokenKind::EndOfFile]
    );
    assert_eq!(
        kinds("'function if for {'"),
        vec![TokenKind::StringLiteral, TokenKind::EndOfFile]
    );
}

#[test]
fn test_comments_are_single_tokens() {
    let tokens = tokenize("// { not a scope\nx /* } */ y").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Comment);
    assert_eq!(tokens[0].lexeme, "// { not a scope");
    assert!(tokens[1].is_identifier());
    assert_eq!(tokens[2].kind, TokenKind::Comment);
    assert!(tokens[2].flags.contains(TokenFlags::BLOCK_COMMENT));
    assert_eq!(tokens[3].lexeme, "y");
}

#[test]
fn test_template_literal_with_substitution() {
    let source = "`a ${ {b: '}'} } c` + d";
    let tokens = tokenize(source).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert!(tokens[0].flags.contains(TokenFlags::TEMPLATE));
    assert!(tokens[0].flags.contains(TokenFlags::SUBSTITUTION));
    assert_eq!(tokens[0].lexeme, "`a ${ {b: '}'} } c`");
    assert!(tokens[1].is_operator("+"));
    assert_eq!(tokens[2].lexeme, "d");
}

#[test]
fn test_template_may_span_lines() {
    let tokens = tokenize("`line one\nline two`").unwrap();
    assert_eq!(tokens.len(), 2);
    assert!(tokens[0].flags.contains(TokenFlags::TEMPLATE));
    assert!(!tokens[0].flags.contains(TokenFlags::SUBSTITUTION));
}

#[test]
fn test_scan_numbers() {
    assert_eq!(
        lexemes("42 3.14 .5 1e10 2E-3 0xFF 0b1010 0o17 1_000 123n"),
        vec!["42", "3.14", ".5", "1e10", "2E-3", "0xFF", "0b1010", "0o17", "1_000", "123n"]
    );
    assert!(
        tokenize("7")
            .unwrap()
            .first()
            .is_some_and(|t| t.kind == TokenKind::NumericLiteral)
    );
}

#[test]
fn test_regex_versus_division() {
    let tokens = tokenize("a / b").unwrap();
    assert!(tokens[1].is_operator("/"));

    let tokens = tokenize("x = /{[/]}/g").unwrap();
    assert_eq!(tokens[2].kind, TokenKind::RegexLiteral);
    assert_eq!(tokens[2].lexeme, "/{[/]}/g");

    let tokens = tokenize("f(a) / 2").unwrap();
    assert!(tokens[4].is_operator("/"));

    let tokens = tokenize("return /ab+c/.test(s)").unwrap();
    assert_eq!(tokens[1].kind, TokenKind::RegexLiteral);
}

#[test]
fn test_regex_after_control_header_and_block() {
    let tokens = tokenize("if (ok) /\\{/.test(s)").unwrap();
    assert_eq!(tokens[4].kind, TokenKind::RegexLiteral);
    assert_eq!(tokens[4].lexeme, "/\\{/");

    let tokens = tokenize("if (a) {}\n/}/.test(s)").unwrap();
    assert_eq!(tokens[6].kind, TokenKind::RegexLiteral);
    assert_eq!(tokens[6].lexeme, "/}/");

    let tokens = tokenize("for await (x of xs) /a/").unwrap();
    assert_eq!(tokens[7].kind, TokenKind::RegexLiteral);

    // object literal and grouping still end an operand
    let tokens = tokenize("x = {a: 1} / 2").unwrap();
    assert!(tokens[7].is_operator("/"));
    let tokens = tokenize("if ((a) / b) {}").unwrap();
    assert!(tokens[5].is_operator("/"));
}

#[test]
fn test_hashbang_is_trivia() {
    let tokens = tokenize("#!/usr/bin/env node\nlet a;").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Comment);
    assert_eq!(tokens[0].lexeme, "#!/usr/bin/env node");
    assert_eq!(tokens[1].kind, TokenKind::Keyword(Keyword::Let));
    assert!(tokens[1].has_preceding_line_break());

    let err = tokenize("a #!b").unwrap_err();
    assert_eq!(err.position, 2);
    assert_eq!(err.reason, LexErrorKind::UnexpectedCharacter { character: '#' });
}

#[test]
fn test_preceding_line_break_flag() {
    let tokens = tokenize("a\nb c /* x\n */ d").unwrap();
    assert!(!tokens[0].has_preceding_line_break());
    assert!(tokens[1].has_preceding_line_break());
    assert!(!tokens[2].has_preceding_line_break());
    // the line break inside the block comment carries over to `d`
    assert!(tokens[4].has_preceding_line_break());
}

#[test]
fn test_spans_are_byte_offsets() {
    let tokens = tokenize("let  é = 'é';").unwrap_err();
    assert_eq!(tokens.position, 5);
    assert_eq!(
        tokens.reason,
        LexErrorKind::UnexpectedCharacter { character: 'é' }
    );

    let tokens = tokenize("s = 'é'; t").unwrap();
    assert_eq!(tokens[2].span.start, 4);
    assert_eq!(tokens[2].span.end, 8);
    assert_eq!(tokens[4].start(), 10);
}

#[test]
fn test_unterminated_string() {
    let err = tokenize("let s = \"oops").unwrap_err();
    assert_eq!(err.reason, LexErrorKind::UnterminatedString);
    assert_eq!(err.position, 8);

    let err = tokenize("'broken\nline'").unwrap_err();
    assert_eq!(err.reason, LexErrorKind::UnterminatedString);
}

#[test]
fn test_unterminated_comment_and_template() {
    let err = tokenize("x /* never closed").unwrap_err();
    assert_eq!(err.reason, LexErrorKind::UnterminatedComment);
    assert_eq!(err.position, 2);

    let err = tokenize("`abc ${ d ").unwrap_err();
    assert_eq!(err.reason, LexErrorKind::UnterminatedTemplate);
    assert_eq!(err.position, 0);

    let err = tokenize("x = /abc").unwrap_err();
    assert_eq!(err.reason, LexErrorKind::UnterminatedRegex);
}

#[test]
fn test_error_message_includes_position() {
    let err = tokenize("a # b").unwrap_err();
    assert_eq!(err.to_string(), "unexpected character '#' at offset 2");
}

#[test]
fn test_token_limit() {
    assert!(tokenize_with_limit("a b c", Some(3)).is_ok());
    let err = tokenize_with_limit("a b c d", Some(3)).unwrap_err();
    assert_eq!(err.reason, LexErrorKind::TokenLimitExceeded { limit: 3 });
    assert_eq!(err.position, 6);
}

#[test]
fn test_scanner_is_lazy_and_fused() {
    let mut scanner = Scanner::new("a \"unterminated");
    assert!(scanner.next().is_some_and(|t| t.is_ok()));
    assert!(scanner.next().is_some_and(|t| t.is_err()));
    assert!(scanner.next().is_none());
    assert!(scanner.next().is_none());
}

#[test]
fn test_scanner_is_restartable() {
    let source = "function f(a) { return a + 1; } // done";
    let first = tokenize(source).unwrap();
    let second = tokenize(source).unwrap();
    assert_eq!(first, second);

    let mut scanner = Scanner::new(source);
    let streamed: Vec<Token> = scanner.by_ref().map(|t| t.unwrap()).collect();
    scanner.reset();
    let replayed: Vec<Token> = scanner.map(|t| t.unwrap()).collect();
    assert_eq!(streamed, first);
    assert_eq!(replayed, first);
}
