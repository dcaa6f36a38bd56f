use crate::*;

/// Scopes: 0 Global, 1 `f`.
/// Bindings: 0 `a` (global), 1 `f`, 2 `x`, 3 `a` (inside `f`).
/// Occurrences: `x`@37, `a`@49, `b`@53, `f`@58, `a`@60.
const SOURCE: &str = "let a = 1;\nfunction f(x) {\n  let a = x;\n  return a + b;\n}\nf(a);\n";

fn analysis() -> Analysis {
    analyze(SOURCE).expect("fixture should analyze")
}

fn names<'a>(bindings: &[&'a Binding]) -> Vec<&'a str> {
    bindings.iter().map(|b| b.name.as_str()).collect()
}

#[test]
fn test_variables_in_declaration_order() {
    let analysis = analysis();
    assert_eq!(
        names(&analysis.variables_in(ScopeId::GLOBAL).unwrap()),
        vec!["a", "f"]
    );
    assert_eq!(
        names(&analysis.variables_in(ScopeId(1)).unwrap()),
        vec!["x", "a"]
    );
    assert_eq!(
        analysis.variables_in(ScopeId(9)).unwrap_err(),
        NotFoundError::Scope { id: 9 }
    );
}

#[test]
fn test_scope_containing_picks_innermost() {
    let analysis = analysis();
    assert_eq!(analysis.scope_containing(0).unwrap().id, ScopeId::GLOBAL);
    assert_eq!(analysis.scope_containing(30).unwrap().label, "f");
    assert_eq!(analysis.scope_containing(21).unwrap().id, ScopeId(1));
    assert_eq!(analysis.scope_containing(57).unwrap().id, ScopeId(1));
    assert_eq!(analysis.scope_containing(58).unwrap().id, ScopeId::GLOBAL);
    assert_eq!(analysis.scope_containing(64).unwrap().id, ScopeId::GLOBAL);
    assert_eq!(
        analysis.scope_containing(65).unwrap_err(),
        NotFoundError::Offset {
            offset: 65,
            len: 64
        }
    );
}

#[test]
fn test_occurrences_of_binding() {
    let analysis = analysis();
    let spans = |id| -> Vec<TextSpan> {
        analysis
            .occurrences_of(BindingId(id))
            .unwrap()
            .into_iter()
            .map(|o| o.span)
            .collect()
    };
    assert_eq!(spans(3), vec![TextSpan::new(49, 50)]);
    assert_eq!(spans(0), vec![TextSpan::new(60, 61)]);
    assert_eq!(spans(1), vec![TextSpan::new(58, 59)]);
    assert_eq!(
        analysis.occurrences_of(BindingId(42)).unwrap_err(),
        NotFoundError::Binding { id: 42 }
    );
}

#[test]
fn test_declaration_of_occurrence() {
    let analysis = analysis();
    let inner_a = &analysis.occurrences()[1];
    let binding = analysis.declaration_of(inner_a).unwrap();
    assert_eq!(binding.id, BindingId(3));
    assert_eq!(binding.scope, ScopeId(1));
    assert_eq!(binding.kind, DeclKind::Let);

    let b = &analysis.occurrences()[2];
    assert_eq!(b.name, "b");
    assert!(analysis.declaration_of(b).is_none());
}

#[test]
fn test_occurrence_and_binding_at_offset() {
    let analysis = analysis();
    assert_eq!(analysis.occurrence_at(49).unwrap().name, "a");
    assert_eq!(analysis.occurrence_at(50).unwrap().name, "a");
    assert_eq!(analysis.occurrence_at(53).unwrap().name, "b");
    assert!(analysis.occurrence_at(45).is_none());

    assert_eq!(analysis.binding_at(4).unwrap().id, BindingId(0));
    assert_eq!(analysis.binding_at(60).unwrap().id, BindingId(0));
    assert_eq!(analysis.binding_at(49).unwrap().id, BindingId(3));
    assert!(analysis.binding_at(53).is_none());
}

#[test]
fn test_highlight() {
    let analysis = analysis();
    assert_eq!(
        analysis.highlight(60),
        vec![TextSpan::new(4, 5), TextSpan::new(60, 61)]
    );
    assert_eq!(
        analysis.highlight(33),
        vec![TextSpan::new(33, 34), TextSpan::new(49, 50)]
    );
    assert_eq!(analysis.highlight(53), vec![TextSpan::new(53, 54)]);
    assert!(analysis.highlight(15).is_empty());
}

#[test]
fn test_every_declaration_site_of_a_redeclared_name() {
    let analysis = analyze("var x; var x; x;").unwrap();
    assert_eq!(analysis.bindings().len(), 1);
    assert_eq!(analysis.binding_at(4).unwrap().id, BindingId(0));
    assert_eq!(analysis.binding_at(11).unwrap().id, BindingId(0));
    let all = vec![
        TextSpan::new(4, 5),
        TextSpan::new(11, 12),
        TextSpan::new(14, 15),
    ];
    assert_eq!(analysis.highlight(4), all);
    assert_eq!(analysis.highlight(14), all);
}

#[test]
fn test_unresolved_and_scope_chain() {
    let analysis = analysis();
    let unresolved: Vec<&str> = analysis.unresolved().map(|o| o.name.as_str()).collect();
    assert_eq!(unresolved, vec!["b"]);

    let chain: Vec<&str> = analysis
        .scope_chain(ScopeId(1))
        .unwrap()
        .map(|s| s.label.as_str())
        .collect();
    assert_eq!(chain, vec!["f", "Global"]);
    assert!(analysis.scope_chain(ScopeId(5)).is_err());
}

#[test]
fn test_analysis_accessors() {
    let analysis = analysis();
    assert_eq!(analysis.text(TextSpan::new(20, 21)), "f");
    assert_eq!(analysis.text(TextSpan::new(60, 600)), "");
    assert_eq!(analysis.source(), SOURCE);
    assert_eq!(analysis.scopes().len(), 2);
    assert_eq!(analysis.bindings().len(), 4);
    assert_eq!(analysis.occurrences().len(), 5);
}

#[test]
fn test_analysis_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Analysis>();
}

#[test]
fn test_analyze_batch_keeps_order() {
    let sources = ["let a;", "}", "b"];
    let results = analyze_batch(&sources, &AnalyzeOptions::default());
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(AnalyzeError::Parse(_))));
    assert_eq!(
        results[2].as_ref().unwrap().unresolved().count(),
        1
    );
}

#[test]
fn test_options_bound_the_work() {
    let options = AnalyzeOptions {
        max_tokens: Some(2),
        ..AnalyzeOptions::default()
    };
    let err = analyze_with_options("a b c", &options).unwrap_err();
    assert!(matches!(
        err,
        AnalyzeError::Lex(LexError {
            reason: LexErrorKind::TokenLimitExceeded { limit: 2 },
            ..
        })
    ));

    let options = AnalyzeOptions {
        max_nesting_depth: 1,
        ..AnalyzeOptions::default()
    };
    let err = analyze_with_options("{{}}", &options).unwrap_err();
    assert!(matches!(
        err,
        AnalyzeError::Parse(ParseError {
            reason: ParseErrorKind::NestingTooDeep { limit: 1 },
            position: 1,
        })
    ));
    assert_eq!(err.position(), 1);
}

#[test]
fn test_lex_errors_surface_with_position() {
    let err = analyze("let s = 'x").unwrap_err();
    assert!(matches!(err, AnalyzeError::Lex(_)));
    assert_eq!(err.position(), 8);
}
