use super::reporter::Reporter;
use crate::analysis::analyze;

#[test]
fn renders_scope_cards_without_color() {
    let analysis = analyze("let a = 1;\n{ let b = a; }\n").unwrap();
    let rendered = Reporter::new(false).render_tree("app.js", &analysis);
    assert_eq!(
        rendered,
        "app.js\n\
         Global (global) 1:1-3:1\n\
         \x20\x20let a (1 use)\n\
         \x20\x20block (block) 2:1-2:15\n\
         \x20\x20\x20\x20let b (0 uses)\n"
    );
}

#[test]
fn renders_unresolved_warnings() {
    let analysis = analyze("foo(bar)").unwrap();
    let rendered = Reporter::new(false).render_unresolved("app.js", &analysis);
    assert_eq!(
        rendered,
        "app.js:1:1 - warning: `foo` is not declared in any enclosing scope\n\
         app.js:1:5 - warning: `bar` is not declared in any enclosing scope\n"
    );
}

#[test]
fn renders_errors_with_location() {
    let source = "let a;\n}";
    let err = analyze(source).unwrap_err();
    let rendered = Reporter::new(false).render_error("app.js", source, &err);
    assert_eq!(
        rendered,
        "app.js:2:1 - error: unbalanced `}` at offset 7\n"
    );

    let rendered = Reporter::new(false).render_file_error("gone.js", "failed to read file");
    assert_eq!(rendered, "gone.js - error: failed to read file\n");
}

#[test]
fn color_mode_changes_output() {
    colored::control::set_override(true);
    let analysis = analyze("let a;").unwrap();
    let plain = Reporter::new(false).render_tree("app.js", &analysis);
    let painted = Reporter::new(true).render_tree("app.js", &analysis);
    colored::control::unset_override();
    assert_ne!(plain, painted);
    assert!(painted.contains("\u{1b}["));
}
