//! Tests for the `scopetrace` binary.

use std::path::Path;
use std::process::{Command, Output};

fn scopetrace(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scopetrace"))
        .args(args)
        .current_dir(cwd)
        .env_remove("SCOPETRACE_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run scopetrace")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn prints_scope_tree_for_a_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("app.js"),
        "function greet(name) {\n  return `hi ${name}`;\n}\ngreet(user);\n",
    )
    .unwrap();

    let output = scopetrace(&["app.js", "--unresolved"], dir.path());
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.starts_with("app.js\nGlobal (global) 1:1-5:1\n"), "{out}");
    assert!(out.contains("  function greet (1 use)"), "{out}");
    assert!(out.contains("  greet (function) 1:15-3:2"), "{out}");
    assert!(out.contains("    param name (0 uses)"), "{out}");
    assert!(out.contains("app.js:4:7 - warning: `user`"), "{out}");
}

#[test]
fn walks_directories_and_emits_json() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("src/vendor")).unwrap();
    std::fs::write(dir.path().join("src/a.js"), "let a = 1;").unwrap();
    std::fs::write(dir.path().join("src/b.cjs"), "module.exports = {};").unwrap();
    std::fs::write(dir.path().join("src/notes.txt"), "{").unwrap();
    std::fs::write(dir.path().join("src/vendor/big.js"), "{").unwrap();

    let output = scopetrace(
        &["src", "--format", "json", "--exclude", "**/vendor/**"],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(0));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let paths: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths.len(), 2);
    assert!(paths[0].ends_with("a.js"));
    assert!(paths[1].ends_with("b.cjs"));
    assert_eq!(value[1]["unresolved"][0]["name"], "module");
}

#[test]
fn exit_codes() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("ok.js"), "let a = 1; a;").unwrap();
    std::fs::write(dir.path().join("lint.js"), "undeclared();").unwrap();
    std::fs::write(dir.path().join("broken.js"), "if (x) {").unwrap();

    assert_eq!(
        scopetrace(&["ok.js", "--fail-on-unresolved"], dir.path())
            .status
            .code(),
        Some(0)
    );
    assert_eq!(
        scopetrace(&["lint.js", "--fail-on-unresolved"], dir.path())
            .status
            .code(),
        Some(2)
    );
    let broken = scopetrace(&["broken.js"], dir.path());
    assert_eq!(broken.status.code(), Some(1));
    assert!(stdout(&broken).contains("broken.js:1:9 - error: unterminated scope opened at offset 7"));
}

#[test]
fn bad_arguments_fail() {
    let dir = tempfile::tempdir().unwrap();
    let missing = scopetrace(&["nope.js"], dir.path());
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("path does not exist"));

    let no_paths = scopetrace(&[], dir.path());
    assert!(!no_paths.status.success());
}

#[test]
fn config_file_limits_apply() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("deep.js"), "{{{}}}").unwrap();
    std::fs::write(dir.path().join("scopetrace.json"), r#"{ "maxNestingDepth": 2 }"#).unwrap();

    let output = scopetrace(&["deep.js", "--config", "scopetrace.json"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("nesting deeper than 2 levels"));

    let output = scopetrace(
        &["deep.js", "--config", "scopetrace.json", "--max-nesting-depth", "3"],
        dir.path(),
    );
    assert_eq!(output.status.code(), Some(0));
}
