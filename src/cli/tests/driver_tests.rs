use clap::Parser;
use std::path::{Path, PathBuf};

use super::args::CliArgs;
use super::driver::{
    EXIT_ANALYSIS_FAILED, EXIT_SUCCESS, EXIT_UNRESOLVED, build_exclude_set, discover_files, run,
};

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

fn run_with(args: &[&str]) -> (i32, String) {
    let mut argv = vec!["scopetrace"];
    argv.extend_from_slice(args);
    let args = CliArgs::try_parse_from(argv).unwrap();
    let mut out = Vec::new();
    let code = run(&args, false, &mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
}

#[test]
fn discovers_javascript_sources_and_honors_excludes() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.js", "b.mjs", "c.cjs", "d.ts", "sub/e.js", "vendor/f.js"] {
        write(dir.path(), name, "");
    }

    let exclude = build_exclude_set(&["**/vendor/**".to_string()]).unwrap();
    let files = discover_files(&[dir.path().to_path_buf()], &exclude).unwrap();
    let relative: Vec<PathBuf> = files
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        relative,
        vec![
            PathBuf::from("a.js"),
            PathBuf::from("b.mjs"),
            PathBuf::from("c.cjs"),
            PathBuf::from("sub/e.js"),
        ]
    );
}

#[test]
fn explicit_files_are_kept_and_deduplicated() {
    let dir = tempfile::tempdir().unwrap();
    let ts = write(dir.path(), "d.ts", "");
    let exclude = build_exclude_set(&[]).unwrap();
    let files = discover_files(&[ts.clone(), ts.clone()], &exclude).unwrap();
    assert_eq!(files, vec![ts]);
}

#[test]
fn missing_path_is_an_error() {
    let exclude = build_exclude_set(&[]).unwrap();
    let err = discover_files(&[PathBuf::from("/definitely/not/here.js")], &exclude).unwrap_err();
    assert!(err.to_string().contains("path does not exist"));
}

#[test]
fn invalid_exclude_glob_is_an_error() {
    assert!(build_exclude_set(&["a[".to_string()]).is_err());
}

#[test]
fn text_output_and_exit_codes() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(
        dir.path(),
        "app.js",
        "let a = 1;\nfunction f(x) { return a + x + y; }\n",
    );
    let path = file.to_string_lossy().to_string();

    let (code, out) = run_with(&[&path, "--unresolved"]);
    assert_eq!(code, EXIT_SUCCESS);
    assert!(out.contains("Global (global)"));
    assert!(out.contains("  f (function)"));
    assert!(out.contains("let a (1 use)"));
    assert!(out.contains("warning: `y` is not declared in any enclosing scope"));

    let (code, out) = run_with(&[&path]);
    assert_eq!(code, EXIT_SUCCESS);
    assert!(!out.contains("warning"));

    let (code, _) = run_with(&[&path, "--fail-on-unresolved"]);
    assert_eq!(code, EXIT_UNRESOLVED);
}

#[test]
fn analysis_failure_wins_over_unresolved() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bad.js", "}");
    write(dir.path(), "good.js", "use(x);");
    let root = dir.path().to_string_lossy().to_string();

    let (code, out) = run_with(&[&root, "--fail-on-unresolved"]);
    assert_eq!(code, EXIT_ANALYSIS_FAILED);
    assert!(out.contains("bad.js:1:1 - error: unbalanced `}` at offset 0"));
    assert!(out.contains("`use` is not declared"));
}

#[test]
fn json_output() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.js", "let a = 1;\nfunction f(x) { return a + x + y; }\n");
    write(dir.path(), "b.js", "{");
    let root = dir.path().to_string_lossy().to_string();

    let (code, out) = run_with(&[&root, "--format", "json"]);
    assert_eq!(code, EXIT_ANALYSIS_FAILED);

    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let files = value.as_array().unwrap();
    assert_eq!(files.len(), 2);

    let a = &files[0];
    assert!(a["path"].as_str().unwrap().ends_with("a.js"));
    assert_eq!(a["scopes"]["label"], "Global");
    assert_eq!(a["scopes"]["children"][0]["label"], "f");
    assert_eq!(a["unresolved"][0]["name"], "y");
    assert!(a.get("error").is_none());

    let b = &files[1];
    assert!(b.get("scopes").is_none());
    assert_eq!(b["error"]["stage"], "parse");
    assert_eq!(b["error"]["reason"]["kind"], "unterminatedScope");
    assert!(
        b["message"]
            .as_str()
            .unwrap()
            .starts_with("unterminated scope opened at offset 0")
    );
}
