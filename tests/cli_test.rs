//! Exit status and output of the go-complexity-lint binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_go-complexity-lint"))
}

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    bin()
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("binary should run")
}

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

const FIVE_PARAMS: &str = "package app\n\nfunc Five(a, b, c, d, e int) {}\n";

fn module(source: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "go.mod", "module example.com/app\n");
    write(tmp.path(), "app.go", source);
    tmp
}

#[test]
fn test_no_arguments_prints_usage() {
    let tmp = TempDir::new().unwrap();
    let out = run_in(tmp.path(), &[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
}

#[test]
fn test_warnings_exit_zero() {
    let tmp = module(FIVE_PARAMS);
    let out = run_in(tmp.path(), &["./..."]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&out.stderr),
        "app.go:3:1: function Five has 5 parameters (warn: >4, fail: >6) [warning]\n"
    );
}

#[test]
fn test_errors_exit_one() {
    let tmp = module(FIVE_PARAMS);
    let out = run_in(tmp.path(), &["--params.fail", "4", "--params.warn=3", "."]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr)
        .contains("function Five has 5 parameters (warn: >3, fail: >4) [error]"));
}

#[test]
fn test_invalid_threshold_flag() {
    let tmp = module(FIVE_PARAMS);
    let out = run_in(tmp.path(), &["--cyclo.warn", "-1", "./..."]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("invalid cyclo thresholds"), "{}", stderr);
    assert!(!stderr.contains("parameters"));

    let out = run_in(tmp.path(), &["--nestdepth.warn", "9", "./..."]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("must not exceed"));
}

#[test]
fn test_config_file_is_discovered() {
    let tmp = module(FIVE_PARAMS);
    write(
        tmp.path(),
        ".complexity-lint.yaml",
        "thresholds:\n  params: { warn: 5 }\n",
    );
    let out = run_in(tmp.path(), &["./..."]);
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stderr.is_empty(), "{}", String::from_utf8_lossy(&out.stderr));

    // Flags win over the config file.
    let out = run_in(tmp.path(), &["--params.warn", "2", "./..."]);
    assert!(String::from_utf8_lossy(&out.stderr).contains("(warn: >2, fail: >6)"));
}

#[test]
fn test_explicit_missing_config() {
    let tmp = module(FIVE_PARAMS);
    let out = run_in(tmp.path(), &["--config", "missing.yaml", "./..."]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing.yaml"));
}

#[test]
fn test_syntax_error_fails_without_diagnostics() {
    let tmp = module(FIVE_PARAMS);
    write(tmp.path(), "broken/broken.go", "package broken\n\nfunc f( {\n");
    let out = run_in(tmp.path(), &["./..."]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("broken/broken.go:"), "{}", stderr);
    assert!(stderr.contains("syntax error"));
    assert!(!stderr.contains("parameters"));
}

#[test]
fn test_missing_pattern() {
    let tmp = module(FIVE_PARAMS);
    let out = run_in(tmp.path(), &["nope/..."]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("no such file or directory"));
}

#[test]
fn test_test_files_flag() {
    let tmp = module("package app\n\nfunc ok() {}\n");
    write(
        tmp.path(),
        "app_test.go",
        "package app\n\nfunc helper(a, b, c, d, e, f, g int) {}\n",
    );
    let out = run_in(tmp.path(), &["./..."]);
    assert_eq!(out.status.code(), Some(0));

    let out = run_in(tmp.path(), &["--tests", "./..."]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("app_test.go:3:1: function helper has 7 parameters"));
}

#[test]
fn test_fixture_module_json() {
    let out = run_in(&testdata_path(), &["--format", "json", "./..."]);
    assert_eq!(out.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("stdout is JSON");
    assert_eq!(value["passed"], false);
    assert_eq!(value["errors"], 4);
}

#[test]
fn test_fixture_override_passes() {
    let out = run_in(&testdata_path(), &["nestdepth/override.go"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stderr.is_empty());
}
