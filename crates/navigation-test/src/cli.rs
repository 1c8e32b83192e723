//! CLI regression tests for the `navigation` binary.
//!
//! These tests invoke the binary as a subprocess to catch regressions in flag
//! names, exit codes, and output formats.
//!
//! Run with: `cargo test -p navigation-test`
//! Requires the `navigation` binary to be built first (`cargo build -p navigation`).

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

use crate::fixture_path;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns an assert_cmd Command wrapping the `navigation` binary.
fn navigation() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("navigation")
        .expect("navigation binary not found; run `cargo build -p navigation` first")
}

fn stdout_json(output: &[u8]) -> serde_json::Value {
    let s = std::str::from_utf8(output).expect("stdout should be valid UTF-8");
    serde_json::from_str(s).expect("stdout should be valid JSON")
}

// ---------------------------------------------------------------------------
// navigation compile
// ---------------------------------------------------------------------------

#[test]
fn compile_writes_plan_to_stdout() {
    let output = navigation()
        .args(["compile", "--config"])
        .arg(fixture_path("navigation.yaml"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let plan = stdout_json(&output);
    assert_eq!(plan["plan_format_version"], 1);
    assert_eq!(plan["source"]["file"], "navigation.yaml");
    let entries = plan["entries"].as_object().expect("entries should be an object");
    assert_eq!(entries.len(), 5);
    assert!(entries.contains_key("navigation.menu.main"));
    assert!(entries.contains_key("navigation.breadcrumbs.profile_edit"));
}

#[test]
fn compile_writes_plan_to_output_file() {
    let tmp = TempDir::new().expect("temp dir");
    let output = tmp.path().join("plan.json");

    navigation()
        .args(["compile", "--config"])
        .arg(fixture_path("navigation.yaml"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(contains("5 entries"));

    let content = std::fs::read(&output).expect("plan file should exist");
    let plan = stdout_json(&content);
    assert!(plan["entries"]["navigation.menu.footer"].is_object());
}

#[test]
fn compile_custom_namespace_and_alias_tag() {
    let output = navigation()
        .args(["compile", "--config"])
        .arg(fixture_path("navigation.yaml"))
        .args(["--namespace", "acme_nav", "--alias-tag", "knp_menu.menu"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let plan = stdout_json(&output);
    let main = &plan["entries"]["acme_nav.menu.main"];
    assert_eq!(main["tags"]["knp_menu.menu"][0]["alias"], "main");
}

#[test]
fn compile_missing_config_flag_exits_two() {
    // --config is required; clap returns exit code 2 for missing required args
    navigation().args(["compile"]).assert().failure().code(2);
}

#[test]
fn compile_nonexistent_config_exits_one() {
    navigation()
        .args(["compile", "--config", "nonexistent.yaml"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("not found"));
}

#[test]
fn compile_parse_error_exits_one() {
    navigation()
        .args(["compile", "--config"])
        .arg(fixture_path("invalid-parse-error.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2001"));
}

#[test]
fn compile_circular_breadcrumbs_exits_one() {
    navigation()
        .args(["compile", "--config"])
        .arg(fixture_path("invalid-circular-breadcrumbs.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2011"))
        .stderr(contains("x -> y"));
}

#[test]
fn compile_missing_parent_exits_one() {
    navigation()
        .args(["compile", "--config"])
        .arg(fixture_path("invalid-missing-parent.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2010"))
        .stderr(contains("'z'"));
}

#[test]
fn compile_unknown_item_key_needs_lenient() {
    navigation()
        .args(["compile", "--config"])
        .arg(fixture_path("unknown-item-key.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("E2002"));

    navigation()
        .args(["compile", "--lenient", "--config"])
        .arg(fixture_path("unknown-item-key.yaml"))
        .assert()
        .success();
}

#[test]
fn compile_reports_warnings_on_stderr() {
    navigation()
        .args(["compile", "--config"])
        .arg(fixture_path("warnings.yaml"))
        .assert()
        .success()
        .stderr(contains("W2030"));
}

// ---------------------------------------------------------------------------
// navigation validate
// ---------------------------------------------------------------------------

#[test]
fn validate_valid_config_exits_zero() {
    navigation()
        .args(["validate", "--config"])
        .arg(fixture_path("navigation.yaml"))
        .assert()
        .success()
        .stderr(contains("is valid"));
}

#[test]
fn validate_invalid_item_exits_one() {
    navigation()
        .args(["validate", "--config"])
        .arg(fixture_path("invalid-item.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("menus.main.items.home"));
}

#[test]
fn validate_missing_file_exits_one() {
    navigation()
        .args(["validate", "--config", "this-file-does-not-exist.yaml"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn validate_multiple_configs_reports_each() {
    navigation()
        .args(["validate", "--config"])
        .arg(fixture_path("navigation.yaml"))
        .arg(fixture_path("invalid-missing-parent.yaml"))
        .assert()
        .failure()
        .code(1)
        .stderr(contains("1 valid, 1 invalid"));
}

#[test]
fn validate_json_format_outputs_valid_json() {
    let output = navigation()
        .args(["validate", "--config"])
        .arg(fixture_path("warnings.yaml"))
        .args(["--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let v = stdout_json(&output);
    assert!(v.get("results").is_some(), "JSON output missing 'results' key");
    assert_eq!(v["summary"]["valid"], 1);
    assert_eq!(v["results"][0]["warnings"][0]["code"], "W2030");
}

#[test]
fn validate_json_format_invalid_config_exits_one_with_json() {
    let output = navigation()
        .args(["validate", "--config"])
        .arg(fixture_path("invalid-circular-breadcrumbs.yaml"))
        .args(["--format", "json"])
        .assert()
        .failure()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let v = stdout_json(&output);
    let results = v["results"].as_array().expect("results should be an array");
    assert_eq!(results[0]["valid"], false);
    assert_eq!(results[0]["errors"][0]["code"], "E2011");
}
