//! CLI integration tests: `sf` run as a process against a temporary project.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Path to the compiled sf binary (resolved at compile time)
fn sf_bin() -> String {
    env!("CARGO_BIN_EXE_sf").to_string()
}

fn sf(project: &Path, args: &[&str]) -> Output {
    Command::new(sf_bin())
        .arg("--project-dir")
        .arg(project)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run sf")
}

fn combined(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

/// Initialised project with three table deltas and a post delta for 001.
fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let output = sf(dir.path(), &["init", "--name", "cli_test"]);
    assert!(output.status.success(), "init failed: {}", combined(&output));

    let deltas = dir.path().join("deltas");
    for i in 0..3 {
        fs::write(
            deltas.join(format!("00{i}_t{i}.up.sql")),
            format!("CREATE TABLE t{i} (id INTEGER);"),
        )
        .unwrap();
        fs::write(
            deltas.join(format!("00{i}_t{i}.down.sql")),
            format!("DROP TABLE t{i};"),
        )
        .unwrap();
    }
    fs::write(deltas.join("001_t1.post.sql"), "INSERT INTO t1 VALUES (1);").unwrap();
    dir
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!("stdout is not JSON ({e}): {}", combined(output));
    })
}

#[test]
fn test_up_then_nothing_to_apply() {
    let dir = project();

    let first = sf(dir.path(), &["up"]);
    assert!(first.status.success(), "{}", combined(&first));
    assert!(String::from_utf8_lossy(&first.stdout).contains("Ran 3 of 3 up delta(s)"));

    let second = sf(dir.path(), &["up"]);
    assert!(!second.status.success());
    assert!(combined(&second).contains("[X003]"));
}

#[test]
fn test_json_report() {
    let dir = project();

    let output = sf(dir.path(), &["--output", "json", "up", "--cherry-pick", "0,2"]);
    assert!(output.status.success(), "{}", combined(&output));

    let report = json(&output);
    assert_eq!(report["direction"], "up");
    assert_eq!(report["applied"], serde_json::json!([0, 2]));
    assert!(report["error"].is_null());
}

#[test]
fn test_down_defaults_to_last() {
    let dir = project();
    assert!(sf(dir.path(), &["up"]).status.success());

    let output = sf(dir.path(), &["-o", "json", "down"]);
    assert!(output.status.success(), "{}", combined(&output));
    assert_eq!(json(&output)["applied"], serde_json::json!([2]));

    let output = sf(dir.path(), &["-o", "json", "down", "--from", "1", "--to", "0"]);
    assert!(output.status.success(), "{}", combined(&output));
    assert_eq!(json(&output)["applied"], serde_json::json!([1, 0]));
}

#[test]
fn test_failure_exits_non_zero_and_keeps_prefix() {
    let dir = project();
    fs::write(dir.path().join("deltas/001_t1.up.sql"), "CREATE TABLE (;").unwrap();

    let output = sf(dir.path(), &["-o", "json", "up"]);
    assert_eq!(output.status.code(), Some(1));
    let report = json(&output);
    assert_eq!(report["applied"], serde_json::json!([0]));
    assert!(report["error"].as_str().unwrap().contains("[X001]"));

    let dry = sf(dir.path(), &["-o", "json", "up", "--dry-run"]);
    assert!(dry.status.success(), "{}", combined(&dry));
    assert_eq!(json(&dry)["planned"], serde_json::json!([1, 2]));
}

#[test]
fn test_post_runs_once() {
    let dir = project();
    assert!(sf(dir.path(), &["up"]).status.success());

    let first = sf(dir.path(), &["-o", "json", "post"]);
    assert!(first.status.success(), "{}", combined(&first));
    assert_eq!(json(&first)["applied"], serde_json::json!([1]));

    let second = sf(dir.path(), &["-o", "json", "post"]);
    assert!(second.status.success(), "{}", combined(&second));
    assert_eq!(json(&second)["applied"], serde_json::json!([]));
}

#[test]
fn test_selection_errors_fail_before_connecting() {
    let dir = tempfile::tempdir().unwrap();
    // No config at all: a selection error must still win.
    let output = sf(dir.path(), &["up", "--from", "x1"]);
    assert!(!output.status.success());
    assert!(combined(&output).contains("[S002]"));

    let output = sf(dir.path(), &["down", "--to", "1", "-c", "2"]);
    assert!(combined(&output).contains("[S001]"));
}

#[test]
fn test_create_then_prune() {
    let dir = project();
    let output = sf(dir.path(), &["create", "placeholder"]);
    assert!(output.status.success(), "{}", combined(&output));
    assert!(dir.path().join("deltas/003_placeholder.up.sql").is_file());

    let output = sf(dir.path(), &["-o", "json", "up", "--prune"]);
    assert!(output.status.success(), "{}", combined(&output));
    let report = json(&output);
    assert_eq!(report["applied"], serde_json::json!([0, 1, 2]));
    assert_eq!(
        report["skipped"],
        serde_json::json!([{ "tag": 3, "reason": "pruned_no_op" }])
    );
}

#[test]
fn test_missing_ledger_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("schemaflow.yml"), "name: no_ledger\n").unwrap();
    fs::create_dir(dir.path().join("deltas")).unwrap();
    fs::write(dir.path().join("deltas/000_a.up.sql"), "SELECT 1;").unwrap();

    let output = sf(dir.path(), &["up"]);
    assert!(!output.status.success());
    let text = combined(&output);
    assert!(text.contains("[D008]"), "{}", text);
    assert!(text.contains("sf init"));
}
