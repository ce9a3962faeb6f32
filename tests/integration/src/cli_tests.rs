//! End-to-end tests of the `mirror` binary

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

use mirror_test_utils::TestTree;

fn mirror() -> Command {
    Command::cargo_bin("mirror").unwrap()
}

fn sync_json(tree: &TestTree) -> Value {
    let output = mirror()
        .arg("sync")
        .arg(tree.internal_root())
        .arg(tree.external_root())
        .arg("--report")
        .arg(tree.report_path())
        .arg("--error-log")
        .arg(tree.root().join("sync_errors.log"))
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    serde_json::from_slice(&output).expect("sync --json should emit valid JSON")
}

#[test]
fn sync_json_reports_copied_then_verified() {
    let tree = TestTree::new();
    tree.write_external("docs/a.txt", "alpha");
    tree.write_external("b.txt", "beta");

    let first = sync_json(&tree);
    assert_eq!(first["copied"], 2);
    assert_eq!(first["verified"], 0);

    let second = sync_json(&tree);
    assert_eq!(second["copied"], 0);
    assert_eq!(second["verified"], 2);
    assert_eq!(second["mismatched"], 0);
    assert_eq!(second["missing"], 0);

    tree.assert_internal_content("docs/a.txt", "alpha");
}

#[test]
fn sync_writes_error_log_only_on_failures() {
    let tree = TestTree::new();
    tree.write_external("a.txt", "alpha");

    sync_json(&tree);
    assert!(!tree.root().join("sync_errors.log").exists());

    tree.remove_external("a.txt");
    let summary = sync_json(&tree);
    assert_eq!(summary["missing"], 1);
    assert!(tree.root().join("sync_errors.log").exists());
}

#[test]
fn status_renders_the_report_summary() {
    let tree = TestTree::new();
    tree.write_external("a.txt", "alpha");
    sync_json(&tree);

    mirror()
        .arg("status")
        .arg("--report")
        .arg(tree.report_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Records"));
}

#[test]
fn status_json_counts_records_and_runs() {
    let tree = TestTree::new();
    tree.write_external("a.txt", "alpha");
    sync_json(&tree);
    sync_json(&tree);

    let output = mirror()
        .arg("status")
        .arg("--report")
        .arg(tree.report_path())
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let status: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(status["records"], 1);
    assert_eq!(status["copied"], 1);
    assert_eq!(status["runs"], 2);
}

#[test]
fn sync_with_missing_external_root_fails() {
    let tree = TestTree::new();

    mirror()
        .arg("sync")
        .arg(tree.internal_root())
        .arg(tree.root().join("does-not-exist"))
        .arg("--report")
        .arg(tree.report_path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("External folder not found"));
}

#[test]
fn bare_invocation_shows_help_hint() {
    mirror()
        .assert()
        .success()
        .stdout(predicate::str::contains("mirror --help"));
}
