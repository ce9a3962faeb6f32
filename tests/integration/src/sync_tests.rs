//! End-to-end reconciliation scenarios
//!
//! These tests drive full engine runs over real temp trees and assert on
//! the persisted report artifact as well as the returned summaries.

use std::fs;
use std::sync::Mutex;

use pretty_assertions::assert_eq;

use mirror_core::{NullReporter, Report, Reporter, SyncEngine, SyncOptions};
use mirror_fs::NormalizedPath;
use mirror_test_utils::TestTree;

fn engine(tree: &TestTree) -> SyncEngine {
    SyncEngine::new(
        NormalizedPath::new(tree.internal_root()),
        NormalizedPath::new(tree.external_root()),
        tree.report_path(),
    )
}

fn engine_with(tree: &TestTree, options: SyncOptions) -> SyncEngine {
    engine(tree).with_options(options)
}

fn backup_count(tree: &TestTree) -> usize {
    fs::read_dir(tree.root())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_string_lossy()
                .starts_with("sync_report_backup_")
        })
        .count()
}

#[test]
fn identical_content_pairs_never_mismatch() {
    let tree = TestTree::new();
    tree.write_external("docs/a.txt", "alpha");
    tree.write_external("docs/b.txt", "beta");

    let eng = engine(&tree);
    eng.run(&NullReporter).unwrap();
    let summary = eng.run(&NullReporter).unwrap();

    assert_eq!(summary.verified, 2);
    assert_eq!(summary.mismatched, 0);

    let report = Report::load(&tree.report_path()).unwrap();
    for record in report.records() {
        assert_eq!(record.last_status.as_deref(), Some("Verified"));
        assert!(!record.flagged);
    }
}

#[test]
fn repeated_runs_are_idempotent() {
    let tree = TestTree::new();
    for name in ["a.txt", "b.txt", "sub/c.txt"] {
        tree.write_external(name, name);
    }

    let eng = engine(&tree);
    let first = eng.run(&NullReporter).unwrap();
    let second = eng.run(&NullReporter).unwrap();
    let third = eng.run(&NullReporter).unwrap();

    assert_eq!(first.copied, 3);
    assert_eq!(second.copied, 0);
    assert_eq!(second.verified, 3);

    // With no filesystem changes, later runs repeat exactly
    assert_eq!(third.copied, second.copied);
    assert_eq!(third.verified, second.verified);
    assert_eq!(third.mismatched, second.mismatched);
    assert_eq!(third.missing, second.missing);
}

#[test]
fn rotation_retains_exactly_keep_last_backups() {
    let tree = TestTree::new();
    tree.write_external("a.txt", "alpha");

    let eng = engine_with(
        &tree,
        SyncOptions {
            force_recopy: false,
            keep_last: 3,
        },
    );

    // First run creates the report; each later run snapshots it first
    for _ in 0..6 {
        eng.run(&NullReporter).unwrap();
    }

    assert_eq!(backup_count(&tree), 3);
}

#[test]
fn tampered_destination_of_equal_length_is_checksum_mismatch() {
    let tree = TestTree::new();
    tree.write_external("a.txt", "alpha");
    let eng = engine(&tree);
    eng.run(&NullReporter).unwrap();

    tree.write_internal("a.txt", "ALPHA");
    let summary = eng.run(&NullReporter).unwrap();

    assert_eq!(summary.mismatched, 1);
    assert_eq!(summary.copied, 0, "no re-copy for tampered files");
    tree.assert_internal_content("a.txt", "ALPHA");

    let report = Report::load(&tree.report_path()).unwrap();
    assert_eq!(
        report.records()[0].last_status.as_deref(),
        Some("ChecksumMismatch")
    );
    assert!(report.records()[0].flagged);
}

#[test]
fn tampered_destination_of_different_length_is_size_mismatch() {
    let tree = TestTree::new();
    tree.write_external("a.txt", "alpha");
    let eng = engine(&tree);
    eng.run(&NullReporter).unwrap();

    tree.write_internal("a.txt", "alpha plus extra bytes");
    let summary = eng.run(&NullReporter).unwrap();

    assert_eq!(summary.mismatched, 1);
    let report = Report::load(&tree.report_path()).unwrap();
    assert_eq!(
        report.records()[0].last_status.as_deref(),
        Some("SizeMismatch")
    );
    assert!(report.records()[0].flagged);
}

#[test]
fn files_deleted_from_external_are_missing_and_flagged() {
    let tree = TestTree::new();
    tree.write_external("keep.txt", "k");
    tree.write_external("gone.txt", "g");
    let eng = engine(&tree);
    eng.run(&NullReporter).unwrap();

    tree.remove_external("gone.txt");
    let summary = eng.run(&NullReporter).unwrap();

    assert_eq!(summary.missing, 1);
    assert_eq!(summary.verified, 1);
    assert!(summary.has_errors());

    let report = Report::load(&tree.report_path()).unwrap();
    let gone = report
        .records()
        .iter()
        .find(|r| r.relative_path == "gone.txt")
        .unwrap();
    assert_eq!(gone.last_status.as_deref(), Some("MissingInExternal"));
    assert!(gone.flagged);
    assert!(!gone.exists_in_external);
    // Internal copy is left alone
    tree.assert_internal_content("gone.txt", "g");
}

#[test]
fn three_record_scenario_yields_expected_aggregates() {
    let tree = TestTree::new();
    // (a) will be identical on both sides, (c) will vanish from external
    tree.write_external("a.txt", "same");
    tree.write_external("c.txt", "doomed");
    let eng = engine(&tree);
    eng.run(&NullReporter).unwrap();

    // (b) appears in external only, never copied; (c) is deleted upstream
    tree.write_external("b.txt", "fresh");
    tree.remove_external("c.txt");

    let summary = eng.run(&NullReporter).unwrap();

    assert_eq!(summary.copied, 1, "(b) copied");
    assert_eq!(summary.verified, 1, "(a) verified");
    assert_eq!(summary.mismatched, 0);
    assert_eq!(summary.missing, 1, "(c) missing in external");

    let report = Report::load(&tree.report_path()).unwrap();
    let status_of = |rel: &str| {
        report
            .records()
            .iter()
            .find(|r| r.relative_path == rel)
            .and_then(|r| r.last_status.clone())
            .unwrap()
    };
    assert_eq!(status_of("a.txt"), "Verified");
    assert_eq!(status_of("b.txt"), "Copied");
    assert_eq!(status_of("c.txt"), "MissingInExternal");
}

#[test]
fn progress_is_one_based_and_strictly_increasing() {
    struct Recording {
        seen: Mutex<Vec<(usize, usize)>>,
    }
    impl Reporter for Recording {
        fn progress(&self, current: usize, total: usize) {
            self.seen.lock().unwrap().push((current, total));
        }
    }

    let tree = TestTree::new();
    for i in 0..5 {
        tree.write_external(&format!("f{i}.txt"), "x");
    }

    let reporter = Recording {
        seen: Mutex::new(Vec::new()),
    };
    engine(&tree).run(&reporter).unwrap();

    let seen = reporter.seen.lock().unwrap();
    let expected: Vec<_> = (1..=5).map(|i| (i, 5)).collect();
    assert_eq!(*seen, expected);
}

#[test]
fn audit_trail_accumulates_one_section_per_run_in_order() {
    let tree = TestTree::new();
    tree.write_external("a.txt", "alpha");

    let eng = engine(&tree);
    for _ in 0..3 {
        eng.run(&NullReporter).unwrap();
    }

    let report = Report::load(&tree.report_path()).unwrap();
    assert_eq!(report.audits().len(), 3);

    // Section names stay unique even for runs within the same second
    let mut names: Vec<_> = report.audits().iter().map(|a| a.name.clone()).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 3);

    // Outcomes: first run copied, later runs verified
    assert_eq!(report.audits()[0].entries[0].status, "Copied");
    assert_eq!(report.audits()[1].entries[0].status, "Verified");
    assert_eq!(report.audits()[2].entries[0].status, "Verified");
}

#[test]
fn force_recopy_restores_deleted_mirror_files() {
    let tree = TestTree::new();
    tree.write_external("a.txt", "alpha");
    engine(&tree).run(&NullReporter).unwrap();

    tree.remove_internal("a.txt");

    // Plain run leaves the hole in place
    let plain = engine(&tree).run(&NullReporter).unwrap();
    assert_eq!(plain.copied, 0);
    tree.assert_internal_missing("a.txt");

    let forced = engine_with(
        &tree,
        SyncOptions {
            force_recopy: true,
            keep_last: 7,
        },
    )
    .run(&NullReporter)
    .unwrap();

    assert_eq!(forced.copied, 1);
    tree.assert_internal_content("a.txt", "alpha");
}

#[test]
fn clean_runs_produce_no_error_lines() {
    let tree = TestTree::new();
    tree.write_external("a.txt", "alpha");

    let summary = engine(&tree).run(&NullReporter).unwrap();

    assert!(!summary.has_errors());
    assert!(summary.error_lines.is_empty());
}
