//! Sync-and-verify reconciliation core for Mirror Sync
//!
//! This crate coordinates the full lifecycle of one sync run between an
//! internal mirror tree and an external source-of-truth tree:
//!
//! - **Backup rotation**: snapshot the report artifact before mutation,
//!   retaining a bounded history
//! - **Report artifact**: the persisted inventory of known files plus the
//!   append-only audit trail of every run
//! - **SyncEngine**: the per-file copy/verify/flag decision algorithm
//!
//! # Architecture
//!
//! `mirror-core` sits above the filesystem primitives and below the CLI:
//!
//! ```text
//!      CLI
//!       |
//!  mirror-core
//!       |
//!   mirror-fs
//! ```
//!
//! Control flow of a run: backup → load or bootstrap the inventory →
//! reconcile each record in row order → save → append the audit section.

pub mod backup;
pub mod error;
pub mod report;
pub mod sync;

pub use backup::{BackupRotator, DEFAULT_KEEP_LAST};
pub use error::{Error, Result};
pub use report::{AuditEntry, AuditSection, FileRecord, PROBLEM_STATUSES, Report};
pub use sync::{NullReporter, Reporter, RunSummary, SyncEngine, SyncOptions, SyncStatus};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn report_load_error_displays_the_path() {
        let error = Error::ReportLoad {
            path: PathBuf::from("/path/to/report.toml"),
            message: "no such file".to_string(),
        };

        let display = format!("{}", error);
        assert!(
            display.contains("/path/to/report.toml"),
            "Error display should contain the path, got: {}",
            display
        );
        assert!(
            display.contains("no such file"),
            "Error display should contain the cause, got: {}",
            display
        );
    }
}
