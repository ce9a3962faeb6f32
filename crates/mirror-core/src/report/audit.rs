//! Append-only audit sections and the problem-marker overlay
//!
//! Each sync run appends one uniquely-named section to the report artifact;
//! prior sections are never mutated. After appending, the primary table's
//! `flagged` column is recomputed from each row's last status — a purely
//! presentational pass, separate from the durably-saved inventory data.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::Report;
use crate::Result;

/// Statuses that mark a primary-table row as a problem
pub const PROBLEM_STATUSES: [&str; 4] = [
    "MissingInInternal",
    "MissingInExternal",
    "SizeMismatch",
    "ChecksumMismatch",
];

/// One per-file outcome row within an audit section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Run timestamp, shared by every entry of the section
    pub timestamp: String,
    /// The file the outcome applies to
    pub relative_path: String,
    /// Final status of the file for this run
    pub status: String,
}

/// One run's outcome log, appended to the report artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSection {
    /// Unique section name embedding the run timestamp,
    /// e.g. `audit_2026-08-06_14-02-11`
    pub name: String,
    /// Per-file outcomes in inventory order
    #[serde(default)]
    pub entries: Vec<AuditEntry>,
}

impl AuditSection {
    /// Create a section named for the given run stamp
    pub fn new(stamp: &str, entries: Vec<AuditEntry>) -> Self {
        Self {
            name: format!("audit_{stamp}"),
            entries,
        }
    }
}

/// Whether a status string marks its row as a problem
pub fn is_problem_status(status: &str) -> bool {
    PROBLEM_STATUSES.contains(&status)
}

/// Append a run's audit section to the persisted artifact and refresh the
/// problem markers on the primary table.
///
/// Re-opens the artifact from disk so the append is decoupled from the
/// caller's in-memory state; the inventory itself is already durably saved
/// before this runs.
///
/// # Errors
///
/// Returns an error if the artifact cannot be re-read or re-written. The
/// caller treats this as non-fatal.
pub fn append_audit(report_path: &Path, section: AuditSection) -> Result<()> {
    let mut report = Report::load(report_path)?;
    report.push_audit(section);
    report.apply_problem_flags();
    report.save(report_path)
}
