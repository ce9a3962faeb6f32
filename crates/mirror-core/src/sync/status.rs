//! Per-file status vocabulary and aggregate run summary

use chrono::Local;
use serde::Serialize;

/// Final status of one file for one run.
///
/// The rendered spelling is load-bearing: the audit trail stores it and the
/// problem-marker pass matches it exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// Source file gone from the external tree; terminal for the record
    MissingInExternal,
    /// Destination gone from the internal tree (recognized for flagging;
    /// not produced by this engine's decision algorithm)
    MissingInInternal,
    /// Whole-file copy failed, reason attached
    CopyError(String),
    /// Copied on a previous run; destination currently absent so nothing
    /// to verify
    AlreadyCopied,
    /// Copied this run
    Copied,
    /// Destination byte length differs from source
    SizeMismatch,
    /// Lengths equal but content digests differ
    ChecksumMismatch,
    /// Size and checksum both match
    Verified,
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingInExternal => write!(f, "MissingInExternal"),
            Self::MissingInInternal => write!(f, "MissingInInternal"),
            Self::CopyError(reason) => write!(f, "CopyError: {reason}"),
            Self::AlreadyCopied => write!(f, "AlreadyCopied"),
            Self::Copied => write!(f, "Copied"),
            Self::SizeMismatch => write!(f, "SizeMismatch"),
            Self::ChecksumMismatch => write!(f, "ChecksumMismatch"),
            Self::Verified => write!(f, "Verified"),
        }
    }
}

/// Aggregate outcome of one sync run.
///
/// The copied, verified, and mismatched tallies are mutually exclusive per
/// file; missing is exclusive with mismatched (a mismatch requires both
/// sides to exist).
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Files copied into the internal tree this run
    pub copied: usize,
    /// Files whose size and checksum both matched
    pub verified: usize,
    /// Files with a size or checksum mismatch
    pub mismatched: usize,
    /// Files missing from the external tree
    pub missing: usize,
    /// Timestamped error-log lines, one per isolated failure
    pub error_lines: Vec<String>,
}

impl RunSummary {
    /// Append a timestamped error-log line
    pub fn push_error(&mut self, message: impl AsRef<str>) {
        self.error_lines.push(format!(
            "[{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            message.as_ref()
        ));
    }

    /// Whether any isolated failures occurred during the run
    pub fn has_errors(&self) -> bool {
        !self.error_lines.is_empty()
    }
}
