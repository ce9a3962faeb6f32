//! SyncEngine implementation
//!
//! The SyncEngine reconciles the internal mirror tree against the external
//! source tree, driven by the persisted inventory: backup the report, load
//! or bootstrap the inventory, reconcile every record in row order, save,
//! then append the run's audit section.

use std::path::PathBuf;

use chrono::{Local, Utc};

use crate::Result;
use crate::backup::{BackupRotator, DEFAULT_KEEP_LAST};
use crate::report::{AuditEntry, AuditSection, FileRecord, Report, append_audit};
use mirror_fs::NormalizedPath;
use mirror_fs::checksum::{FileHasher, StreamingSha256};
use mirror_fs::io::{copy_preserving, file_size};

use super::progress::Reporter;
use super::status::{RunSummary, SyncStatus};

/// Timestamp format embedded in backup names and audit section names
pub const RUN_STAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Options for a sync run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Re-copy files whose destination vanished from the internal tree
    pub force_recopy: bool,
    /// Number of report backups retained
    pub keep_last: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            force_recopy: false,
            keep_last: DEFAULT_KEEP_LAST,
        }
    }
}

/// Engine for one sync-and-verify run over the inventory
///
/// The engine exclusively owns the in-memory inventory for the duration of
/// a run and processes records strictly sequentially in persisted order —
/// no parallel copies, no concurrent hashing, no record skipped or
/// reordered.
pub struct SyncEngine {
    /// Root of the internal (mirror) tree
    internal_root: NormalizedPath,
    /// Root of the external (source-of-truth) tree
    external_root: NormalizedPath,
    /// Path of the persisted report artifact
    report_path: PathBuf,
    /// Run options
    options: SyncOptions,
    /// Content hasher; swapped out by tests for instrumentation
    hasher: Box<dyn FileHasher>,
}

impl SyncEngine {
    /// Create a new SyncEngine with default options and the streaming
    /// SHA-256 hasher
    pub fn new(
        internal_root: NormalizedPath,
        external_root: NormalizedPath,
        report_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            internal_root,
            external_root,
            report_path: report_path.into(),
            options: SyncOptions::default(),
            hasher: Box::new(StreamingSha256),
        }
    }

    /// Replace the run options
    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the content hasher
    pub fn with_hasher(mut self, hasher: Box<dyn FileHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    /// Get the report artifact path
    pub fn report_path(&self) -> &PathBuf {
        &self.report_path
    }

    /// Execute one full sync-and-verify run.
    ///
    /// Per-file failures (copy, hash) are isolated into the summary's
    /// error lines; the run always processes every inventory record.
    ///
    /// # Errors
    ///
    /// Returns an error only when the report artifact itself cannot be
    /// loaded or saved.
    pub fn run(&self, reporter: &dyn Reporter) -> Result<RunSummary> {
        let stamp = Local::now().format(RUN_STAMP_FORMAT).to_string();
        let mut summary = RunSummary::default();

        // Snapshot the prior artifact before any mutation
        let rotator = BackupRotator::new(self.options.keep_last);
        match rotator.backup(&self.report_path, &stamp) {
            Ok(Some(backup)) => {
                tracing::debug!(backup = %backup.display(), "report snapshot taken");
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "report backup failed");
                summary.push_error(format!("Report backup failed: {e}"));
            }
        }

        let mut report = self.load_or_bootstrap(&mut summary)?;

        let total = report.records().len();
        let mut entries = Vec::with_capacity(total);

        for (index, record) in report.records_mut().iter_mut().enumerate() {
            let status = reconcile_record(
                &self.internal_root,
                &self.options,
                self.hasher.as_ref(),
                record,
                &mut summary,
                reporter,
            );
            record.last_status = Some(status.to_string());
            entries.push(AuditEntry {
                timestamp: stamp.clone(),
                relative_path: record.relative_path.clone(),
                status: status.to_string(),
            });
            reporter.progress(index + 1, total);
        }

        // The inventory is durable from here on
        report.save(&self.report_path)?;

        if let Err(e) = append_audit(&self.report_path, AuditSection::new(&stamp, entries)) {
            tracing::warn!(error = %e, "failed to append audit section");
            summary.push_error(format!("Failed to append audit section: {e}"));
        }

        tracing::info!(
            copied = summary.copied,
            verified = summary.verified,
            mismatched = summary.mismatched,
            missing = summary.missing,
            errors = summary.error_lines.len(),
            "sync run complete"
        );
        Ok(summary)
    }

    /// Load the persisted inventory, or bootstrap it from the external
    /// tree on the first run.
    ///
    /// On load, external files discovered since the last run are appended;
    /// a failed refresh scan is isolated and the run proceeds over the
    /// loaded rows.
    fn load_or_bootstrap(&self, summary: &mut RunSummary) -> Result<Report> {
        if !self.report_path.exists() {
            return Report::bootstrap(self.external_root.as_ref());
        }

        let mut report = Report::load(&self.report_path)?;
        match report.absorb_external(self.external_root.as_ref()) {
            Ok(added) if added > 0 => {
                tracing::info!(added, "new external files appended to inventory");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "external tree refresh failed");
                summary.push_error(format!("External tree refresh failed: {e}"));
            }
        }
        Ok(report)
    }
}

/// Decide and apply the action for a single inventory record.
///
/// Existence probes are recomputed and written back unconditionally. The
/// decision order: missing-in-external is terminal; an uncopied record is
/// copied (force-recopy clears `date_copied` first, re-entering the copy
/// branch within this same iteration); an already-copied record with a
/// present destination is verified by size, then checksum.
fn reconcile_record(
    internal_root: &NormalizedPath,
    options: &SyncOptions,
    hasher: &dyn FileHasher,
    record: &mut FileRecord,
    summary: &mut RunSummary,
    reporter: &dyn Reporter,
) -> SyncStatus {
    let dest = internal_root.join(&record.relative_path).to_native();

    record.exists_in_internal = dest.exists();
    record.exists_in_external = record.source_path.exists();

    reporter.status(&format!("Processing: {}", record.relative_path));

    if !record.exists_in_external {
        summary.missing += 1;
        summary.push_error(format!("MissingInExternal - {}", record.relative_path));
        return SyncStatus::MissingInExternal;
    }

    if !record.exists_in_internal && options.force_recopy {
        record.date_copied = None;
    }

    if record.date_copied.is_none() {
        return match copy_preserving(&record.source_path, &dest) {
            Ok(()) => {
                record.date_copied = Some(Utc::now());
                summary.copied += 1;
                // Freshly copied files are verified on the next run, so a
                // file contributes to exactly one tally per run
                SyncStatus::Copied
            }
            Err(e) => {
                let reason = e.to_string();
                summary.push_error(format!(
                    "CopyError: {} - {}",
                    reason, record.relative_path
                ));
                SyncStatus::CopyError(reason)
            }
        };
    }

    if !dest.exists() {
        return SyncStatus::AlreadyCopied;
    }

    // Size first: a cheap short-circuit that skips checksumming entirely
    if file_size(&record.source_path) != file_size(&dest) {
        summary.mismatched += 1;
        return SyncStatus::SizeMismatch;
    }

    let source_digest = digest_or_error(hasher, &record.source_path);
    let dest_digest = digest_or_error(hasher, &dest);
    if source_digest != dest_digest {
        summary.mismatched += 1;
        return SyncStatus::ChecksumMismatch;
    }

    summary.verified += 1;
    SyncStatus::Verified
}

/// Digest a file, folding I/O failures into a comparison string instead of
/// aborting the record
fn digest_or_error(hasher: &dyn FileHasher, path: &std::path::Path) -> String {
    hasher
        .hash_file(path)
        .unwrap_or_else(|e| format!("ERROR: {e}"))
}
