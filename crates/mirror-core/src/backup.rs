//! Report backup snapshots with bounded retention
//!
//! Before a run mutates the report artifact, a byte-identical copy is taken
//! next to it, named with the run timestamp. Only the most recent
//! `keep_last` backups survive; older ones are deleted by modification
//! time. Deletion failures are logged, never fatal.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::{Error, Result};
use mirror_fs::io::copy_preserving;

/// Default number of backups retained per report
pub const DEFAULT_KEEP_LAST: usize = 7;

/// Takes and rotates report backups
#[derive(Debug, Clone, Copy)]
pub struct BackupRotator {
    keep_last: usize,
}

impl Default for BackupRotator {
    fn default() -> Self {
        Self::new(DEFAULT_KEEP_LAST)
    }
}

impl BackupRotator {
    /// Create a rotator retaining the most recent `keep_last` backups
    pub fn new(keep_last: usize) -> Self {
        Self { keep_last }
    }

    /// Snapshot the report artifact, then prune old backups.
    ///
    /// Returns the backup path, or `None` when no report exists yet (first
    /// run, nothing to snapshot).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Backup`] if the copy fails. Pruning failures are
    /// logged and never surface as errors.
    pub fn backup(&self, report_path: &Path, stamp: &str) -> Result<Option<PathBuf>> {
        if !report_path.exists() {
            return Ok(None);
        }

        let backup_path = backup_sibling(report_path, stamp);
        copy_preserving(report_path, &backup_path).map_err(|e| Error::Backup {
            path: report_path.to_path_buf(),
            message: e.to_string(),
        })?;

        self.prune(report_path);
        Ok(Some(backup_path))
    }

    /// Delete every backup of this report beyond the `keep_last` most
    /// recent by modification time.
    fn prune(&self, report_path: &Path) {
        let mut backups = list_backups(report_path);
        backups.sort_by_key(|(_, mtime)| std::cmp::Reverse(*mtime));

        for (old_backup, _) in backups.into_iter().skip(self.keep_last) {
            if let Err(e) = fs::remove_file(&old_backup) {
                tracing::warn!(
                    path = %old_backup.display(),
                    error = %e,
                    "failed to delete old backup"
                );
            }
        }
    }
}

/// The sibling path a backup of `report_path` lives at for `stamp`.
///
/// Stamps have second resolution, so a second run landing on the same
/// stamp gets a numeric suffix rather than overwriting the earlier backup.
fn backup_sibling(report_path: &Path, stamp: &str) -> PathBuf {
    let stem = report_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = report_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut candidate = report_path.with_file_name(format!("{stem}_backup_{stamp}{extension}"));
    let mut n = 2;
    while candidate.exists() {
        candidate =
            report_path.with_file_name(format!("{stem}_backup_{stamp}_{n}{extension}"));
        n += 1;
    }
    candidate
}

/// All existing backups of `report_path`, with their modification times
fn list_backups(report_path: &Path) -> Vec<(PathBuf, SystemTime)> {
    let stem = report_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let prefix = format!("{stem}_backup_");
    let extension = report_path.extension().map(|e| e.to_os_string());

    // A bare relative report name has an empty parent; its backups live
    // in the current directory
    let folder = match report_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        Some(_) => Path::new("."),
        None => return Vec::new(),
    };
    let Ok(entries) = fs::read_dir(folder) else {
        return Vec::new();
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let name = entry.file_name();
            let matches_prefix = name.to_string_lossy().starts_with(&prefix);
            let matches_ext = entry.path().extension().map(|e| e.to_os_string()) == extension;
            matches_prefix && matches_ext && entry.path().is_file()
        })
        .map(|entry| {
            let mtime = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (entry.path(), mtime)
        })
        .collect()
}
