//! The persisted report artifact
//!
//! A single TOML document owning the primary inventory table and the
//! accumulated audit sections. Row order of the primary table is preserved
//! across runs; newly discovered external files are appended, never
//! interleaved. The report file is the only filesystem path this module
//! touches.

mod audit;
mod record;

pub use audit::{AuditEntry, AuditSection, PROBLEM_STATUSES, append_audit, is_problem_status};
pub use record::FileRecord;

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{Error, Result};
use mirror_fs::walk_files;

/// The report artifact: inventory plus append-only audit trail
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    /// Artifact format version for forward compatibility
    version: String,
    /// Primary table, one row per known relative path
    #[serde(default)]
    records: Vec<FileRecord>,
    /// Audit sections, one per completed run, oldest first
    #[serde(default, rename = "audit")]
    audits: Vec<AuditSection>,
}

impl Report {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            version: "1.0".to_string(),
            records: Vec::new(),
            audits: Vec::new(),
        }
    }

    /// Bootstrap a report by scanning the external tree.
    ///
    /// One record per file found, `date_copied` unset. Used on the first
    /// run, when no artifact exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the external root cannot be walked.
    pub fn bootstrap(external_root: &Path) -> Result<Self> {
        let mut report = Self::new();
        for file in walk_files(external_root)? {
            report
                .records
                .push(FileRecord::new(file.relative_path, file.source_path));
        }
        Ok(report)
    }

    /// Load a report from a TOML file with shared lock.
    ///
    /// Absent optional columns deserialize to their defaults rather than
    /// erroring.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReportLoad`] if the file cannot be read, locked,
    /// or parsed. Fatal to a sync run.
    pub fn load(path: &Path) -> Result<Self> {
        let load_err = |message: String| Error::ReportLoad {
            path: path.to_path_buf(),
            message,
        };

        let file = File::open(path).map_err(|e| load_err(e.to_string()))?;
        file.lock_shared().map_err(|e| load_err(e.to_string()))?;

        // Read through the locked file handle to avoid TOCTOU race
        let mut content = String::new();
        (&file)
            .read_to_string(&mut content)
            .map_err(|e| load_err(e.to_string()))?;
        let report: Report = toml::from_str(&content).map_err(|e| load_err(e.to_string()))?;

        // Lock released when file is dropped
        Ok(report)
    }

    /// Save the report atomically, overwriting the prior artifact.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReportSave`] if serialization or the write fails.
    /// Fatal to a sync run.
    pub fn save(&self, path: &Path) -> Result<()> {
        let save_err = |message: String| Error::ReportSave {
            path: path.to_path_buf(),
            message,
        };

        let content = toml::to_string_pretty(self).map_err(|e| save_err(e.to_string()))?;
        mirror_fs::io::write_atomic(path, content.as_bytes())
            .map_err(|e| save_err(e.to_string()))
    }

    /// Append records for external files not yet in the inventory.
    ///
    /// Existing rows are untouched and keep their order; new files are
    /// appended in walk order. Returns how many records were added.
    ///
    /// # Errors
    ///
    /// Returns an error if the external root cannot be walked. Callers
    /// treat this as non-fatal and proceed over the loaded inventory.
    pub fn absorb_external(&mut self, external_root: &Path) -> Result<usize> {
        let known: HashSet<&str> = self
            .records
            .iter()
            .map(|r| r.relative_path.as_str())
            .collect();

        let new_files: Vec<_> = walk_files(external_root)?
            .into_iter()
            .filter(|f| !known.contains(f.relative_path.as_str()))
            .collect();

        let added = new_files.len();
        for file in new_files {
            self.records
                .push(FileRecord::new(file.relative_path, file.source_path));
        }
        Ok(added)
    }

    /// Get all records in inventory order
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    /// Get all records mutably, preserving order
    pub fn records_mut(&mut self) -> &mut [FileRecord] {
        &mut self.records
    }

    /// Get all audit sections, oldest first
    pub fn audits(&self) -> &[AuditSection] {
        &self.audits
    }

    /// Append an audit section; prior sections are never mutated.
    ///
    /// Section names must stay unique within the artifact, so a second run
    /// landing on the same second-resolution stamp gets a numeric suffix.
    pub fn push_audit(&mut self, mut section: AuditSection) {
        let base = section.name.clone();
        let mut n = 2;
        while self.audits.iter().any(|a| a.name == section.name) {
            section.name = format!("{base}_{n}");
            n += 1;
        }
        self.audits.push(section);
    }

    /// Recompute the `flagged` marker on every primary-table row.
    ///
    /// A row is flagged iff its last status is one of the problem statuses.
    pub fn apply_problem_flags(&mut self) {
        for record in &mut self.records {
            record.flagged = record
                .last_status
                .as_deref()
                .is_some_and(is_problem_status);
        }
    }
}
