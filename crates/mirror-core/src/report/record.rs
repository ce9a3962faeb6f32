//! FileRecord type for the report's primary table
//!
//! One record per relative path ever seen in the external tree. The
//! relative path is derived once at bootstrap from the external tree's
//! layout and is never changed afterwards; the destination in the internal
//! tree is always `internal_root / relative_path`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One row of the report's primary table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the external root, forward-slash normalized.
    /// Unique key within the inventory, stable across runs.
    pub relative_path: String,
    /// Resolved path of the file in the external tree
    pub source_path: PathBuf,
    /// When the file was copied into the internal tree; absent means
    /// "not yet copied"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_copied: Option<DateTime<Utc>>,
    /// Live probe: destination present in the internal tree
    #[serde(default)]
    pub exists_in_internal: bool,
    /// Live probe: source present in the external tree
    #[serde(default)]
    pub exists_in_external: bool,
    /// Status string from the most recent run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
    /// Presentational problem marker, recomputed by the audit appender
    #[serde(default)]
    pub flagged: bool,
}

impl FileRecord {
    /// Create a record for a newly discovered external file
    pub fn new(relative_path: impl Into<String>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            relative_path: relative_path.into(),
            source_path: source_path.into(),
            date_copied: None,
            exists_in_internal: false,
            exists_in_external: true,
            last_status: None,
            flagged: false,
        }
    }
}
