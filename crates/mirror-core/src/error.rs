//! Error types for mirror-core

use std::path::PathBuf;

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-core operations
///
/// `ReportLoad` and `ReportSave` are fatal to a sync run and propagate to
/// the caller; everything else is isolated per file and reported through
/// the run's error-log lines.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The persisted report artifact could not be read or parsed
    #[error("Failed to load report {path}: {message}")]
    ReportLoad { path: PathBuf, message: String },

    /// The persisted report artifact could not be written
    #[error("Failed to save report {path}: {message}")]
    ReportSave { path: PathBuf, message: String },

    /// Backup snapshot or rotation failure
    #[error("Backup failed for {path}: {message}")]
    Backup { path: PathBuf, message: String },

    /// General synchronization error
    #[error("Sync error: {message}")]
    Sync { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
