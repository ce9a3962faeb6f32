//! Recursive file discovery for tree bootstrap and refresh

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{Error, Result};

/// A file discovered under a walked root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    /// Path relative to the walked root, forward-slash normalized
    pub relative_path: String,
    /// Absolute path of the file
    pub source_path: PathBuf,
}

/// Recursively list all files under `root` in deterministic order.
///
/// Directory entries are sorted by file name so inventory bootstrap produces
/// a stable row order. Entries that cannot be read are skipped with a
/// warning; an unreadable root is an error.
///
/// # Errors
///
/// Returns an error if `root` itself cannot be accessed.
pub fn walk_files(root: &Path) -> Result<Vec<WalkedFile>> {
    if !root.is_dir() {
        return Err(Error::Walk {
            path: root.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry during walk");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| Error::Walk {
                path: entry.path().to_path_buf(),
                message: e.to_string(),
            })?;

        files.push(WalkedFile {
            relative_path: normalize_separators(relative),
            source_path: entry.path().to_path_buf(),
        });
    }

    Ok(files)
}

/// Join path components with forward slashes regardless of platform.
fn normalize_separators(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
