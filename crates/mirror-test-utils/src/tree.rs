//! [`TestTree`] builder for sync test scenarios.
//!
//! A temporary directory holding an internal (mirror) root, an external
//! (source) root, and a report path, with helpers for seeding files and
//! asserting on the outcome.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary pair of sync trees with helper methods for test setup and
/// assertion.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// tree.write_external("docs/readme.txt", "hello");
/// tree.assert_internal_missing("docs/readme.txt");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create a fresh pair of empty internal/external roots.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("internal")).unwrap();
        fs::create_dir_all(temp_dir.path().join("external")).unwrap();
        Self { temp_dir }
    }

    /// Root of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The internal (mirror) tree root.
    pub fn internal_root(&self) -> PathBuf {
        self.temp_dir.path().join("internal")
    }

    /// The external (source-of-truth) tree root.
    pub fn external_root(&self) -> PathBuf {
        self.temp_dir.path().join("external")
    }

    /// Default report artifact path inside the fixture.
    pub fn report_path(&self) -> PathBuf {
        self.temp_dir.path().join("sync_report.toml")
    }

    /// Write `content` at `relative` under the external root, creating
    /// parent directories.
    pub fn write_external(&self, relative: &str, content: &str) -> PathBuf {
        Self::write_under(&self.external_root(), relative, content)
    }

    /// Write `content` at `relative` under the internal root, creating
    /// parent directories.
    pub fn write_internal(&self, relative: &str, content: &str) -> PathBuf {
        Self::write_under(&self.internal_root(), relative, content)
    }

    /// Delete `relative` from the external root.
    pub fn remove_external(&self, relative: &str) {
        fs::remove_file(self.external_root().join(relative)).unwrap();
    }

    /// Delete `relative` from the internal root.
    pub fn remove_internal(&self, relative: &str) {
        fs::remove_file(self.internal_root().join(relative)).unwrap();
    }

    /// Assert the internal tree holds `content` at `relative`.
    ///
    /// # Panics
    /// Panics with a descriptive message on absence or content mismatch.
    pub fn assert_internal_content(&self, relative: &str, content: &str) {
        let path = self.internal_root().join(relative);
        let actual = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()));
        assert_eq!(
            actual,
            content,
            "Unexpected content at {}",
            path.display()
        );
    }

    /// Assert `relative` does **not** exist in the internal tree.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_internal_missing(&self, relative: &str) {
        let path = self.internal_root().join(relative);
        assert!(
            !path.exists(),
            "Expected file NOT to exist: {}",
            path.display()
        );
    }

    fn write_under(root: &Path, relative: &str, content: &str) -> PathBuf {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }
}
