//! Test utilities for codesearch
//!
//! Shared helpers used across the codesearch workspace: temp directories under
//! `.tmp/` and scriptable stand-ins for the external search engines.

mod engines;

pub use engines::{FakeEngine, FakeEngineBuilder};

use tempfile::TempDir;

/// Creates a temporary directory within `.tmp/` at the project root
///
/// This keeps test temporary files in a single gitignored location.
///
/// # Panics
///
/// Panics if the current directory cannot be determined or `.tmp/` (or the
/// temporary subdirectory) cannot be created.
///
/// # Examples
///
/// ```rust
/// use codesearch_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// std::fs::write(temp.path().join("test.txt"), "test data").unwrap();
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Alternative with Result for non-test code
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let workspace_root = std::env::current_dir()?;
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

/// Write `files` (relative path, contents) under `root`, creating parents
pub fn write_tree(root: &std::path::Path, files: &[(&str, &str)]) {
    for (rel, contents) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, contents).expect("Failed to write fixture file");
    }
}
