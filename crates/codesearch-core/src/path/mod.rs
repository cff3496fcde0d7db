//! Workspace path sandboxing
//!
//! Every path that reaches an engine, and every path an engine reports back,
//! goes through this module. Paths are handled as forward-slashed strings
//! relative to the search working directory rather than as `std::path::Path`,
//! because engines print POSIX-style paths on every platform.
//!
//! ## Absolute paths
//!
//! `Path::is_absolute()` is platform dependent (`/tmp` is only *rooted* on
//! Windows), so absolute inputs are detected by components instead:
//!
//! ```rust
//! use codesearch_core::path::has_absolute_or_rooted_component;
//! use std::path::Path;
//!
//! assert!(has_absolute_or_rooted_component(Path::new("/etc/passwd")));
//! assert!(!has_absolute_or_rooted_component(Path::new("src/lib.rs")));
//! ```

use crate::config::consts::denylist;
use crate::error::{CodesearchError, Result};
use std::path::{Component, Path};

/// Check if path is absolute OR rooted (cross-platform)
pub fn has_absolute_or_rooted_component(path: &Path) -> bool {
    if path.is_absolute() {
        return true;
    }

    path.components()
        .any(|c| matches!(c, Component::RootDir | Component::Prefix(_)))
}

/// Normalize a caller-supplied path into a workspace-relative one
///
/// Strips leading `./`, converts backslashes to forward slashes and folds
/// `.`/`..` segments. An empty result becomes `"."`.
///
/// # Errors
///
/// `PathEscape` when the input is absolute, carries a drive prefix, or
/// normalizes to something above the workspace (`..` or `../...`).
///
/// # Examples
///
/// ```rust
/// use codesearch_core::path::to_workspace_relative_path;
///
/// assert_eq!(to_workspace_relative_path("./src/app.ts").unwrap(), "src/app.ts");
/// assert_eq!(to_workspace_relative_path("src\\lib\\..\\main.rs").unwrap(), "src/main.rs");
/// assert!(to_workspace_relative_path("../etc/passwd").is_err());
/// ```
pub fn to_workspace_relative_path(input: &str) -> Result<String> {
    let slashed = input.trim().replace('\\', "/");

    if slashed.starts_with('/')
        || has_drive_prefix(&slashed)
        || has_absolute_or_rooted_component(Path::new(&slashed))
    {
        return Err(escape(input));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in slashed.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(last) if *last != ".." => {
                    segments.pop();
                }
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    if segments.first() == Some(&"..") {
        return Err(escape(input));
    }

    if segments.is_empty() {
        return Ok(".".to_string());
    }

    Ok(segments.join("/"))
}

/// True if the workspace-relative path must never be searched or returned
///
/// Rules:
/// 1. exact env-file names (`.env`, `.env.local`, ...) and anything starting
///    with `.env.`; the same rule applies to the final path segment
/// 2. denylisted directory prefixes (`.git/`, `node_modules/`, ...) or the bare
///    directory name itself
/// 3. key material suffixes (`.pem`, `.key`)
pub fn is_denied_path(path: &str) -> bool {
    if is_env_file(path) {
        return true;
    }

    if let Some(file_name) = path.rsplit('/').next() {
        if is_env_file(file_name) {
            return true;
        }
    }

    let prefixed = denylist::PREFIXES.iter().any(|prefix| {
        path.starts_with(prefix) || path == prefix.trim_end_matches('/')
    });
    if prefixed {
        return true;
    }

    denylist::SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
}

/// Reject the path unless it is searchable
pub fn ensure_searchable(path: &str) -> Result<()> {
    if is_denied_path(path) {
        return Err(CodesearchError::PathDenied {
            path: path.to_string(),
        });
    }
    Ok(())
}

/// Directory names from the denylist, without trailing slash
pub fn denied_directory_names() -> impl Iterator<Item = &'static str> {
    denylist::PREFIXES
        .iter()
        .map(|prefix| prefix.trim_end_matches('/'))
}

fn is_env_file(name: &str) -> bool {
    denylist::ENV_FILES.contains(&name) || name.starts_with(denylist::ENV_PREFIX)
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn escape(input: &str) -> CodesearchError {
    CodesearchError::PathEscape {
        path: input.to_string(),
    }
}
