use std::fmt;
use std::path::{Path, PathBuf};

/// Where a configured engine binary was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinarySource {
    /// Configured as an explicit path
    Explicit,
    /// Looked up on the system PATH
    System,
    NotFound,
}

impl fmt::Display for BinarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinarySource::Explicit => write!(f, "configured path"),
            BinarySource::System => write!(f, "system PATH"),
            BinarySource::NotFound => write!(f, "not found"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BinaryInfo {
    pub name: String,
    pub source: BinarySource,
    pub path: Option<PathBuf>,
}

/// Locate `binary` the way the OS would when spawning it
///
/// Used for reporting only; availability itself is decided by probing.
pub fn locate_binary(binary: &str) -> BinaryInfo {
    let as_path = Path::new(binary);
    if as_path.components().count() > 1 {
        let source = if as_path.is_file() {
            BinarySource::Explicit
        } else {
            BinarySource::NotFound
        };
        return BinaryInfo {
            name: binary.to_string(),
            path: (source == BinarySource::Explicit).then(|| as_path.to_path_buf()),
            source,
        };
    }

    match which::which(binary) {
        Ok(path) => BinaryInfo {
            name: binary.to_string(),
            source: BinarySource::System,
            path: Some(path),
        },
        Err(_) => BinaryInfo {
            name: binary.to_string(),
            source: BinarySource::NotFound,
            path: None,
        },
    }
}
