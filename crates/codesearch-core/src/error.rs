use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodesearchError {
    // Request errors
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Path escapes workspace: {path}")]
    PathEscape { path: String },

    #[error("Path is not searchable: {path}")]
    PathDenied { path: String },

    #[error("Working directory resolves outside the workspace root: {}", .path.display())]
    WorkspaceEscape { path: PathBuf },

    // Config errors
    #[error("CONFIG_INVALID: {0}")]
    ConfigInvalid(String),

    // Process errors
    #[error("Failed to start {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO_ERROR: {0}")]
    Io(#[from] std::io::Error),
}

impl CodesearchError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Stable machine-readable code for boundary layers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_INPUT",
            Self::PathEscape { .. } | Self::WorkspaceEscape { .. } => "PATH_ESCAPE",
            Self::PathDenied { .. } => "PATH_DENIED",
            Self::ConfigInvalid(_) => "CONFIG_INVALID",
            Self::Spawn { .. } => "SPAWN_FAILED",
            Self::Io(_) => "INTERNAL_ERROR",
        }
    }

    /// True for failures caused by the caller's input (4xx class).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest(_)
                | Self::PathEscape { .. }
                | Self::PathDenied { .. }
                | Self::WorkspaceEscape { .. }
        )
    }
}

impl From<serde_json::Error> for CodesearchError {
    fn from(err: serde_json::Error) -> Self {
        CodesearchError::InvalidRequest(format!("invalid search request: {}", err))
    }
}

impl From<toml::de::Error> for CodesearchError {
    fn from(err: toml::de::Error) -> Self {
        CodesearchError::ConfigInvalid(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CodesearchError>;
