//! Global context for CLI commands

use anyhow::{Context as _, Result, anyhow};
use codesearch_core::Config;
use codesearch_engines::SearchService;
use std::env;
use std::path::PathBuf;

/// The search service built over the fixed root and its config
pub struct Context {
    pub service: SearchService,
}

impl Context {
    /// Canonicalize the root once and load `codesearch.toml` from it
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The root does not exist
    /// - `codesearch.toml` cannot be read or is invalid
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = resolve_root(root)?;
        let config = Config::load(&root)?;
        let service = SearchService::new(&root, config)?;

        tracing::debug!(root = %root.display(), "loaded context");
        Ok(Self { service })
    }
}

/// `--root` (or `CODESEARCH_ROOT`), else the current directory, canonicalized
pub fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    let root = match root {
        Some(root) => root,
        None => env::current_dir().context("Failed to read current directory")?,
    };
    root.canonicalize()
        .map_err(|e| anyhow!("Root directory {} is not accessible: {}", root.display(), e))
}

/// Runtime for driving the async service from synchronous commands
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")
}
