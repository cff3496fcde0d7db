//! Engine availability probing
//!
//! A binary counts as available when `<binary> --version` exits 0 within the
//! probe timeout. Results, and whether a cwd sits inside a git work tree, are
//! memoized per `(cwd, command)` in an
//! [`AvailabilityCache`] that the caller owns and injects; entries never expire,
//! so a binary installed or removed mid-process is not noticed until restart.

use crate::runner::{CommandRunner, RunOptions};
use codesearch_core::config::LimitsConfig;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Memo of `(cwd, command) -> bool`
///
/// Writes are idempotent booleans, so concurrent probes of the same key race
/// harmlessly; the lock only protects the map structure.
#[derive(Debug, Default)]
pub struct AvailabilityCache {
    entries: RwLock<HashMap<(PathBuf, String), bool>>,
}

impl AvailabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, cwd: &Path, command: &str) -> Option<bool> {
        let entries = self.entries.read().ok()?;
        entries
            .get(&(cwd.to_path_buf(), command.to_string()))
            .copied()
    }

    pub fn insert(&self, cwd: &Path, command: &str, available: bool) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert((cwd.to_path_buf(), command.to_string()), available);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Limits applied to probe processes
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub timeout: Duration,
    pub max_output_bytes: usize,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self::from(&LimitsConfig::default())
    }
}

impl From<&LimitsConfig> for ProbeSettings {
    fn from(limits: &LimitsConfig) -> Self {
        Self {
            timeout: Duration::from_millis(limits.probe_timeout_ms),
            max_output_bytes: limits.probe_max_output_bytes,
        }
    }
}

/// Runs short-lived probe processes through the injected runner
#[derive(Clone)]
pub struct Prober {
    runner: Arc<dyn CommandRunner>,
    cache: Arc<AvailabilityCache>,
    settings: ProbeSettings,
}

impl Prober {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        cache: Arc<AvailabilityCache>,
        settings: ProbeSettings,
    ) -> Self {
        Self {
            runner,
            cache,
            settings,
        }
    }

    pub fn cache(&self) -> &Arc<AvailabilityCache> {
        &self.cache
    }

    /// `<command> --version` exits 0; memoized per `(cwd, command)`
    pub async fn is_command_available(&self, command: &str, cwd: &Path) -> bool {
        if let Some(available) = self.cache.get(cwd, command) {
            return available;
        }

        let args = vec!["--version".to_string()];
        let available = match self.runner.run(command, &args, &self.options(cwd)).await {
            Ok(result) => result.success() && !result.timed_out,
            Err(e) => {
                tracing::debug!(command, "probe failed: {}", e);
                false
            }
        };

        tracing::debug!(command, cwd = %cwd.display(), available, "probed engine");
        self.cache.insert(cwd, command, available);
        available
    }

    /// `git rev-parse --is-inside-work-tree` prints `true`; memoized per cwd
    pub async fn is_inside_git_repo(&self, git: &str, cwd: &Path) -> bool {
        let key = format!("{} rev-parse --is-inside-work-tree", git);
        if let Some(inside) = self.cache.get(cwd, &key) {
            return inside;
        }

        let args = vec!["rev-parse".to_string(), "--is-inside-work-tree".to_string()];
        let inside = match self.runner.run(git, &args, &self.options(cwd)).await {
            Ok(result) => result.success() && result.stdout.trim() == "true",
            Err(e) => {
                tracing::debug!("git rev-parse failed: {}", e);
                false
            }
        };

        self.cache.insert(cwd, &key, inside);
        inside
    }

    fn options(&self, cwd: &Path) -> RunOptions {
        RunOptions::new(cwd, self.settings.timeout, self.settings.max_output_bytes)
    }
}
