//! Text engine selection
//!
//! Preference: ripgrep if available, else `git grep` when git is available
//! and the directory is inside a work tree, else grep. grep is never probed;
//! it is assumed present so text search always has an engine.

use crate::adapters::EngineKind;
use codesearch_core::config::EnginesConfig;
use codesearch_exec::Prober;
use serde::Serialize;
use std::path::Path;

#[derive(Clone)]
pub struct EngineSelector {
    prober: Prober,
    engines: EnginesConfig,
}

/// Availability of one engine binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    pub name: String,
    pub binary: String,
    pub available: bool,
}

/// Snapshot of what this host can search with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineReport {
    pub engines: Vec<EngineStatus>,
    pub inside_git_repo: bool,
    /// Engine a text search would use right now
    pub text_engine: String,
}

impl EngineSelector {
    pub fn new(prober: Prober, engines: EnginesConfig) -> Self {
        Self { prober, engines }
    }

    pub fn engines(&self) -> &EnginesConfig {
        &self.engines
    }

    pub async fn is_available(&self, kind: EngineKind, cwd: &Path) -> bool {
        self.prober
            .is_command_available(kind.binary(&self.engines), cwd)
            .await
    }

    pub async fn is_inside_git_repo(&self, cwd: &Path) -> bool {
        self.prober.is_inside_git_repo(&self.engines.git, cwd).await
    }

    pub async fn select_text_search_engine(&self, cwd: &Path) -> EngineKind {
        let selected = if self.is_available(EngineKind::Ripgrep, cwd).await {
            EngineKind::Ripgrep
        } else if self.is_available(EngineKind::GitGrep, cwd).await
            && self.is_inside_git_repo(cwd).await
        {
            EngineKind::GitGrep
        } else {
            EngineKind::Grep
        };

        tracing::debug!(engine = selected.name(), cwd = %cwd.display(), "selected text engine");
        selected
    }

    /// Probe every engine, for diagnostics
    pub async fn report(&self, cwd: &Path) -> EngineReport {
        let mut engines = Vec::with_capacity(EngineKind::ALL.len());
        for kind in EngineKind::ALL {
            engines.push(EngineStatus {
                name: kind.name().to_string(),
                binary: kind.binary(&self.engines).to_string(),
                available: self.is_available(kind, cwd).await,
            });
        }

        EngineReport {
            engines,
            inside_git_repo: self.is_inside_git_repo(cwd).await,
            text_engine: self.select_text_search_engine(cwd).await.name().to_string(),
        }
    }
}
