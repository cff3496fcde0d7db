//! Search orchestration
//!
//! `execute_search` is the only entry point boundary layers call. It pins the
//! working directory inside the root, validates, dispatches to an engine and
//! finally drops any reported file that the denylist forbids, even when the
//! requested paths were clean.

use crate::adapters::{
    AstGrepAdapter, EngineKind, GitGrepAdapter, GrepAdapter, RipgrepAdapter, SearchAdapter,
};
use crate::selector::EngineSelector;
use codesearch_core::config::consts::warnings;
use codesearch_core::path::{is_denied_path, to_workspace_relative_path};
use codesearch_core::{
    CodesearchError, Config, NormalizedAstSearchRequest, NormalizedRequest,
    NormalizedTextSearchRequest, Result, SearchMode, SearchRequest, SearchResponse,
};
use codesearch_exec::{
    AvailabilityCache, CommandRunner, ProbeSettings, Prober, RunOptions, TokioRunner,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Per-call options supplied by the boundary layer
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Directory to search from, relative to the root (or absolute inside it)
    pub working_directory: Option<String>,
}

impl SearchOptions {
    pub fn in_directory(working_directory: impl Into<String>) -> Self {
        Self {
            working_directory: Some(working_directory.into()),
        }
    }
}

/// One engine run, described independently of the engine
struct EngineRun<'a> {
    cwd: &'a Path,
    query: &'a str,
    mode: SearchMode,
    max_results: usize,
    timeout_ms: u64,
}

#[derive(Clone)]
pub struct SearchService {
    root: PathBuf,
    config: Config,
    runner: Arc<dyn CommandRunner>,
    selector: EngineSelector,
}

impl SearchService {
    /// Service over `root` using real processes and a fresh availability cache
    pub fn new(root: impl AsRef<Path>, config: Config) -> Result<Self> {
        Self::with_runner(
            root,
            config,
            Arc::new(TokioRunner),
            Arc::new(AvailabilityCache::new()),
        )
    }

    pub fn with_runner(
        root: impl AsRef<Path>,
        config: Config,
        runner: Arc<dyn CommandRunner>,
        cache: Arc<AvailabilityCache>,
    ) -> Result<Self> {
        let root = root.as_ref().canonicalize()?;
        let prober = Prober::new(
            runner.clone(),
            cache,
            ProbeSettings::from(&config.limits),
        );
        let selector = EngineSelector::new(prober, config.engines.clone());

        Ok(Self {
            root,
            config,
            runner,
            selector,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn selector(&self) -> &EngineSelector {
        &self.selector
    }

    /// Resolve a caller-supplied working directory inside the root
    ///
    /// `None` or blank means the root itself.
    ///
    /// # Errors
    ///
    /// - `WorkspaceEscape` if the canonical directory is outside the root
    /// - `PathDenied` if the directory is itself denylisted
    /// - `InvalidRequest` if it does not exist or is not a directory
    pub async fn resolve_working_directory(&self, requested: Option<&str>) -> Result<PathBuf> {
        let requested = requested.map(str::trim).unwrap_or_default();
        if requested.is_empty() {
            return Ok(self.root.clone());
        }

        let joined = self.root.join(requested);
        let canonical = tokio::fs::canonicalize(&joined).await.map_err(|_| {
            CodesearchError::invalid_request(format!(
                "Working directory does not exist: {}",
                requested
            ))
        })?;

        if !canonical.starts_with(&self.root) {
            return Err(CodesearchError::WorkspaceEscape { path: canonical });
        }
        if !canonical.is_dir() {
            return Err(CodesearchError::invalid_request(format!(
                "Working directory is not a directory: {}",
                requested
            )));
        }

        let relative = relative_display(&self.root, &canonical);
        if relative != "." && is_denied_path(&relative) {
            return Err(CodesearchError::PathDenied { path: relative });
        }

        Ok(canonical)
    }

    pub async fn execute_search(
        &self,
        request: &SearchRequest,
        options: &SearchOptions,
    ) -> Result<SearchResponse> {
        let started = Instant::now();
        let cwd = self
            .resolve_working_directory(options.working_directory.as_deref())
            .await?;

        let normalized = request.validate()?;
        let paths = match &normalized {
            NormalizedRequest::Text(text) => &text.paths,
            NormalizedRequest::Ast(ast) => &ast.paths,
        };
        self.confine_paths(paths, &cwd).await?;

        let mut response = match normalized {
            NormalizedRequest::Text(text) => self.run_text_search(&text, &cwd).await?,
            NormalizedRequest::Ast(ast) => self.run_ast_search(&ast, &cwd).await?,
        };

        remove_denied_matches(&mut response);
        response.stats.duration_ms = started.elapsed().as_millis() as u64;
        Ok(response)
    }

    /// Reject request paths that resolve outside the root or into a denied tree
    ///
    /// Paths are already lexically clean; this resolves the deepest existing
    /// ancestor of each one on disk. Engines follow symlinks named on their
    /// command line, so a link inside the root must not point outside it.
    ///
    /// # Errors
    ///
    /// - `PathEscape` if a path resolves outside the root
    /// - `PathDenied` if a path resolves into a denylisted tree
    pub async fn confine_paths(&self, paths: &[String], cwd: &Path) -> Result<()> {
        for path in paths {
            let mut candidate = cwd.join(path);
            let resolved = loop {
                match tokio::fs::canonicalize(&candidate).await {
                    Ok(resolved) => break resolved,
                    Err(_) => match candidate.parent() {
                        Some(parent) => candidate = parent.to_path_buf(),
                        None => break cwd.to_path_buf(),
                    },
                }
            };

            if !resolved.starts_with(&self.root) {
                tracing::warn!(
                    path = %path,
                    resolved = %resolved.display(),
                    "request path escapes root"
                );
                return Err(CodesearchError::PathEscape { path: path.clone() });
            }

            let relative = relative_display(&self.root, &resolved);
            if relative != "." && is_denied_path(&relative) {
                return Err(CodesearchError::PathDenied { path: path.clone() });
            }
        }
        Ok(())
    }

    pub async fn run_text_search(
        &self,
        request: &NormalizedTextSearchRequest,
        cwd: &Path,
    ) -> Result<SearchResponse> {
        let run = EngineRun {
            cwd,
            query: &request.query,
            mode: request.mode.into(),
            max_results: request.max_results,
            timeout_ms: request.timeout_ms,
        };

        match self.selector.select_text_search_engine(cwd).await {
            EngineKind::Ripgrep => {
                self.run_engine(&RipgrepAdapter::for_request(request), request, &run)
                    .await
            }
            EngineKind::GitGrep => self.run_engine(&GitGrepAdapter, request, &run).await,
            EngineKind::Grep | EngineKind::AstGrep => {
                self.run_engine(&GrepAdapter, request, &run).await
            }
        }
    }

    /// Structural search; an unavailable ast-grep is a warning, not an error
    pub async fn run_ast_search(
        &self,
        request: &NormalizedAstSearchRequest,
        cwd: &Path,
    ) -> Result<SearchResponse> {
        if !self.selector.is_available(EngineKind::AstGrep, cwd).await {
            tracing::warn!("ast-grep unavailable, returning empty result");
            let mut response =
                SearchResponse::empty(EngineKind::AstGrep.name(), &request.pattern, SearchMode::Ast);
            response.push_warning(warnings::AST_UNAVAILABLE);
            return Ok(response);
        }

        let run = EngineRun {
            cwd,
            query: &request.pattern,
            mode: SearchMode::Ast,
            max_results: request.max_results,
            timeout_ms: request.timeout_ms,
        };
        self.run_engine(&AstGrepAdapter, request, &run).await
    }

    async fn run_engine<A: SearchAdapter>(
        &self,
        adapter: &A,
        request: &A::Request,
        run: &EngineRun<'_>,
    ) -> Result<SearchResponse> {
        let kind = adapter.kind();
        let binary = kind.binary(&self.config.engines);
        let args = adapter.build_args(request);
        tracing::debug!(engine = kind.name(), binary, ?args, "running search");

        let options = RunOptions::new(
            run.cwd,
            Duration::from_millis(run.timeout_ms),
            self.config.limits.max_output_bytes,
        )
        .with_kill_grace(Duration::from_millis(self.config.limits.kill_grace_ms));

        let mut response = SearchResponse::empty(kind.name(), run.query, run.mode);
        for note in adapter.notes() {
            response.push_warning(*note);
        }

        let result = match self.runner.run(binary, &args, &options).await {
            Ok(result) => result,
            Err(CodesearchError::Spawn { source, .. }) => {
                // Probe said yes but the spawn failed; report, don't fail
                tracing::warn!(engine = kind.name(), "failed to start engine: {}", source);
                response.push_warning(format!("Failed to start {}: {}", kind.name(), source));
                return Ok(response);
            }
            Err(e) => return Err(e),
        };

        let parsed = adapter.parse(&result.stdout, run.max_results);
        response.truncated = parsed.capped || result.truncated;
        response.stats.files_scanned = parsed.files_scanned;
        response.stats.duration_ms = result.duration_ms;
        response.matches = parsed.matches;
        response.refresh_counts();

        if result.timed_out {
            response.push_warning(warnings::TIMED_OUT);
        } else if let Some(code) = result.exit_code.filter(|code| *code >= 2) {
            let detail = result.first_stderr_line().unwrap_or("no error output");
            response.push_warning(format!(
                "{} exited with status {}: {}",
                kind.name(),
                code,
                detail
            ));
        }
        if result.truncated {
            response.push_warning(warnings::OUTPUT_TRUNCATED);
        }

        Ok(response)
    }
}

/// Drop matches whose file is denylisted (or not a clean relative path) and
/// recount
fn remove_denied_matches(response: &mut SearchResponse) {
    let before = response.matches.len();
    response.matches.retain_mut(|found| {
        match to_workspace_relative_path(&found.file) {
            Ok(normalized) if !is_denied_path(&normalized) => {
                found.file = normalized;
                true
            }
            _ => false,
        }
    });

    let removed = before - response.matches.len();
    if removed > 0 {
        tracing::warn!(removed, "dropped matches in non-searchable paths");
        response.push_warning(warnings::DENIED_MATCHES_REMOVED);
    }
    response.refresh_counts();
}

/// `dir` relative to `root`, forward-slashed; `"."` for the root itself
fn relative_display(root: &Path, dir: &Path) -> String {
    let relative = dir.strip_prefix(root).unwrap_or(dir);
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codesearch_core::SearchMatch;

    fn response_with(files: &[&str]) -> SearchResponse {
        let mut response = SearchResponse::empty("grep", "needle", SearchMode::Literal);
        response.matches = files
            .iter()
            .enumerate()
            .map(|(i, file)| SearchMatch::at(*file, i as u64 + 1, 1, "needle"))
            .collect();
        response.refresh_counts();
        response
    }

    #[test]
    fn test_remove_denied_matches_filters_and_warns_once() {
        let mut response = response_with(&[
            "./src/a.rs",
            "node_modules/pkg/index.js",
            ".git/config",
            "src/b.rs",
            "certs/server.pem",
        ]);

        remove_denied_matches(&mut response);

        let files: Vec<_> = response.matches.iter().map(|m| m.file.as_str()).collect();
        assert_eq!(files, vec!["src/a.rs", "src/b.rs"]);
        assert_eq!(response.stats.matches_returned, 2);
        assert_eq!(response.stats.files_matched, 2);
        assert_eq!(
            response
                .warnings
                .iter()
                .filter(|w| *w == warnings::DENIED_MATCHES_REMOVED)
                .count(),
            1
        );
    }

    #[test]
    fn test_remove_denied_matches_rejects_escaping_files() {
        let mut response = response_with(&["../outside.rs", "/etc/passwd", "ok.rs"]);
        remove_denied_matches(&mut response);
        assert_eq!(response.matches.len(), 1);
        assert_eq!(response.matches[0].file, "ok.rs");
        assert!(!response.warnings.is_empty());
    }

    #[test]
    fn test_remove_denied_matches_clean_output_has_no_warning() {
        let mut response = response_with(&["src/a.rs"]);
        remove_denied_matches(&mut response);
        assert!(response.warnings.is_empty());
        assert_eq!(response.stats.matches_returned, 1);
    }

    #[test]
    fn test_relative_display() {
        let root = Path::new("/work");
        assert_eq!(relative_display(root, Path::new("/work")), ".");
        assert_eq!(relative_display(root, Path::new("/work/a/b")), "a/b");
    }
}
