//! `git grep`, scoped to the tracked files of the enclosing repository

use super::{EngineKind, ParsedOutput, SearchAdapter, grep_mode_flag, parse_grep_lines};
use codesearch_core::NormalizedTextSearchRequest;

#[derive(Debug, Clone, Copy, Default)]
pub struct GitGrepAdapter;

impl SearchAdapter for GitGrepAdapter {
    type Request = NormalizedTextSearchRequest;

    fn kind(&self) -> EngineKind {
        EngineKind::GitGrep
    }

    fn build_args(&self, request: &NormalizedTextSearchRequest) -> Vec<String> {
        // quotePath=false keeps non-ASCII paths unescaped
        let mut args: Vec<String> = ["-c", "core.quotePath=false", "grep", "-n", "-I", "--no-color"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        args.push(grep_mode_flag(request.mode).to_string());
        if !request.case_sensitive {
            args.push("-i".to_string());
        }
        args.push("--max-count".to_string());
        args.push(request.max_matches_per_file.to_string());
        args.push("-e".to_string());
        args.push(request.query.clone());
        args.push("--".to_string());
        args.extend(pathspecs(request));
        args
    }

    fn parse(&self, stdout: &str, max_results: usize) -> ParsedOutput {
        parse_grep_lines(stdout, max_results)
    }
}

/// Positive pathspecs are OR'd by git, so include globs are folded into
/// each search path rather than listed beside it. Request paths never carry
/// pathspec magic of their own.
fn pathspecs(request: &NormalizedTextSearchRequest) -> Vec<String> {
    let mut specs = Vec::new();
    for path in &request.paths {
        if request.include_globs.is_empty() {
            specs.push(literal_pathspec(path));
            continue;
        }
        for glob in &request.include_globs {
            specs.push(format!(":(glob){}{}", glob_prefix(path), anywhere(glob)));
        }
    }
    for glob in &request.exclude_globs {
        specs.push(format!(":(exclude,glob){}", anywhere(glob)));
    }
    specs
}

fn literal_pathspec(path: &str) -> String {
    if path == "." {
        path.to_string()
    } else {
        format!(":(literal){}", path)
    }
}

/// `path/` with glob metacharacters escaped; empty for the working directory
fn glob_prefix(path: &str) -> String {
    if path == "." {
        return String::new();
    }
    let mut escaped = String::with_capacity(path.len() + 1);
    for c in path.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('/');
    escaped
}

/// A slash-free glob matches a file name at any depth, as rg and grep do
fn anywhere(glob: &str) -> String {
    if glob.contains('/') {
        glob.trim_start_matches('/').to_string()
    } else {
        format!("**/{}", glob)
    }
}
