//! POSIX/GNU grep, the fallback that is always assumed present

use super::{EngineKind, ParsedOutput, SearchAdapter, grep_mode_flag, parse_grep_lines};
use codesearch_core::config::consts::warnings;
use codesearch_core::NormalizedTextSearchRequest;
use codesearch_core::path::denied_directory_names;

#[derive(Debug, Clone, Copy, Default)]
pub struct GrepAdapter;

impl SearchAdapter for GrepAdapter {
    type Request = NormalizedTextSearchRequest;

    fn kind(&self) -> EngineKind {
        EngineKind::Grep
    }

    fn build_args(&self, request: &NormalizedTextSearchRequest) -> Vec<String> {
        let mut args: Vec<String> = ["-r", "-n", "-H", "-I", "--color=never"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        args.push(grep_mode_flag(request.mode).to_string());
        if !request.case_sensitive {
            args.push("-i".to_string());
        }
        args.push("-m".to_string());
        args.push(request.max_matches_per_file.to_string());

        for glob in &request.include_globs {
            args.push(format!("--include={}", glob));
        }
        for glob in &request.exclude_globs {
            args.push(format!("--exclude={}", glob));
        }
        // grep has no ignore files; keep it out of the denylisted trees
        for dir in denied_directory_names() {
            args.push(format!("--exclude-dir={}", dir));
        }

        args.push("-e".to_string());
        args.push(request.query.clone());
        args.push("--".to_string());
        args.extend(request.paths.iter().cloned());
        args
    }

    fn parse(&self, stdout: &str, max_results: usize) -> ParsedOutput {
        parse_grep_lines(stdout, max_results)
    }

    fn notes(&self) -> &'static [&'static str] {
        &[warnings::GREP_PRECISION]
    }
}
