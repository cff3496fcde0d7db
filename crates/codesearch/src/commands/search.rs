//! Search commands: `search text`, `search ast`, `search request`

use crate::cli::{AstArgs, OutputArgs, TextArgs};
use crate::context::{Context, runtime};
use crate::output::{print_json, print_response};
use anyhow::{Context as _, Result};
use codesearch_core::{AstSearchRequest, SearchRequest, TextMode, TextSearchRequest};
use codesearch_engines::SearchOptions;
use std::io::Read;
use std::path::PathBuf;

pub fn run_text(root: Option<PathBuf>, args: TextArgs) -> Result<()> {
    let request = SearchRequest::Text(TextSearchRequest {
        query: args.query,
        mode: Some(if args.regex {
            TextMode::Regex
        } else {
            TextMode::Literal
        }),
        case_sensitive: Some(args.case_sensitive),
        include_globs: non_empty(args.include),
        exclude_globs: non_empty(args.exclude),
        paths: non_empty(args.paths),
        max_results: args.max_results,
        max_matches_per_file: args.max_per_file,
        context_lines: args.context,
        timeout_ms: args.timeout_ms,
    });

    execute(root, &request, &args.output)
}

pub fn run_ast(root: Option<PathBuf>, args: AstArgs) -> Result<()> {
    let request = SearchRequest::Ast(AstSearchRequest {
        pattern: args.pattern,
        language: args.lang,
        paths: non_empty(args.paths),
        max_results: args.max_results,
        timeout_ms: args.timeout_ms,
        json_style: args.json_style.map(Into::into),
    });

    execute(root, &request, &args.output)
}

/// Run a raw `SearchRequest` read from `file` (`-` for stdin)
pub fn run_request(root: Option<PathBuf>, file: String, output: OutputArgs) -> Result<()> {
    let raw = if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read request file {}", file))?
    };

    let value: serde_json::Value =
        serde_json::from_str(&raw).context("Request is not valid JSON")?;
    let request = SearchRequest::from_json(value)?;

    execute(root, &request, &output)
}

fn execute(root: Option<PathBuf>, request: &SearchRequest, output: &OutputArgs) -> Result<()> {
    let ctx = Context::new(root)?;
    let options = SearchOptions {
        working_directory: output.cwd.clone(),
    };

    let rt = runtime()?;
    let response = rt.block_on(ctx.service.execute_search(request, &options))?;

    if output.json {
        print_json(&serde_json::to_string_pretty(&response)?)?;
    } else {
        print_response(&response)?;
    }
    Ok(())
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    (!values.is_empty()).then_some(values)
}
