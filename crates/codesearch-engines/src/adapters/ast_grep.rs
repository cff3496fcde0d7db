//! ast-grep structural search (`ast-grep run --json=<style>`)
//!
//! `--json=pretty` and `--json=compact` print a single JSON array,
//! `--json=stream` prints one object per line. ast-grep positions are 0-based.

use super::{EngineKind, ParsedOutput, SearchAdapter};
use codesearch_core::{NormalizedAstSearchRequest, SearchMatch};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct AstGrepAdapter;

impl SearchAdapter for AstGrepAdapter {
    type Request = NormalizedAstSearchRequest;

    fn kind(&self) -> EngineKind {
        EngineKind::AstGrep
    }

    fn build_args(&self, request: &NormalizedAstSearchRequest) -> Vec<String> {
        // `=` keeps a pattern starting with `-` bound to its flag
        let mut args = vec!["run".to_string(), format!("--pattern={}", request.pattern)];
        if let Some(language) = &request.language {
            args.push(format!("--lang={}", language));
        }
        args.push(format!("--json={}", request.json_style.as_str()));
        args.push("--".to_string());
        args.extend(request.paths.iter().cloned());
        args
    }

    fn parse(&self, stdout: &str, max_results: usize) -> ParsedOutput {
        let items = decode_items(stdout);

        let mut matches = Vec::new();
        let mut capped = false;
        for item in items {
            let Some(found) = decode_match(item) else {
                continue;
            };
            if matches.len() >= max_results {
                capped = true;
                break;
            }
            matches.push(found);
        }

        ParsedOutput::new(matches, capped)
    }
}

/// Split output into raw JSON items, sniffing array vs newline-delimited
fn decode_items(stdout: &str) -> Vec<Value> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if let Some(body) = trimmed.strip_prefix('[') {
        return match serde_json::from_str::<Vec<Value>>(trimmed) {
            Ok(items) => items,
            Err(e) => {
                tracing::debug!("incomplete ast-grep array output: {}", e);
                decode_array_prefix(body)
            }
        };
    }

    trimmed
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<Value>(line) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::debug!("skipping undecodable ast-grep line: {}", e);
                None
            }
        })
        .collect()
}

/// Complete leading elements of an array cut off by the output cap
fn decode_array_prefix(body: &str) -> Vec<Value> {
    let mut items = Vec::new();
    let mut rest = body;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if rest.is_empty() || rest.starts_with(']') {
            break;
        }

        let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
        match stream.next() {
            Some(Ok(item)) => {
                let consumed = stream.byte_offset();
                items.push(item);
                rest = &rest[consumed..];
            }
            _ => break,
        }
    }
    items
}

#[derive(Debug, Deserialize)]
struct AstMatch {
    file: String,
    range: AstRange,
    #[serde(default)]
    lines: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AstRange {
    start: AstPosition,
    end: AstPosition,
}

#[derive(Debug, Deserialize)]
struct AstPosition {
    line: u64,
    column: u64,
}

fn decode_match(item: Value) -> Option<SearchMatch> {
    let item: AstMatch = serde_json::from_value(item).ok()?;
    let snippet = item.lines.or(item.text).unwrap_or_default();
    let snippet = snippet.strip_suffix('\n').unwrap_or(&snippet).to_string();

    let mut found = SearchMatch::at(
        item.file,
        item.range.start.line + 1,
        item.range.start.column + 1,
        snippet,
    );
    found.end_line = Some(item.range.end.line + 1);
    found.end_column = Some(item.range.end.column + 1);
    Some(found)
}
