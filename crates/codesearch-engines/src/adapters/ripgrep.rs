//! ripgrep (`rg --json`)
//!
//! rg prints one JSON event per line: `begin`, `context`, `match`, `end`, and a
//! final `summary`. Paths and line text arrive as `{"text": ...}` or, for
//! non-UTF-8 data, `{"bytes": <base64>}`.

use super::{EngineKind, ParsedOutput, SearchAdapter};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use codesearch_core::{NormalizedTextSearchRequest, SearchMatch, Submatch, TextMode};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct RipgrepAdapter {
    context_lines: usize,
}

impl RipgrepAdapter {
    /// `context_lines` tells the parser how far context events may sit from
    /// the match they belong to
    pub fn new(context_lines: usize) -> Self {
        Self { context_lines }
    }

    pub fn for_request(request: &NormalizedTextSearchRequest) -> Self {
        Self::new(request.context_lines)
    }
}

impl SearchAdapter for RipgrepAdapter {
    type Request = NormalizedTextSearchRequest;

    fn kind(&self) -> EngineKind {
        EngineKind::Ripgrep
    }

    fn build_args(&self, request: &NormalizedTextSearchRequest) -> Vec<String> {
        let mut args = vec![
            "--json".to_string(),
            "--max-count".to_string(),
            request.max_matches_per_file.to_string(),
        ];

        if request.mode == TextMode::Literal {
            args.push("--fixed-strings".to_string());
        }
        args.push(if request.case_sensitive {
            "--case-sensitive".to_string()
        } else {
            "--ignore-case".to_string()
        });
        if request.context_lines > 0 {
            args.push("--context".to_string());
            args.push(request.context_lines.to_string());
        }
        for glob in &request.include_globs {
            args.push("--glob".to_string());
            args.push(glob.clone());
        }
        for glob in &request.exclude_globs {
            args.push("--glob".to_string());
            args.push(format!("!{}", glob));
        }

        args.push("--".to_string());
        args.push(request.query.clone());
        args.extend(request.paths.iter().cloned());
        args
    }

    fn parse(&self, stdout: &str, max_results: usize) -> ParsedOutput {
        let mut collector = Collector::new(self.context_lines, max_results);

        for line in stdout.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let event: RgEvent = match serde_json::from_str(line) {
                Ok(event) => event,
                Err(e) => {
                    tracing::debug!("skipping undecodable rg line: {}", e);
                    continue;
                }
            };
            collector.accept(event);
        }

        collector.finish()
    }
}

#[derive(Debug, Deserialize)]
struct RgEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// A path or line payload: UTF-8 text or base64-encoded raw bytes
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RgData {
    Text { text: String },
    Bytes { bytes: String },
}

impl RgData {
    fn decode(&self) -> Option<String> {
        match self {
            RgData::Text { text } => Some(text.clone()),
            RgData::Bytes { bytes } => STANDARD
                .decode(bytes)
                .ok()
                .map(|raw| String::from_utf8_lossy(&raw).into_owned()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RgLineData {
    path: RgData,
    lines: RgData,
    line_number: Option<u64>,
    #[serde(default)]
    submatches: Vec<RgSubmatch>,
}

#[derive(Debug, Deserialize)]
struct RgSubmatch {
    #[serde(rename = "match")]
    matched: RgData,
    start: usize,
    end: usize,
}

#[derive(Debug, Deserialize)]
struct RgSummary {
    stats: RgStats,
}

#[derive(Debug, Deserialize)]
struct RgStats {
    searches: u64,
}

/// A decoded `match` or `context` line
struct DecodedLine {
    file: String,
    line: u64,
    text: String,
    submatches: Vec<RgSubmatch>,
}

fn decode_line(data: Value) -> Option<DecodedLine> {
    let data: RgLineData = serde_json::from_value(data).ok()?;
    Some(DecodedLine {
        file: data.path.decode()?,
        line: data.line_number?,
        text: trim_line_ending(&data.lines.decode()?).to_string(),
        submatches: data.submatches,
    })
}

fn trim_line_ending(text: &str) -> &str {
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.strip_suffix('\r').unwrap_or(text)
}

/// 1-based character column of byte offset `offset` in `text`
fn char_column(text: &str, offset: usize) -> u64 {
    let chars = text
        .get(..offset)
        .map(|prefix| prefix.chars().count())
        .unwrap_or(offset);
    chars as u64 + 1
}

fn to_match(decoded: DecodedLine) -> SearchMatch {
    let mut found = SearchMatch::at(decoded.file, decoded.line, 1, "");

    if let Some(first) = decoded.submatches.first() {
        found.column = char_column(&decoded.text, first.start);
        found.end_line = Some(decoded.line);
        found.end_column = Some(char_column(&decoded.text, first.end));
    }
    if !decoded.submatches.is_empty() {
        found.submatches = Some(
            decoded
                .submatches
                .iter()
                .map(|sub| Submatch {
                    start: sub.start,
                    end: sub.end,
                    text: sub.matched.decode(),
                })
                .collect(),
        );
    }
    found.snippet = decoded.text;
    found
}

/// Folds the event stream into matches, pairing context lines with the match
/// they surround
struct Collector {
    context_lines: usize,
    max_results: usize,
    matches: Vec<SearchMatch>,
    /// Context seen since the last match in the current file
    pending_before: Vec<(String, u64, String)>,
    files_scanned: Option<u64>,
    capped: bool,
}

impl Collector {
    fn new(context_lines: usize, max_results: usize) -> Self {
        Self {
            context_lines,
            max_results,
            matches: Vec::new(),
            pending_before: Vec::new(),
            files_scanned: None,
            capped: false,
        }
    }

    fn accept(&mut self, event: RgEvent) {
        match event.kind.as_str() {
            "begin" => self.pending_before.clear(),
            "match" => {
                if self.matches.len() >= self.max_results {
                    self.capped = true;
                    return;
                }
                if let Some(decoded) = decode_line(event.data) {
                    self.push_match(decoded);
                }
            }
            "context" => {
                if let Some(decoded) = decode_line(event.data) {
                    self.push_context(decoded);
                }
            }
            "summary" => {
                if let Ok(summary) = serde_json::from_value::<RgSummary>(event.data) {
                    self.files_scanned = Some(summary.stats.searches);
                }
            }
            _ => {}
        }
    }

    fn push_match(&mut self, decoded: DecodedLine) {
        let mut found = to_match(decoded);
        let reach = self.context_lines as u64;
        let before: Vec<String> = self
            .pending_before
            .drain(..)
            .filter(|(file, line, _)| {
                *file == found.file && *line < found.line && found.line - line <= reach
            })
            .map(|(_, _, text)| text)
            .collect();
        found.context_before = before;
        self.matches.push(found);
    }

    fn push_context(&mut self, decoded: DecodedLine) {
        if self.context_lines == 0 {
            return;
        }
        let reach = self.context_lines as u64;

        if let Some(last) = self.matches.last_mut() {
            if last.file == decoded.file
                && decoded.line > last.line
                && decoded.line - last.line <= reach
                && last.context_after.len() < self.context_lines
            {
                last.context_after.push(decoded.text.clone());
            }
        }

        if self.pending_before.len() == self.context_lines {
            self.pending_before.remove(0);
        }
        self.pending_before
            .push((decoded.file, decoded.line, decoded.text));
    }

    fn finish(self) -> ParsedOutput {
        let mut parsed = ParsedOutput::new(self.matches, self.capped);
        parsed.files_scanned = self.files_scanned;
        parsed
    }
}
