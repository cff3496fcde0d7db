//! Engine adapters
//!
//! Each adapter turns a normalized request into an argument vector for one
//! external tool and turns that tool's stdout back into canonical matches.
//! Adapters never touch processes; the service runs them through a
//! [`CommandRunner`](codesearch_exec::CommandRunner).

mod ast_grep;
mod git_grep;
mod grep;
mod ripgrep;

pub use ast_grep::AstGrepAdapter;
pub use git_grep::GitGrepAdapter;
pub use grep::GrepAdapter;
pub use ripgrep::RipgrepAdapter;

use codesearch_core::config::EnginesConfig;
use codesearch_core::{SearchMatch, TextMode, response::count_files};
use std::fmt;

/// The closed set of engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    Ripgrep,
    GitGrep,
    Grep,
    AstGrep,
}

impl EngineKind {
    pub const ALL: [EngineKind; 4] = [
        EngineKind::Ripgrep,
        EngineKind::GitGrep,
        EngineKind::Grep,
        EngineKind::AstGrep,
    ];

    /// Name reported in `SearchResponse::engine`
    pub fn name(self) -> &'static str {
        match self {
            EngineKind::Ripgrep => "ripgrep",
            EngineKind::GitGrep => "git-grep",
            EngineKind::Grep => "grep",
            EngineKind::AstGrep => "ast-grep",
        }
    }

    /// Configured binary that implements this engine
    pub fn binary(self, engines: &EnginesConfig) -> &str {
        match self {
            EngineKind::Ripgrep => &engines.ripgrep,
            EngineKind::GitGrep => &engines.git,
            EngineKind::Grep => &engines.grep,
            EngineKind::AstGrep => &engines.ast_grep,
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Matches decoded from one engine run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedOutput {
    pub matches: Vec<SearchMatch>,
    pub files_matched: u64,
    /// Files the engine reports having searched, when it says so
    pub files_scanned: Option<u64>,
    /// More matches were available than `max_results`
    pub capped: bool,
}

impl ParsedOutput {
    pub(crate) fn new(matches: Vec<SearchMatch>, capped: bool) -> Self {
        Self {
            files_matched: count_files(&matches),
            matches,
            files_scanned: None,
            capped,
        }
    }
}

/// Argument builder and output parser for one engine
pub trait SearchAdapter {
    type Request;

    fn kind(&self) -> EngineKind;

    fn build_args(&self, request: &Self::Request) -> Vec<String>;

    /// Decode stdout into at most `max_results` matches
    ///
    /// Undecodable lines are skipped, never fatal.
    fn parse(&self, stdout: &str, max_results: usize) -> ParsedOutput;

    /// Warnings attached to every response from this engine
    fn notes(&self) -> &'static [&'static str] {
        &[]
    }
}

/// `-F` for literal queries, `-E` for regex
pub(crate) fn grep_mode_flag(mode: TextMode) -> &'static str {
    match mode {
        TextMode::Literal => "-F",
        TextMode::Regex => "-E",
    }
}

/// Parse `path:line:content` output shared by grep and git grep
///
/// Splits on the first two `:`; a file name containing `:` is therefore
/// misparsed, and a line whose second field is not a number is skipped.
pub(crate) fn parse_grep_lines(stdout: &str, max_results: usize) -> ParsedOutput {
    let mut matches = Vec::new();
    let mut capped = false;

    for line in stdout.lines() {
        let Some(found) = parse_grep_line(line) else {
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

fn parse_grep_line(line: &str) -> Option<SearchMatch> {
    let (file, rest) = line.split_once(':')?;
    let (line_number, content) = rest.split_once(':')?;
    let line_number: u64 = line_number.parse().ok()?;
    if file.is_empty() || line_number == 0 {
        return None;
    }
    let content = content.strip_suffix('\r').unwrap_or(content);
    Some(SearchMatch::at(file, line_number, 1, content))
}
