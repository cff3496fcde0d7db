//! Canonical search response schema shared by every engine

use crate::request::TextMode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Literal,
    Regex,
    Ast,
}

impl From<TextMode> for SearchMode {
    fn from(mode: TextMode) -> Self {
        match mode {
            TextMode::Literal => SearchMode::Literal,
            TextMode::Regex => SearchMode::Regex,
        }
    }
}

/// Byte range of a hit inside `SearchMatch::snippet` (end exclusive)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Submatch {
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// One hit; `line`/`column` are always 1-based
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub file: String,
    pub line: u64,
    pub column: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u64>,
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submatches: Option<Vec<Submatch>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_before: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_after: Vec<String>,
}

impl SearchMatch {
    /// A single-position match, as produced by line-oriented engines
    pub fn at(file: impl Into<String>, line: u64, column: u64, snippet: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            end_line: None,
            end_column: None,
            snippet: snippet.into(),
            submatches: None,
            context_before: Vec::new(),
            context_after: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_scanned: Option<u64>,
    pub files_matched: u64,
    pub matches_returned: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchResponse {
    pub engine: String,
    pub query: String,
    pub mode: SearchMode,
    pub truncated: bool,
    pub stats: SearchStats,
    pub warnings: Vec<String>,
    pub matches: Vec<SearchMatch>,
}

impl SearchResponse {
    /// A well-formed response with no matches
    pub fn empty(engine: impl Into<String>, query: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            engine: engine.into(),
            query: query.into(),
            mode,
            truncated: false,
            stats: SearchStats::default(),
            warnings: Vec::new(),
            matches: Vec::new(),
        }
    }

    /// Append a warning unless it is already present
    pub fn push_warning(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    /// Recompute `matchesReturned` and `filesMatched` from `matches`
    pub fn refresh_counts(&mut self) {
        self.stats.matches_returned = self.matches.len() as u64;
        self.stats.files_matched = count_files(&self.matches);
    }
}

/// Number of distinct files among `matches`
pub fn count_files(matches: &[SearchMatch]) -> u64 {
    matches
        .iter()
        .map(|m| m.file.as_str())
        .collect::<HashSet<_>>()
        .len() as u64
}
