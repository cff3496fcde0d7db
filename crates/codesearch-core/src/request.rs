//! Search request schema and validation
//!
//! [`SearchRequest`] is what callers send (untrusted). [`SearchRequest::validate`]
//! turns it into a [`NormalizedRequest`]: trimmed, clamped to the bounds in
//! [`crate::config::consts::request`], and with every path sandboxed.

use crate::config::consts::request as bounds;
use crate::error::{CodesearchError, Result};
use crate::path::{ensure_searchable, to_workspace_relative_path};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Raw request (as given by the caller)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchRequest {
    Text(TextSearchRequest),
    Ast(AstSearchRequest),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    #[default]
    Literal,
    Regex,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum JsonStyle {
    Pretty,
    #[default]
    Stream,
    Compact,
}

impl JsonStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonStyle::Pretty => "pretty",
            JsonStyle::Stream => "stream",
            JsonStyle::Compact => "compact",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextSearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<TextMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_globs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_globs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_matches_per_file: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_lines: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AstSearchRequest {
    #[serde(default)]
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_style: Option<JsonStyle>,
}

// ============================================================================
// Normalized request (validated, clamped, sandboxed)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTextSearchRequest {
    pub query: String,
    pub mode: TextMode,
    pub case_sensitive: bool,
    pub include_globs: Vec<String>,
    pub exclude_globs: Vec<String>,
    pub paths: Vec<String>,
    pub max_results: usize,
    pub max_matches_per_file: usize,
    pub context_lines: usize,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAstSearchRequest {
    pub pattern: String,
    pub language: Option<String>,
    pub paths: Vec<String>,
    pub max_results: usize,
    pub timeout_ms: u64,
    pub json_style: JsonStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedRequest {
    Text(NormalizedTextSearchRequest),
    Ast(NormalizedAstSearchRequest),
}

impl SearchRequest {
    /// Decode an untrusted JSON value
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn validate(&self) -> Result<NormalizedRequest> {
        match self {
            SearchRequest::Text(text) => text.validate().map(NormalizedRequest::Text),
            SearchRequest::Ast(ast) => ast.validate().map(NormalizedRequest::Ast),
        }
    }
}

impl TextSearchRequest {
    pub fn validate(&self) -> Result<NormalizedTextSearchRequest> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(CodesearchError::invalid_request("query is required"));
        }

        Ok(NormalizedTextSearchRequest {
            query: query.to_string(),
            mode: self.mode.unwrap_or_default(),
            case_sensitive: self.case_sensitive.unwrap_or(false),
            include_globs: clean_globs(self.include_globs.as_deref()),
            exclude_globs: clean_globs(self.exclude_globs.as_deref()),
            paths: normalize_paths(self.paths.as_deref())?,
            max_results: clamp(
                self.max_results,
                bounds::MAX_RESULTS_DEFAULT,
                bounds::MAX_RESULTS_MIN,
                bounds::MAX_RESULTS_MAX,
            ) as usize,
            max_matches_per_file: clamp(
                self.max_matches_per_file,
                bounds::MAX_MATCHES_PER_FILE_DEFAULT,
                bounds::MAX_MATCHES_PER_FILE_MIN,
                bounds::MAX_MATCHES_PER_FILE_MAX,
            ) as usize,
            context_lines: clamp(
                self.context_lines,
                bounds::CONTEXT_LINES_DEFAULT,
                bounds::CONTEXT_LINES_MIN,
                bounds::CONTEXT_LINES_MAX,
            ) as usize,
            timeout_ms: clamp(
                self.timeout_ms,
                bounds::TEXT_TIMEOUT_MS_DEFAULT,
                bounds::TIMEOUT_MS_MIN,
                bounds::TIMEOUT_MS_MAX,
            ) as u64,
        })
    }
}

impl AstSearchRequest {
    pub fn validate(&self) -> Result<NormalizedAstSearchRequest> {
        let pattern = self.pattern.trim();
        if pattern.is_empty() {
            return Err(CodesearchError::invalid_request("pattern is required"));
        }

        let language = self
            .language
            .as_deref()
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .map(str::to_string);

        Ok(NormalizedAstSearchRequest {
            pattern: pattern.to_string(),
            language,
            paths: normalize_paths(self.paths.as_deref())?,
            max_results: clamp(
                self.max_results,
                bounds::MAX_RESULTS_DEFAULT,
                bounds::MAX_RESULTS_MIN,
                bounds::MAX_RESULTS_MAX,
            ) as usize,
            timeout_ms: clamp(
                self.timeout_ms,
                bounds::AST_TIMEOUT_MS_DEFAULT,
                bounds::TIMEOUT_MS_MIN,
                bounds::TIMEOUT_MS_MAX,
            ) as u64,
            json_style: self.json_style.unwrap_or_default(),
        })
    }
}

fn clamp(value: Option<i64>, default: i64, min: i64, max: i64) -> i64 {
    value.unwrap_or(default).clamp(min, max)
}

fn clean_globs(globs: Option<&[String]>) -> Vec<String> {
    globs
        .unwrap_or_default()
        .iter()
        .map(|glob| glob.trim())
        .filter(|glob| !glob.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sandbox every requested path; defaults to the working directory itself
fn normalize_paths(paths: Option<&[String]>) -> Result<Vec<String>> {
    let mut normalized = Vec::new();
    for raw in paths.unwrap_or_default() {
        if raw.trim().is_empty() {
            continue;
        }
        let path = to_workspace_relative_path(raw)?;
        ensure_searchable(&path)?;
        if !normalized.contains(&path) {
            normalized.push(path);
        }
    }

    if normalized.is_empty() {
        normalized.push(".".to_string());
    }

    Ok(normalized)
}
