use super::consts::limits;
use serde::{Deserialize, Serialize};

/// codesearch.toml schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub engines: EnginesConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Binary names (or paths) for each external engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnginesConfig {
    #[serde(default = "default_ripgrep")]
    pub ripgrep: String,
    #[serde(default = "default_git")]
    pub git: String,
    #[serde(default = "default_grep")]
    pub grep: String,
    #[serde(default = "default_ast_grep")]
    pub ast_grep: String,
}

impl Default for EnginesConfig {
    fn default() -> Self {
        Self {
            ripgrep: default_ripgrep(),
            git: default_git(),
            grep: default_grep(),
            ast_grep: default_ast_grep(),
        }
    }
}

fn default_ripgrep() -> String {
    "rg".to_string()
}

fn default_git() -> String {
    "git".to_string()
}

fn default_grep() -> String {
    "grep".to_string()
}

fn default_ast_grep() -> String {
    "ast-grep".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    #[serde(default = "default_probe_max_output_bytes")]
    pub probe_max_output_bytes: usize,
    #[serde(default = "default_kill_grace_ms")]
    pub kill_grace_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_output_bytes: default_max_output_bytes(),
            probe_timeout_ms: default_probe_timeout_ms(),
            probe_max_output_bytes: default_probe_max_output_bytes(),
            kill_grace_ms: default_kill_grace_ms(),
        }
    }
}

fn default_max_output_bytes() -> usize {
    limits::MAX_OUTPUT_BYTES
}

fn default_probe_timeout_ms() -> u64 {
    limits::PROBE_TIMEOUT_MS
}

fn default_probe_max_output_bytes() -> usize {
    limits::PROBE_MAX_OUTPUT_BYTES
}

fn default_kill_grace_ms() -> u64 {
    limits::KILL_GRACE_MS
}
