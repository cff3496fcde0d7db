//! Constants shared across the search pipeline

/// Bounds and defaults applied when normalizing requests
pub mod request {
    /// Accepted range for `maxResults`
    pub const MAX_RESULTS_MIN: i64 = 1;
    pub const MAX_RESULTS_MAX: i64 = 1000;
    pub const MAX_RESULTS_DEFAULT: i64 = 200;

    /// Accepted range for `maxMatchesPerFile`
    pub const MAX_MATCHES_PER_FILE_MIN: i64 = 1;
    pub const MAX_MATCHES_PER_FILE_MAX: i64 = 200;
    pub const MAX_MATCHES_PER_FILE_DEFAULT: i64 = 50;

    /// Accepted range for `contextLines`
    pub const CONTEXT_LINES_MIN: i64 = 0;
    pub const CONTEXT_LINES_MAX: i64 = 3;
    pub const CONTEXT_LINES_DEFAULT: i64 = 0;

    /// Accepted range for `timeoutMs`
    pub const TIMEOUT_MS_MIN: i64 = 500;
    pub const TIMEOUT_MS_MAX: i64 = 15_000;
    pub const TEXT_TIMEOUT_MS_DEFAULT: i64 = 8_000;
    pub const AST_TIMEOUT_MS_DEFAULT: i64 = 10_000;
}

/// Paths that are never searched nor returned
pub mod denylist {
    /// Exact file names
    pub const ENV_FILES: &[&str] = &[".env", ".env.local", ".env.production", ".env.development"];

    /// Directory prefixes (the bare directory name is denied as well)
    pub const PREFIXES: &[&str] = &[
        ".git/",
        ".next/",
        "node_modules/",
        "dist/",
        "coverage/",
        ".turbo/",
        ".cache/",
    ];

    /// File suffixes holding key material
    pub const SUFFIXES: &[&str] = &[".pem", ".key"];

    /// Any file starting with this prefix is an env file variant
    pub const ENV_PREFIX: &str = ".env.";
}

/// Fixed warning strings attached to responses
pub mod warnings {
    pub const TIMED_OUT: &str = "Search timed out before completion; results may be incomplete.";

    pub const OUTPUT_TRUNCATED: &str =
        "Search output exceeded the size limit; results may be incomplete.";

    pub const GREP_PRECISION: &str = "grep fallback is less precise than ripgrep: columns are always 1 and submatch ranges are unavailable.";

    pub const DENIED_MATCHES_REMOVED: &str =
        "Some matches were removed because they point to non-searchable paths.";

    pub const AST_UNAVAILABLE: &str =
        "ast-grep is not available; structural search returned no results.";
}

/// Defaults for `[limits]` in codesearch.toml
pub mod limits {
    /// Per-stream output cap for search processes (4 MiB)
    pub const MAX_OUTPUT_BYTES: usize = 4 * 1024 * 1024;

    /// Availability probe timeout
    pub const PROBE_TIMEOUT_MS: u64 = 1_000;

    /// Availability probe output cap
    pub const PROBE_MAX_OUTPUT_BYTES: usize = 8 * 1024;

    /// Time between SIGTERM and SIGKILL after a timeout
    pub const KILL_GRACE_MS: u64 = 500;
}

/// Config file name looked up at the process root
pub const CONFIG_FILE_NAME: &str = "codesearch.toml";
