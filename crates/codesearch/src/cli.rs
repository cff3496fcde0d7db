//! CLI command structure using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use codesearch_core::JsonStyle;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "codesearch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory every search is confined to (defaults to the current directory)
    #[arg(long, global = true, env = "CODESEARCH_ROOT")]
    pub root: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the workspace
    #[command(subcommand)]
    Search(SearchCommands),

    /// Report which search engines are available
    Doctor {
        #[arg(long)]
        json: bool,
    },

    /// Run the MCP server over stdio
    Mcp,
}

#[derive(Subcommand)]
pub enum SearchCommands {
    /// Text search with the best available engine
    Text(TextArgs),

    /// Structural search with ast-grep
    Ast(AstArgs),

    /// Run a raw JSON search request
    Request {
        /// File containing the request, or "-" for stdin
        file: String,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
pub struct TextArgs {
    pub query: String,

    /// Treat the query as a regular expression
    #[arg(long)]
    pub regex: bool,

    #[arg(long)]
    pub case_sensitive: bool,

    /// Only search files matching this glob
    #[arg(long = "include", value_name = "GLOB")]
    pub include: Vec<String>,

    /// Skip files matching this glob
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Restrict the search to this path (repeatable)
    #[arg(long = "path", value_name = "PATH")]
    pub paths: Vec<String>,

    #[arg(long)]
    pub max_results: Option<i64>,

    #[arg(long = "max-per-file")]
    pub max_per_file: Option<i64>,

    /// Lines of context around each match (ripgrep only)
    #[arg(long = "context", value_name = "N")]
    pub context: Option<i64>,

    #[arg(long)]
    pub timeout_ms: Option<i64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args)]
pub struct AstArgs {
    pub pattern: String,

    #[arg(long = "lang", value_name = "LANG")]
    pub lang: Option<String>,

    #[arg(long = "path", value_name = "PATH")]
    pub paths: Vec<String>,

    #[arg(long)]
    pub max_results: Option<i64>,

    #[arg(long)]
    pub timeout_ms: Option<i64>,

    #[arg(long, value_enum)]
    pub json_style: Option<JsonStyleArg>,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Flags shared by every search subcommand
#[derive(Args)]
pub struct OutputArgs {
    /// Working directory, relative to the root
    #[arg(long)]
    pub cwd: Option<String>,

    /// Print the full response as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum JsonStyleArg {
    Pretty,
    Stream,
    Compact,
}

impl From<JsonStyleArg> for JsonStyle {
    fn from(style: JsonStyleArg) -> Self {
        match style {
            JsonStyleArg::Pretty => JsonStyle::Pretty,
            JsonStyleArg::Stream => JsonStyle::Stream,
            JsonStyleArg::Compact => JsonStyle::Compact,
        }
    }
}
