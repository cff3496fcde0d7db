// Core modules
pub mod config;
pub mod error;
pub mod path;
pub mod request;
pub mod response;

// Re-export commonly used types
pub use config::Config;
pub use error::{CodesearchError, Result};
pub use request::{
    AstSearchRequest, JsonStyle, NormalizedAstSearchRequest, NormalizedRequest,
    NormalizedTextSearchRequest, SearchRequest, TextMode, TextSearchRequest,
};
pub use response::{SearchMatch, SearchMode, SearchResponse, SearchStats, Submatch};
