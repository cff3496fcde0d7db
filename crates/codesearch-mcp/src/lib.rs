//! MCP boundary for codesearch
//!
//! Exposes the search service to agents over stdio as two tools:
//! `code_search` and `search_engines`. Validation failures surface as
//! `invalid_params`, everything else as `internal_error`; both carry a stable
//! `data.code`.

// Re-export rmcp for convenience
pub use rmcp;

pub mod context;
pub mod errors;
pub mod handlers;
pub mod server;

pub use context::McpContext;
pub use server::CodesearchServer;
