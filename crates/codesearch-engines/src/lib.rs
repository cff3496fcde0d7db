//! Search engines for codesearch
//!
//! ```text
//! SearchService::execute_search(request, options)
//!     ↓
//! 1. resolve working directory inside the root
//! 2. SearchRequest::validate()
//!     ↓
//! 3. text → EngineSelector (rg > git grep > grep)    ast → ast-grep only
//!     ↓
//! 4. SearchAdapter::build_args → CommandRunner::run → SearchAdapter::parse
//!     ↓
//! 5. drop denied files from the output, recount
//! ```

pub mod adapters;
pub mod selector;
pub mod service;

pub use adapters::{EngineKind, ParsedOutput, SearchAdapter};
pub use selector::{EngineReport, EngineSelector, EngineStatus};
pub use service::{SearchOptions, SearchService};
