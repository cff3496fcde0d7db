//! External process execution for codesearch.
//!
//! - [`runner`]: spawn one binary under a timeout and per-stream output caps
//! - [`probe`]: memoized `--version` availability checks and git detection
//! - [`info`]: binary location for diagnostics
//!
//! ```text
//! Prober::is_command_available(cmd, cwd)
//!     ↓
//! 1. AvailabilityCache hit → return
//!     ↓ (miss)
//! 2. CommandRunner::run(cmd, ["--version"])  (1s, 8KB)
//!     ↓
//! 3. exit 0 → available; memoize
//! ```

pub mod info;
pub mod probe;
pub mod runner;

pub use info::{BinaryInfo, BinarySource, locate_binary};
pub use probe::{AvailabilityCache, ProbeSettings, Prober};
pub use runner::{CappedBuffer, CommandRunner, RunOptions, RunnerResult, TokioRunner, run_command};
