use crate::context::{Context, runtime};
use anyhow::Result;
use codesearch_mcp::CodesearchServer;
use std::path::PathBuf;

/// Run MCP server in stdio mode
pub fn run_stdio(root: Option<PathBuf>) -> Result<()> {
    let ctx = Context::new(root)?;

    let rt = runtime()?;
    rt.block_on(async { CodesearchServer::run_stdio_server(ctx.service).await })
}
