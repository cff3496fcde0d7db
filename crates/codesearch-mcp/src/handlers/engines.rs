//! search_engines handler

use super::json_result;
use crate::context::McpContext;
use crate::errors;
use rmcp::model::CallToolResult;
use rmcp::{ErrorData as McpError, schemars};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchEnginesArgs {
    /// Directory to probe from, relative to the server root
    #[serde(default)]
    pub working_directory: Option<String>,
}

pub async fn search_engines(
    context: &McpContext,
    args: SearchEnginesArgs,
) -> Result<CallToolResult, McpError> {
    let cwd = context
        .service
        .resolve_working_directory(args.working_directory.as_deref())
        .await
        .map_err(errors::from_core_error)?;

    let report = context.service.selector().report(&cwd).await;
    json_result(&report)
}
