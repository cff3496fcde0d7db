//! code_search handler

use super::json_result;
use crate::context::McpContext;
use crate::errors;
use codesearch_core::SearchRequest;
use codesearch_engines::SearchOptions;
use rmcp::model::CallToolResult;
use rmcp::{ErrorData as McpError, schemars};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodeSearchArgs {
    /// `{"type": "text", "query": ...}` or `{"type": "ast", "pattern": ...}`
    pub request: SearchRequest,
    /// Directory to search from, relative to the server root
    #[serde(default)]
    pub working_directory: Option<String>,
}

pub async fn code_search(
    context: &McpContext,
    args: CodeSearchArgs,
) -> Result<CallToolResult, McpError> {
    let options = SearchOptions {
        working_directory: args.working_directory,
    };
    let response = context
        .service
        .execute_search(&args.request, &options)
        .await
        .map_err(errors::from_core_error)?;

    tracing::debug!(
        engine = %response.engine,
        matches = response.matches.len(),
        "code_search finished"
    );
    json_result(&response)
}
