use crate::errors;
use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

pub mod engines;
pub mod search;

/// Serialize `value` as the single text content of a successful result
pub(crate) fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string(value).map_err(errors::from_display)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
