use codesearch_core::CodesearchError;
use rmcp::ErrorData;
use serde_json::json;
use std::fmt::Display;

// Client-facing codes come from CodesearchError::code
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

pub fn invalid_params(code: &str, message: impl Into<String>) -> ErrorData {
    ErrorData::invalid_params(message.into(), Some(json!({ "code": code })))
}

pub fn internal_error(message: impl Into<String>) -> ErrorData {
    error_with_code(INTERNAL_ERROR, message)
}

pub fn error_with_code(code: &str, message: impl Into<String>) -> ErrorData {
    ErrorData::internal_error(message.into(), Some(json!({ "code": code })))
}

/// Client-caused failures become `invalid_params`, the rest `internal_error`
pub fn from_core_error(error: CodesearchError) -> ErrorData {
    let code = error.code();
    if error.is_client_error() {
        invalid_params(code, error.to_string())
    } else {
        tracing::warn!(code, "search failed: {}", error);
        error_with_code(code, error.to_string())
    }
}

pub fn from_display(error: impl Display) -> ErrorData {
    internal_error(format!("{}", error))
}
