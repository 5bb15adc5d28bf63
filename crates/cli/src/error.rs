//! Mapping of bridge outcomes onto MCP results.

use browser_logger::ToolError;
use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content, ErrorCode};
use serde_json::json;

/// Turns a bridge operation's outcome into a tool response.
///
/// Bad arguments become JSON-RPC invalid-params errors. Operational failures,
/// such as a target that refused the connection, become tool results flagged
/// with `isError` so the client sees them without the request failing.
pub fn tool_result(outcome: Result<String, ToolError>) -> Result<CallToolResult, McpError> {
	match outcome {
		Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
		Err(err) if err.is_invalid_params() => Err(invalid_params(&err)),
		Err(err) => Ok(CallToolResult::error(vec![Content::text(err.to_string())])),
	}
}

fn invalid_params(err: &ToolError) -> McpError {
	let data = match err {
		ToolError::TargetNotFound(id) => Some(json!({ "id": id })),
		_ => None,
	};
	McpError::invalid_params(err.to_string(), data)
}

/// JSON-RPC method-not-found error for a tool name the server does not offer.
pub fn unknown_tool(name: &str) -> McpError {
	McpError::new(ErrorCode::METHOD_NOT_FOUND, format!("Unknown tool: {name}"), None)
}
