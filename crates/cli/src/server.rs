//! The MCP tool surface.

use std::sync::Arc;
use std::time::Instant;

use browser_logger::Bridge;
use rmcp::ErrorData as McpError;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::tool::ToolCallContext;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
	CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam,
	ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{ServerHandler, tool, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::error::{tool_result, unknown_tool};

pub const SERVER_NAME: &str = "browser-logger";

/// Every tool the server offers.
pub const TOOL_NAMES: [&str; 4] = ["list_targets", "connect_target", "get_logs", "clear_logs"];

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListTargetsRequest {
	/// Re-fetch the target list from the browser before listing
	#[serde(default)]
	pub refresh: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ConnectTargetRequest {
	/// Target id as shown by list_targets
	pub id: String,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct GetLogsRequest {
	/// Empty the buffer after reading
	#[serde(default)]
	pub clear: bool,
}

/// Rejects names outside [`TOOL_NAMES`] with a method-not-found error.
pub fn check_tool_name(name: &str) -> Result<(), McpError> {
	if TOOL_NAMES.contains(&name) {
		Ok(())
	} else {
		Err(unknown_tool(name))
	}
}

#[derive(Clone)]
pub struct BrowserLoggerServer {
	bridge: Arc<Bridge>,
	tool_router: ToolRouter<Self>,
}

#[tool_router(router = tool_router)]
impl BrowserLoggerServer {
	pub fn new(bridge: Arc<Bridge>) -> Self {
		Self {
			bridge,
			tool_router: Self::tool_router(),
		}
	}

	#[tool(
		name = "list_targets",
		description = "List debuggable browser targets (tabs, workers) with their ids."
	)]
	async fn list_targets(
		&self,
		Parameters(req): Parameters<ListTargetsRequest>,
	) -> Result<CallToolResult, McpError> {
		let start = Instant::now();
		info!(target = "browser_logger.tools", tool = "list_targets", refresh = req.refresh, "start");
		let text = self.bridge.list_targets(req.refresh).await;
		info!(
			target = "browser_logger.tools",
			tool = "list_targets",
			elapsed_ms = start.elapsed().as_millis(),
			"ok"
		);
		tool_result(Ok(text))
	}

	#[tool(
		name = "connect_target",
		description = "Attach to a target by id and start capturing its console output. Replaces any existing connection."
	)]
	async fn connect_target(
		&self,
		Parameters(req): Parameters<ConnectTargetRequest>,
	) -> Result<CallToolResult, McpError> {
		let start = Instant::now();
		info!(target = "browser_logger.tools", tool = "connect_target", id = %req.id, "start");
		let outcome = self.bridge.connect_target(&req.id).await;
		info!(
			target = "browser_logger.tools",
			tool = "connect_target",
			ok = outcome.is_ok(),
			elapsed_ms = start.elapsed().as_millis(),
			"done"
		);
		tool_result(outcome)
	}

	#[tool(
		name = "get_logs",
		description = "Return captured console messages and exceptions, one JSON object per line."
	)]
	async fn get_logs(
		&self,
		Parameters(req): Parameters<GetLogsRequest>,
	) -> Result<CallToolResult, McpError> {
		info!(target = "browser_logger.tools", tool = "get_logs", clear = req.clear, "start");
		tool_result(Ok(self.bridge.get_logs(req.clear)))
	}

	#[tool(name = "clear_logs", description = "Discard all captured log records.")]
	async fn clear_logs(&self) -> Result<CallToolResult, McpError> {
		info!(target = "browser_logger.tools", tool = "clear_logs", "start");
		tool_result(Ok(self.bridge.clear_logs()))
	}
}

impl ServerHandler for BrowserLoggerServer {
	fn get_info(&self) -> ServerInfo {
		let mut server_info = Implementation::from_build_env();
		server_info.name = SERVER_NAME.into();
		server_info.version = env!("CARGO_PKG_VERSION").into();

		ServerInfo {
			capabilities: ServerCapabilities::builder().enable_tools().build(),
			server_info,
			instructions: Some(
				"Browser console bridge: list_targets, connect_target by id, then get_logs.".into(),
			),
			..Default::default()
		}
	}

	async fn list_tools(
		&self,
		_request: Option<PaginatedRequestParam>,
		_context: RequestContext<RoleServer>,
	) -> Result<ListToolsResult, McpError> {
		Ok(ListToolsResult {
			tools: self.tool_router.list_all(),
			..Default::default()
		})
	}

	async fn call_tool(
		&self,
		request: CallToolRequestParam,
		context: RequestContext<RoleServer>,
	) -> Result<CallToolResult, McpError> {
		check_tool_name(&request.name)?;
		self.tool_router
			.call(ToolCallContext::new(self, request, context))
			.await
	}
}
