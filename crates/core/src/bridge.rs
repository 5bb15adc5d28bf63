//! Application context behind the tool surface.

use std::sync::Arc;
use std::time::Duration;

use browser_logger_runtime::{Connector, DiscoveryClient, Result, WebSocketConnector, discovery_url};
use tracing::{debug, info};

use crate::directory::TargetDirectory;
use crate::error::ToolError;
use crate::log_sink::LogSink;
use crate::session::{ConnectOutcome, DebugSession};

/// Rendered by `list_targets` when the snapshot is empty.
pub const NO_TARGETS: &str = "(No targets found)";
/// Rendered by `get_logs` when the buffer is empty.
pub const NO_LOGS: &str = "(No logs yet)";

/// Startup settings for a [`Bridge`].
#[derive(Debug, Clone)]
pub struct BridgeConfig {
	/// Full discovery url, e.g. `http://localhost:9222/json`.
	pub discovery_url: String,
	/// Fetch the target list once before serving.
	pub initial_refresh: bool,
	/// How long shutdown waits for the close handshake.
	pub shutdown_grace: Duration,
}

impl Default for BridgeConfig {
	fn default() -> Self {
		Self {
			discovery_url: discovery_url("localhost", 9222),
			initial_refresh: true,
			shutdown_grace: Duration::from_millis(500),
		}
	}
}

/// Owns the target directory, the debug session and the log sink.
///
/// One per process; every tool handler shares it through an `Arc`.
#[derive(Debug)]
pub struct Bridge {
	directory: TargetDirectory,
	session: DebugSession,
	logs: LogSink,
	config: BridgeConfig,
}

impl Bridge {
	/// Creates a bridge that attaches to targets over WebSocket.
	pub fn new(config: BridgeConfig) -> Result<Self> {
		Self::with_connector(config, Arc::new(WebSocketConnector))
	}

	/// Creates a bridge that opens event streams through `connector`.
	pub fn with_connector(config: BridgeConfig, connector: Arc<dyn Connector>) -> Result<Self> {
		let client = DiscoveryClient::new(config.discovery_url.clone())?;
		let logs = LogSink::new();
		Ok(Self {
			directory: TargetDirectory::new(client),
			session: DebugSession::new(connector, logs.clone()),
			logs,
			config,
		})
	}

	pub fn config(&self) -> &BridgeConfig {
		&self.config
	}

	pub fn directory(&self) -> &TargetDirectory {
		&self.directory
	}

	pub fn session(&self) -> &DebugSession {
		&self.session
	}

	pub fn logs(&self) -> &LogSink {
		&self.logs
	}

	/// Renders the target snapshot, refreshing it first when asked to.
	pub async fn list_targets(&self, refresh: bool) -> String {
		if refresh {
			self.directory.refresh().await;
		}

		let targets = self.directory.list();
		if targets.is_empty() {
			return NO_TARGETS.to_string();
		}
		targets
			.iter()
			.map(|t| t.render_block())
			.collect::<Vec<_>>()
			.join("\n")
	}

	/// Attaches to the target with `id` from the current snapshot.
	///
	/// An unknown id leaves the session as it was.
	pub async fn connect_target(&self, id: &str) -> std::result::Result<String, ToolError> {
		let target = self
			.directory
			.get(id)
			.ok_or_else(|| ToolError::TargetNotFound(id.to_string()))?;
		let title = target.title.clone();

		match self.session.connect(target).await {
			Ok(ConnectOutcome::Open) => Ok(format!("Connected to: {title}")),
			Ok(ConnectOutcome::Superseded) => Err(ToolError::Superseded { title }),
			Err(source) => Err(ToolError::ConnectFailed { title, source }),
		}
	}

	/// Renders every buffered record as one JSON object per line.
	pub fn get_logs(&self, clear: bool) -> String {
		let records = self.logs.read(clear);
		debug!(target = "browser_logger.bridge", count = records.len(), clear, "Current logs");
		if records.is_empty() {
			return NO_LOGS.to_string();
		}
		records
			.iter()
			.map(ToString::to_string)
			.collect::<Vec<_>>()
			.join("\n")
	}

	pub fn clear_logs(&self) -> String {
		let dropped = self.logs.clear();
		debug!(target = "browser_logger.bridge", dropped, "logs cleared");
		"Logs cleared".to_string()
	}

	/// Closes the debug session, waiting at most the configured grace period.
	pub async fn shutdown(&self) {
		info!(target = "browser_logger.bridge", "Shutting down");
		self.session.shutdown(self.config.shutdown_grace).await;
	}
}
