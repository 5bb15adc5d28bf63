//! Error types for the browser-logger runtime.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the debugging endpoint.
#[derive(Debug, Error)]
pub enum Error {
	/// HTTP request to the discovery endpoint failed.
	#[error("Discovery request failed: {0}")]
	Http(#[from] reqwest::Error),

	/// Discovery endpoint answered with a non-success status.
	#[error("Discovery endpoint returned status {0}")]
	UnexpectedStatus(u16),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// WebSocket handshake or I/O error.
	#[error("WebSocket error: {0}")]
	WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

	/// Failed to establish a connection to the target.
	#[error("Failed to connect to target: {0}")]
	ConnectionFailed(String),

	/// Target cannot be attached to because it exposes no debugger url.
	#[error("Target {target_id} has no webSocketDebuggerUrl (is another debugger attached?)")]
	MissingDebuggerUrl { target_id: String },

	/// Channel closed unexpectedly.
	#[error("Channel closed unexpectedly")]
	ChannelClosed,
}
