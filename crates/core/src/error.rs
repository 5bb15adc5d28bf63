use browser_logger_runtime::Error as RuntimeError;
use thiserror::Error;

/// Failure of one of the bridge's tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
	/// The id is not in the most recent discovery snapshot.
	#[error("Target not found: {0}")]
	TargetNotFound(String),

	#[error("Failed to connect to: {title} ({source})")]
	ConnectFailed {
		title: String,
		#[source]
		source: RuntimeError,
	},

	/// A later connect or close replaced the attempt before it opened.
	#[error("Failed to connect to: {title} (superseded by a later request)")]
	Superseded { title: String },
}

impl ToolError {
	/// Whether the caller sent arguments the bridge cannot act on, as opposed
	/// to the operation itself failing.
	pub fn is_invalid_params(&self) -> bool {
		matches!(self, ToolError::TargetNotFound(_))
	}
}
