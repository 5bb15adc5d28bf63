//! Event-stream frames.
//!
//! Inbound frames are decoded by their `method` discriminant. The two runtime
//! events the bridge cares about get typed payloads; responses are kept so the
//! enable acknowledgement can be checked; everything else is [`InboundFrame::Ignored`].

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::remote_object::{RemoteObject, join_args};

pub const RUNTIME_ENABLE: &str = "Runtime.enable";
pub const CONSOLE_API_CALLED: &str = "Runtime.consoleAPICalled";
pub const EXCEPTION_THROWN: &str = "Runtime.exceptionThrown";

/// Request id used for the single `Runtime.enable` request sent per connection.
pub const ENABLE_REQUEST_ID: u64 = 1;

/// Builds the request that makes the remote start emitting runtime events.
pub fn enable_runtime_request() -> Value {
	json!({
		"id": ENABLE_REQUEST_ID,
		"method": RUNTIME_ENABLE,
	})
}

/// Frame decoding failure.
#[derive(Debug, Error)]
pub enum FrameError {
	/// The frame is not valid JSON, or not a JSON object.
	#[error("malformed frame: {0}")]
	Json(#[from] serde_json::Error),

	/// A recognized method arrived with params of the wrong shape.
	#[error("unexpected params for {method}: {source}")]
	Shape {
		method: String,
		#[source]
		source: serde_json::Error,
	},
}

/// Payload of `Runtime.consoleAPICalled`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleApiCalled {
	/// Console method as reported (`log`, `warning`, `error`, `table`, ...)
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub args: Vec<RemoteObject>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timestamp: Option<f64>,
}

impl ConsoleApiCalled {
	pub fn message(&self) -> String {
		join_args(&self.args)
	}
}

/// `exceptionDetails` of `Runtime.exceptionThrown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
	pub text: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub line_number: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub column_number: Option<u32>,
}

/// Payload of `Runtime.exceptionThrown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionThrown {
	pub exception_details: ExceptionDetails,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timestamp: Option<f64>,
}

impl ExceptionThrown {
	/// `<text> at <url>`, or just `<text>` when the exception has no script url.
	pub fn message(&self) -> String {
		let details = &self.exception_details;
		match details.url.as_deref() {
			Some(url) if !url.is_empty() => format!("{} at {}", details.text, url),
			_ => details.text.clone(),
		}
	}
}

/// Runtime events that produce log records.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEvent {
	ConsoleApiCalled(ConsoleApiCalled),
	ExceptionThrown(ExceptionThrown),
}

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
	/// A runtime event worth logging
	Event(RuntimeEvent),
	/// A response to one of our requests
	Response { id: u64, error: Option<Value> },
	/// Any other event, or a frame with neither `method` nor `id`
	Ignored { method: Option<String> },
}

#[derive(Deserialize)]
struct RawFrame {
	#[serde(default)]
	id: Option<u64>,
	#[serde(default)]
	method: Option<String>,
	#[serde(default)]
	params: Option<Value>,
	#[serde(default)]
	error: Option<Value>,
}

impl InboundFrame {
	/// Decodes one text frame.
	pub fn parse(raw: &str) -> Result<Self, FrameError> {
		let frame: RawFrame = serde_json::from_str(raw)?;

		let Some(method) = frame.method else {
			return Ok(match frame.id {
				Some(id) => InboundFrame::Response {
					id,
					error: frame.error,
				},
				None => InboundFrame::Ignored { method: None },
			});
		};

		let params = frame.params.unwrap_or(Value::Null);
		let event = match method.as_str() {
			CONSOLE_API_CALLED => RuntimeEvent::ConsoleApiCalled(decode(&method, params)?),
			EXCEPTION_THROWN => RuntimeEvent::ExceptionThrown(decode(&method, params)?),
			_ => {
				return Ok(InboundFrame::Ignored {
					method: Some(method),
				});
			}
		};

		Ok(InboundFrame::Event(event))
	}
}

fn decode<T: serde::de::DeserializeOwned>(method: &str, params: Value) -> Result<T, FrameError> {
	serde_json::from_value(params).map_err(|source| FrameError::Shape {
		method: method.to_string(),
		source,
	})
}
