//! Captured log records and the buffer that holds them.

use std::fmt;
use std::sync::Arc;

use browser_logger_protocol::RuntimeEvent;
use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Kind given to uncaught exceptions.
pub const EXCEPTION_KIND: &str = "error";

/// One captured console call or uncaught exception.
///
/// Serializes as `{"type": ..., "timestamp": ..., "message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
	/// Console level as reported by the runtime, or `error` for exceptions.
	#[serde(rename = "type")]
	pub kind: String,
	/// Capture time, ISO-8601 UTC with millisecond precision.
	pub timestamp: String,
	pub message: String,
}

impl LogRecord {
	/// Creates a record stamped with the current time.
	pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			kind: kind.into(),
			timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
			message: message.into(),
		}
	}

	pub fn from_event(event: &RuntimeEvent) -> Self {
		match event {
			RuntimeEvent::ConsoleApiCalled(call) => Self::new(call.kind.clone(), call.message()),
			RuntimeEvent::ExceptionThrown(thrown) => Self::new(EXCEPTION_KIND, thrown.message()),
		}
	}
}

/// Renders the record as a single JSON line.
impl fmt::Display for LogRecord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
		f.write_str(&json)
	}
}

/// Append-only, ordered, unbounded buffer of [`LogRecord`]s.
///
/// Clones share the same buffer. Every operation takes the lock exactly once,
/// so a destructive [`read`](Self::read) can neither duplicate nor lose a
/// record appended concurrently.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
	records: Arc<Mutex<Vec<LogRecord>>>,
}

impl LogSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn append(&self, record: LogRecord) {
		self.records.lock().push(record);
	}

	/// Returns a snapshot of every record in arrival order, emptying the
	/// buffer in the same step when `clear` is set.
	pub fn read(&self, clear: bool) -> Vec<LogRecord> {
		let mut records = self.records.lock();
		if clear {
			std::mem::take(&mut *records)
		} else {
			records.clone()
		}
	}

	/// Empties the buffer, returning how many records were dropped.
	pub fn clear(&self) -> usize {
		let mut records = self.records.lock();
		let dropped = records.len();
		records.clear();
		dropped
	}

	pub fn len(&self) -> usize {
		self.records.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.lock().is_empty()
	}
}
