//! Message-oriented transports to a target's event stream.
//!
//! Every transport is split into the same two halves:
//!
//! - [`TransportSender`] queues outbound text frames (and a close request) for
//!   a writer task that owns the write half of the connection.
//! - [`TransportReceiver`] yields inbound text frames, in arrival order, from a
//!   reader task that owns the read half. It returns `None` once the remote
//!   closed the stream or the connection failed.
//!
//! Nothing here blocks: sending is a queue push, so callers holding a lock can
//! send and close without awaiting.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::{Error, Result};

pub mod loopback;
mod websocket;


pub use websocket::{WebSocketConnector, connect_websocket};

/// Frame queued for the writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
	/// A text frame
	Text(String),
	/// Begin the close handshake; the writer exits afterwards
	Close,
}

/// Receiving half: inbound text frames in arrival order.
pub type TransportReceiver = mpsc::UnboundedReceiver<String>;

/// Sending half of a transport. Cheap to clone.
#[derive(Debug, Clone)]
pub struct TransportSender {
	tx: mpsc::UnboundedSender<Outbound>,
}

impl TransportSender {
	pub fn new(tx: mpsc::UnboundedSender<Outbound>) -> Self {
		Self { tx }
	}

	/// Serializes `message` and queues it as a text frame.
	pub fn send(&self, message: &Value) -> Result<()> {
		let text = serde_json::to_string(message)?;
		self.send_text(text)
	}

	/// Queues a raw text frame.
	pub fn send_text(&self, text: String) -> Result<()> {
		self.tx
			.send(Outbound::Text(text))
			.map_err(|_| Error::ChannelClosed)
	}

	/// Asks the writer to start the close handshake. Idempotent and best-effort.
	pub fn close(&self) {
		let _ = self.tx.send(Outbound::Close);
	}
}

/// Both halves of an open transport.
#[derive(Debug)]
pub struct TransportParts {
	pub sender: TransportSender,
	pub receiver: TransportReceiver,
}

/// Opens transports to event-stream addresses.
///
/// The debug session only knows this trait, which keeps it independent of the
/// WebSocket stack and lets tests script connection outcomes.
pub trait Connector: Send + Sync {
	/// Opens a connection to `address`. Resolves once the handshake completed.
	fn open<'a>(
		&'a self,
		address: &'a str,
	) -> Pin<Box<dyn Future<Output = Result<TransportParts>> + Send + 'a>>;
}
