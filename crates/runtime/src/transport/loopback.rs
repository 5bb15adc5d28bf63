//! In-process transport.
//!
//! [`pair`] returns the local [`TransportParts`] plus the remote [`Peer`] end,
//! which can observe outbound frames, push inbound frames and hang up. Used to
//! drive a debug session without a browser.

use serde_json::Value;
use tokio::sync::mpsc;

use super::{Outbound, TransportParts, TransportSender};

/// Remote end of a loopback transport.
#[derive(Debug)]
pub struct Peer {
	outbound: mpsc::UnboundedReceiver<Outbound>,
	inbound: Option<mpsc::UnboundedSender<String>>,
}

/// Creates a connected loopback transport.
pub fn pair() -> (TransportParts, Peer) {
	let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
	let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

	let parts = TransportParts {
		sender: TransportSender::new(outbound_tx),
		receiver: inbound_rx,
	};
	let peer = Peer {
		outbound: outbound_rx,
		inbound: Some(inbound_tx),
	};
	(parts, peer)
}

impl Peer {
	/// Delivers a JSON frame to the local end. Returns false if nobody is listening.
	pub fn push(&self, frame: &Value) -> bool {
		self.push_text(frame.to_string())
	}

	/// Delivers a raw text frame to the local end.
	pub fn push_text(&self, text: impl Into<String>) -> bool {
		match &self.inbound {
			Some(tx) => tx.send(text.into()).is_ok(),
			None => false,
		}
	}

	/// Waits for the next frame the local end sent.
	pub async fn next_outbound(&mut self) -> Option<Outbound> {
		self.outbound.recv().await
	}

	/// Returns an already queued outbound frame without waiting.
	pub fn try_next_outbound(&mut self) -> Option<Outbound> {
		self.outbound.try_recv().ok()
	}

	/// Closes the inbound stream, as a remote close would.
	pub fn hang_up(&mut self) {
		self.inbound = None;
	}
}
