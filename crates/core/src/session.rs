//! The single debug session and its connection lifecycle.
//!
//! ```text
//! Disconnected --connect()--> Connecting --open--> Open
//! Connecting   --error/close()--> Disconnected
//! Open         --close()--> Closing --stream end--> Disconnected
//! Open         --remote close--> Disconnected
//! any          --connect()--> (release old) --> Connecting
//! ```
//!
//! Every connect attempt takes a new epoch. A pending attempt or frame pump
//! only touches state, or the log sink, while its epoch is still current, so
//! a replaced connection can never append records.

use std::sync::{Arc, Weak};
use std::time::Duration;

use browser_logger_protocol::{ENABLE_REQUEST_ID, InboundFrame, Target, enable_runtime_request};
use browser_logger_runtime::{
	Connector, Error, TransportParts, TransportReceiver, TransportSender,
};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::log_sink::{LogRecord, LogSink};

/// Observable connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
	Disconnected,
	Connecting,
	Open,
	Closing,
}

/// Successful result of [`DebugSession::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
	/// The connection is open and runtime events are enabled.
	Open,
	/// A later `connect` or `close` replaced this attempt while it was
	/// opening; the fresh connection was closed again.
	Superseded,
}

/// Live connection handles: the sender for the close handshake and the task
/// pumping inbound frames into the sink.
#[derive(Debug)]
struct Link {
	sender: TransportSender,
	pump: JoinHandle<()>,
}

impl Link {
	fn release(self) {
		self.sender.close();
		self.pump.abort();
	}
}

#[derive(Debug)]
enum State {
	Disconnected,
	Connecting { target: Target },
	Open { target: Target, link: Link },
	Closing { link: Link },
}

impl State {
	fn status(&self) -> SessionStatus {
		match self {
			State::Disconnected => SessionStatus::Disconnected,
			State::Connecting { .. } => SessionStatus::Connecting,
			State::Open { .. } => SessionStatus::Open,
			State::Closing { .. } => SessionStatus::Closing,
		}
	}

	fn release(self) {
		match self {
			State::Open { link, .. } | State::Closing { link } => link.release(),
			State::Disconnected | State::Connecting { .. } => {}
		}
	}
}

#[derive(Debug)]
struct Inner {
	state: State,
	epoch: u64,
}

#[derive(Debug)]
struct Shared {
	inner: Mutex<Inner>,
	status: watch::Sender<SessionStatus>,
	sink: LogSink,
}

impl Shared {
	fn set_state(&self, inner: &mut Inner, state: State) {
		self.status.send_replace(state.status());
		inner.state = state;
	}

	/// Handles one inbound frame. Returns false once `epoch` is no longer
	/// current and the pump should stop.
	fn on_frame(&self, epoch: u64, raw: &str) -> bool {
		trace!(target = "browser_logger.session", frame = raw, "Received message");

		let frame = match InboundFrame::parse(raw) {
			Ok(frame) => frame,
			Err(e) => {
				warn!(target = "browser_logger.session", error = %e, "Error processing message");
				return self.inner.lock().epoch == epoch;
			}
		};

		match frame {
			InboundFrame::Event(event) => {
				let record = LogRecord::from_event(&event);
				let inner = self.inner.lock();
				if inner.epoch != epoch {
					return false;
				}
				if !matches!(inner.state, State::Open { .. }) {
					trace!(target = "browser_logger.session", "dropping frame received while closing");
					return true;
				}
				debug!(
					target = "browser_logger.session",
					kind = %record.kind,
					message = %record.message,
					"Logged console message"
				);
				self.sink.append(record);
				true
			}
			InboundFrame::Response { id, error: Some(err) } if id == ENABLE_REQUEST_ID => {
				warn!(target = "browser_logger.session", error = %err, "Runtime.enable was rejected");
				self.inner.lock().epoch == epoch
			}
			InboundFrame::Response { id, .. } => {
				trace!(target = "browser_logger.session", id, "response");
				self.inner.lock().epoch == epoch
			}
			InboundFrame::Ignored { method } => {
				trace!(target = "browser_logger.session", ?method, "ignored frame");
				self.inner.lock().epoch == epoch
			}
		}
	}

	/// Called by the pump once the remote side of its connection is gone.
	fn on_stream_end(&self, epoch: u64) {
		let mut inner = self.inner.lock();
		if inner.epoch != epoch {
			return;
		}
		match &inner.state {
			State::Open { target, .. } => {
				info!(target = "browser_logger.session", target_id = %target.id, "Disconnected from target");
			}
			State::Closing { .. } => {
				debug!(target = "browser_logger.session", "close handshake confirmed");
			}
			State::Disconnected | State::Connecting { .. } => return,
		}
		self.set_state(&mut inner, State::Disconnected);
	}
}

async fn pump_frames(shared: Weak<Shared>, epoch: u64, mut receiver: TransportReceiver) {
	while let Some(raw) = receiver.recv().await {
		let Some(shared) = shared.upgrade() else {
			return;
		};
		if !shared.on_frame(epoch, &raw) {
			return;
		}
	}
	if let Some(shared) = shared.upgrade() {
		shared.on_stream_end(epoch);
	}
}

/// At most one live connection to a target's event stream.
///
/// Clones share the same session. Locks are never held across an await, so
/// every transition is atomic with respect to other callers and to the frame
/// pump.
#[derive(Clone)]
pub struct DebugSession {
	shared: Arc<Shared>,
	connector: Arc<dyn Connector>,
}

impl std::fmt::Debug for DebugSession {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DebugSession")
			.field("status", &self.status())
			.finish_non_exhaustive()
	}
}

impl DebugSession {
	/// Creates a disconnected session whose events go to `sink`.
	pub fn new(connector: Arc<dyn Connector>, sink: LogSink) -> Self {
		let (status, _) = watch::channel(SessionStatus::Disconnected);
		Self {
			shared: Arc::new(Shared {
				inner: Mutex::new(Inner {
					state: State::Disconnected,
					epoch: 0,
				}),
				status,
				sink,
			}),
			connector,
		}
	}

	/// Attaches to `target`, replacing any existing connection.
	///
	/// The previous connection is released before the new one is opened, so
	/// at most one connection is ever wired to the sink. On failure the
	/// session is back in [`SessionStatus::Disconnected`] and the error is
	/// logged as well as returned.
	pub async fn connect(&self, target: Target) -> Result<ConnectOutcome, Error> {
		let epoch = {
			let mut inner = self.shared.inner.lock();
			inner.epoch += 1;
			let previous = std::mem::replace(
				&mut inner.state,
				State::Connecting {
					target: target.clone(),
				},
			);
			self.shared.status.send_replace(SessionStatus::Connecting);
			previous.release();
			inner.epoch
		};

		info!(
			target = "browser_logger.session",
			target_id = %target.id,
			"Connecting to target: {} ({})",
			target.title,
			target.url
		);

		let opened = match target.event_stream_address() {
			Some(address) => self.connector.open(address).await,
			None => Err(Error::MissingDebuggerUrl {
				target_id: target.id.clone(),
			}),
		};

		let mut inner = self.shared.inner.lock();
		if inner.epoch != epoch {
			match opened {
				Ok(parts) => parts.sender.close(),
				Err(e) => debug!(target = "browser_logger.session", error = %e, "superseded attempt failed"),
			}
			debug!(target = "browser_logger.session", target_id = %target.id, "connect superseded");
			return Ok(ConnectOutcome::Superseded);
		}

		let TransportParts { sender, receiver } = match opened {
			Ok(parts) => parts,
			Err(e) => {
				error!(target = "browser_logger.session", target_id = %target.id, error = %e, "Error connecting to target");
				self.shared.set_state(&mut inner, State::Disconnected);
				return Err(e);
			}
		};

		if let Err(e) = sender.send(&enable_runtime_request()) {
			error!(target = "browser_logger.session", target_id = %target.id, error = %e, "Failed to enable runtime events");
			self.shared.set_state(&mut inner, State::Disconnected);
			return Err(e);
		}

		let pump = tokio::spawn(pump_frames(Arc::downgrade(&self.shared), epoch, receiver));
		info!(target = "browser_logger.session", target_id = %target.id, "Connected to target");
		self.shared.set_state(
			&mut inner,
			State::Open {
				target,
				link: Link { sender, pump },
			},
		);
		Ok(ConnectOutcome::Open)
	}

	/// Starts tearing down the current connection. Idempotent.
	///
	/// An open connection moves to [`SessionStatus::Closing`] until the
	/// remote confirms; a pending connect is abandoned.
	pub fn close(&self) {
		let mut inner = self.shared.inner.lock();
		match std::mem::replace(&mut inner.state, State::Disconnected) {
			State::Disconnected => {}
			State::Connecting { target } => {
				inner.epoch += 1;
				info!(target = "browser_logger.session", target_id = %target.id, "connect abandoned");
				self.shared.set_state(&mut inner, State::Disconnected);
			}
			State::Open { target, link } => {
				info!(target = "browser_logger.session", target_id = %target.id, "Closing connection");
				link.sender.close();
				self.shared.set_state(&mut inner, State::Closing { link });
			}
			closing @ State::Closing { .. } => {
				inner.state = closing;
			}
		}
	}

	/// Closes the session and waits up to `grace` for the remote to confirm.
	/// Anything still pending afterwards is dropped.
	pub async fn shutdown(&self, grace: Duration) {
		self.close();

		let mut status = self.shared.status.subscribe();
		let confirmed = tokio::time::timeout(
			grace,
			status.wait_for(|s| *s == SessionStatus::Disconnected),
		)
		.await
		.is_ok_and(|r| r.is_ok());

		if !confirmed {
			debug!(target = "browser_logger.session", "close not confirmed before shutdown");
			let mut inner = self.shared.inner.lock();
			let state = std::mem::replace(&mut inner.state, State::Disconnected);
			self.shared.status.send_replace(SessionStatus::Disconnected);
			state.release();
		}
	}

	/// The target being connected to or attached to, if any.
	pub fn current(&self) -> Option<Target> {
		match &self.shared.inner.lock().state {
			State::Connecting { target } | State::Open { target, .. } => Some(target.clone()),
			State::Disconnected | State::Closing { .. } => None,
		}
	}

	pub fn status(&self) -> SessionStatus {
		self.shared.inner.lock().state.status()
	}

	/// Receiver that observes every status transition.
	pub fn watch_status(&self) -> watch::Receiver<SessionStatus> {
		self.shared.status.subscribe()
	}

	pub fn sink(&self) -> &LogSink {
		&self.shared.sink
	}
}

#[cfg(test)]
mod tests;
