//! Termination signals.

use tracing::info;

/// SIGINT, and SIGTERM on unix, registered when [`install`](Self::install)
/// returns. Signals that arrive before [`recv`](Self::recv) is awaited are
/// not lost.
pub struct TerminationSignal {
	#[cfg(unix)]
	sigint: tokio::signal::unix::Signal,
	#[cfg(unix)]
	sigterm: tokio::signal::unix::Signal,
}

impl TerminationSignal {
	#[cfg(unix)]
	pub fn install() -> std::io::Result<Self> {
		use tokio::signal::unix::{SignalKind, signal};

		Ok(Self {
			sigint: signal(SignalKind::interrupt())?,
			sigterm: signal(SignalKind::terminate())?,
		})
	}

	#[cfg(not(unix))]
	pub fn install() -> std::io::Result<Self> {
		Ok(Self {})
	}

	/// Resolves once a termination signal was received.
	#[cfg(unix)]
	pub async fn recv(&mut self) {
		tokio::select! {
			_ = self.sigint.recv() => {
				info!(target = "browser_logger.cli", "received SIGINT, shutting down");
			}
			_ = self.sigterm.recv() => {
				info!(target = "browser_logger.cli", "received SIGTERM, shutting down");
			}
		}
	}

	#[cfg(not(unix))]
	pub async fn recv(&mut self) {
		if tokio::signal::ctrl_c().await.is_err() {
			std::future::pending::<()>().await;
		}
		info!(target = "browser_logger.cli", "received Ctrl+C, shutting down");
	}
}
