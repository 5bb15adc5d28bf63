//! Cached snapshot of the discovery endpoint's targets.

use std::sync::Arc;

use browser_logger_protocol::Target;
use browser_logger_runtime::DiscoveryClient;
use parking_lot::RwLock;
use tracing::{debug, error, info};

/// Holds the most recent discovery snapshot.
///
/// A refresh swaps the whole snapshot; readers keep whatever `Arc` they
/// already obtained.
#[derive(Debug)]
pub struct TargetDirectory {
	client: DiscoveryClient,
	targets: RwLock<Arc<[Target]>>,
}

impl TargetDirectory {
	pub fn new(client: DiscoveryClient) -> Self {
		Self {
			client,
			targets: RwLock::new(Arc::from(Vec::new())),
		}
	}

	/// Re-fetches the listing and replaces the snapshot.
	///
	/// Failures are logged and leave the directory empty; they are never
	/// returned. Returns the number of targets now held.
	pub async fn refresh(&self) -> usize {
		info!(target = "browser_logger.discovery", url = %self.client.url(), "Fetching DevTools targets");

		let targets = match self.client.fetch_targets().await {
			Ok(targets) => {
				for t in &targets {
					debug!(
						target = "browser_logger.discovery",
						id = %t.id,
						title = %t.title,
						kind = %t.kind,
						url = %t.url,
						"found target"
					);
				}
				info!(target = "browser_logger.discovery", count = targets.len(), "Found targets");
				targets
			}
			Err(e) => {
				error!(target = "browser_logger.discovery", error = %e, "Error fetching targets");
				Vec::new()
			}
		};

		let count = targets.len();
		*self.targets.write() = Arc::from(targets);
		count
	}

	/// Current snapshot in discovery order.
	pub fn list(&self) -> Arc<[Target]> {
		Arc::clone(&self.targets.read())
	}

	/// Exact-match lookup by target id.
	pub fn get(&self, id: &str) -> Option<Target> {
		self.targets.read().iter().find(|t| t.id == id).cloned()
	}

	pub fn discovery_url(&self) -> &str {
		self.client.url()
	}
}
