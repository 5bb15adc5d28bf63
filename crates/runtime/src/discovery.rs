//! Discovery endpoint client.
//!
//! Browsers started with `--remote-debugging-port` list their debuggable
//! targets at `http://<host>:<port>/json`.

use browser_logger_protocol::Target;
use tracing::debug;

use crate::error::{Error, Result};

/// Builds the `/json` listing url for a debugging host and port.
pub fn discovery_url(host: &str, port: u16) -> String {
	format!("http://{host}:{port}/json")
}

/// Fetches target listings from one discovery url.
///
/// No request timeout is configured; a stalled endpoint stalls the caller.
#[derive(Debug, Clone)]
pub struct DiscoveryClient {
	http: reqwest::Client,
	url: String,
}

impl DiscoveryClient {
	/// Creates a client for `url`. System proxies are bypassed since the
	/// endpoint is local.
	pub fn new(url: impl Into<String>) -> Result<Self> {
		let http = reqwest::Client::builder().no_proxy().build()?;
		Ok(Self {
			http,
			url: url.into(),
		})
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	/// Fetches and decodes the current target listing, preserving response order.
	pub async fn fetch_targets(&self) -> Result<Vec<Target>> {
		debug!(target = "browser_logger.discovery", url = %self.url, "fetching targets");

		let response = self.http.get(&self.url).send().await?;
		let status = response.status();
		if !status.is_success() {
			return Err(Error::UnexpectedStatus(status.as_u16()));
		}

		let body = response.text().await?;
		let targets: Vec<Target> = serde_json::from_str(&body)?;
		Ok(targets)
	}
}
