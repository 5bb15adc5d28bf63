//! Discovery endpoint target descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of debuggable surface as reported by the discovery endpoint.
///
/// Unknown kinds are preserved verbatim in [`TargetKind::Other`] so rendering
/// always shows what the browser reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetKind {
	/// A top-level tab
	Page,
	/// An out-of-process iframe
	Iframe,
	/// A dedicated web worker
	Worker,
	/// A service worker
	ServiceWorker,
	/// A shared worker
	SharedWorker,
	/// The browser itself
	Browser,
	/// Anything else (`webview`, `other`, ...)
	Other(String),
}

impl TargetKind {
	pub fn as_str(&self) -> &str {
		match self {
			TargetKind::Page => "page",
			TargetKind::Iframe => "iframe",
			TargetKind::Worker => "worker",
			TargetKind::ServiceWorker => "service_worker",
			TargetKind::SharedWorker => "shared_worker",
			TargetKind::Browser => "browser",
			TargetKind::Other(raw) => raw,
		}
	}
}

impl From<String> for TargetKind {
	fn from(raw: String) -> Self {
		match raw.as_str() {
			"page" => TargetKind::Page,
			"iframe" => TargetKind::Iframe,
			"worker" => TargetKind::Worker,
			"service_worker" => TargetKind::ServiceWorker,
			"shared_worker" => TargetKind::SharedWorker,
			"browser" => TargetKind::Browser,
			_ => TargetKind::Other(raw),
		}
	}
}

impl From<TargetKind> for String {
	fn from(kind: TargetKind) -> Self {
		match kind {
			TargetKind::Other(raw) => raw,
			known => known.as_str().to_string(),
		}
	}
}

impl fmt::Display for TargetKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One entry of the discovery endpoint's `/json` listing.
///
/// `webSocketDebuggerUrl` is absent when another client (usually an open
/// DevTools window) is already attached to the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
	pub id: String,
	#[serde(default)]
	pub title: String,
	#[serde(rename = "type")]
	pub kind: TargetKind,
	#[serde(default)]
	pub url: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub web_socket_debugger_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub devtools_frontend_url: Option<String>,
}

impl Target {
	/// Address of the target's event stream, if it can be attached to.
	pub fn event_stream_address(&self) -> Option<&str> {
		self.web_socket_debugger_url.as_deref()
	}

	/// Renders the `ID/Title/Type/URL` block used by the tool surface.
	pub fn render_block(&self) -> String {
		format!(
			"ID: {}\nTitle: {}\nType: {}\nURL: {}\n",
			self.id, self.title, self.kind, self.url
		)
	}
}
