//! browser-logger: a remote-debugging bridge for browser console output.
//!
//! The bridge discovers debuggable targets through a browser's remote
//! debugging endpoint, attaches to one of them, and buffers every console
//! call and uncaught exception as a [`LogRecord`] until a client reads it.
//!
//! # Main Types
//!
//! - [`Bridge`] - Application context owning everything below, one per process
//! - [`TargetDirectory`] - Cached snapshot of the discovery endpoint's targets
//! - [`DebugSession`] - At most one live connection to a target's event stream
//! - [`LogSink`] - Ordered, in-memory buffer of captured records
//!
//! # Example
//!
//! ```ignore
//! let bridge = Bridge::new(BridgeConfig::default())?;
//! bridge.directory().refresh().await;
//! println!("{}", bridge.list_targets(false).await);
//! bridge.connect_target("8C5A...").await?;
//! println!("{}", bridge.get_logs(true));
//! ```

mod bridge;
mod directory;
mod error;
mod log_sink;
mod session;

pub use bridge::{Bridge, BridgeConfig, NO_LOGS, NO_TARGETS};
pub use directory::TargetDirectory;
pub use error::ToolError;
pub use log_sink::{LogRecord, LogSink};
pub use session::{ConnectOutcome, DebugSession, SessionStatus};

pub use browser_logger_protocol::{Target, TargetKind};
pub use browser_logger_runtime::{Connector, Error as RuntimeError, WebSocketConnector, discovery_url};
