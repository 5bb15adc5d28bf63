//! browser-logger runtime - discovery client and event-stream transports
//!
//! This crate provides the I/O plumbing underneath the debugging bridge:
//!
//! - **Discovery**: fetching the `/json` target listing over HTTP
//! - **Transport**: a message-oriented connection to one target's event stream,
//!   over WebSocket or an in-process loopback
//! - **Connector**: the seam the debug session opens transports through
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  browser-logger  │  Directory, session, log sink
//! └────────┬─────────┘
//!          │ Connector / DiscoveryClient
//! ┌────────▼─────────┐
//! │  runtime (this)  │
//! │  ┌────────────┐  │
//! │  │ Discovery  │  │  HTTP GET /json
//! │  └────────────┘  │
//! │  ┌────────────┐  │
//! │  │ Transport  │  │  writer task + reader task per connection
//! │  └────────────┘  │
//! └──────────────────┘
//! ```

pub mod discovery;
pub mod error;
pub mod transport;

pub use discovery::{DiscoveryClient, discovery_url};
pub use error::{Error, Result};
pub use transport::{
	Connector, Outbound, TransportParts, TransportReceiver, TransportSender, WebSocketConnector,
	loopback,
};
