//! Wire types for the browser remote-debugging protocol.
//!
//! Two surfaces are modelled here:
//!
//! - The HTTP discovery endpoint (`/json`), which lists debuggable [`Target`]s.
//! - The per-target event stream, whose inbound JSON frames decode into
//!   [`InboundFrame`] and whose only outbound request is [`enable_runtime_request`].
//!
//! # Main Types
//!
//! - [`Target`] - One debuggable surface (tab, worker) from the discovery endpoint
//! - [`InboundFrame`] - A decoded frame from the event stream
//! - [`RuntimeEvent`] - The runtime events this crate understands
//! - [`RemoteObject`] - A console argument, with its flattening rule

pub mod frame;
pub mod remote_object;
pub mod target;

pub use frame::{
	ConsoleApiCalled, ExceptionDetails, ExceptionThrown, FrameError, InboundFrame, RuntimeEvent,
	CONSOLE_API_CALLED, ENABLE_REQUEST_ID, EXCEPTION_THROWN, RUNTIME_ENABLE, enable_runtime_request,
};
pub use remote_object::{RemoteObject, UNDEFINED_PLACEHOLDER, join_args};
pub use target::{Target, TargetKind};
