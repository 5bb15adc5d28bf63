//! MCP stdio front end for the browser-logger bridge.
//!
//! The binary parses [`cli::Cli`], sets up [`logging`], builds a
//! [`browser_logger::Bridge`] and serves it through [`server::BrowserLoggerServer`].

pub mod cli;
pub mod error;
pub mod logging;
pub mod server;
pub mod shutdown;
