use std::convert::Infallible;
use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::Context;
use browser_logger::Bridge;
use browser_logger_cli::{cli::Cli, logging, server::BrowserLoggerServer, shutdown::TerminationSignal};
use clap::Parser;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let mut termination = TerminationSignal::install().context("Failed to install signal handlers")?;

	if std::io::stdin().is_terminal() {
		eprintln!(
			"browser-logger is an MCP stdio server and is meant to be launched by an MCP client.\n\
			 Start the browser with --remote-debugging-port={} first.",
			cli.port
		);
	}

	let config = cli.bridge_config();
	let bridge = Arc::new(Bridge::new(config).context("Failed to build discovery client")?);
	info!(
		target = "browser_logger.cli",
		url = %bridge.directory().discovery_url(),
		version = env!("CARGO_PKG_VERSION"),
		"Starting browser-logger"
	);

	if bridge.config().initial_refresh {
		tokio::select! {
			_ = bridge.directory().refresh() => {}
			() = termination.recv() => match exit_after_shutdown(&bridge).await {},
		}
	}

	let service = tokio::select! {
		served = BrowserLoggerServer::new(Arc::clone(&bridge)).serve(stdio()) => {
			served.context("Failed to start MCP server on stdio")?
		}
		() = termination.recv() => match exit_after_shutdown(&bridge).await {},
	};
	let cancel = service.cancellation_token();
	let waiting = service.waiting();
	tokio::pin!(waiting);

	tokio::select! {
		ended = &mut waiting => {
			if let Err(e) = ended {
				error!(target = "browser_logger.cli", error = %e, "MCP service task failed");
			} else {
				info!(target = "browser_logger.cli", "MCP client disconnected");
			}
			bridge.shutdown().await;
		}
		() = termination.recv() => {
			bridge.shutdown().await;
			cancel.cancel();
			if let Err(e) = waiting.await {
				error!(target = "browser_logger.cli", error = %e, "MCP service task failed");
			}
			// The stdio reader blocks on stdin and would keep the runtime alive.
			std::process::exit(0);
		}
	}

	Ok(())
}

/// Closes the debug session and exits without waiting for stdin.
async fn exit_after_shutdown(bridge: &Bridge) -> Infallible {
	bridge.shutdown().await;
	std::process::exit(0)
}
