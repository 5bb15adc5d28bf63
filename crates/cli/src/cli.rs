use std::time::Duration;

use browser_logger::{BridgeConfig, discovery_url};
use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;

/// Yellow section headers, cyan flags and placeholders.
fn help_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Yellow.on_default().bold())
		.usage(AnsiColor::Yellow.on_default().bold())
		.literal(AnsiColor::Cyan.on_default().bold())
		.placeholder(AnsiColor::Cyan.on_default())
		.error(AnsiColor::Red.on_default().bold())
}

#[derive(Parser, Debug)]
#[command(name = "browser-logger")]
#[command(about = "Capture browser console output over the remote debugging protocol and serve it to MCP clients")]
#[command(version)]
#[command(styles = help_styles())]
pub struct Cli {
	/// Host of the browser's remote debugging endpoint
	#[arg(long, env = "BROWSER_LOGGER_HOST", default_value = "localhost")]
	pub host: String,

	/// Remote debugging port (the browser's --remote-debugging-port)
	#[arg(long, env = "BROWSER_LOGGER_PORT", default_value_t = 9222)]
	pub port: u16,

	/// Skip fetching the target list at startup
	#[arg(long)]
	pub no_initial_refresh: bool,

	/// How long to wait for the debug connection to close on exit
	#[arg(long, value_name = "MS", default_value_t = 500)]
	pub shutdown_grace_ms: u64,

	/// Increase log verbosity (-v debug, -vv trace); logs go to stderr
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,
}

impl Cli {
	pub fn bridge_config(&self) -> BridgeConfig {
		BridgeConfig {
			discovery_url: discovery_url(&self.host, self.port),
			initial_refresh: !self.no_initial_refresh,
			shutdown_grace: Duration::from_millis(self.shutdown_grace_ms),
		}
	}
}
