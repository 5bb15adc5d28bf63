//! The binary exits cleanly on a termination signal while stdin stays open.
#![cfg(unix)]

use std::process::Stdio;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};

fn spawn_server() -> Child {
	Command::new(env!("CARGO_BIN_EXE_browser-logger"))
		.args(["--no-initial-refresh", "--shutdown-grace-ms", "50"])
		.env("RUST_LOG", "info")
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.kill_on_drop(true)
		.spawn()
		.expect("failed to spawn browser-logger")
}

async fn send(stdin: &mut ChildStdin, message: Value) {
	let mut line = message.to_string();
	line.push('\n');
	stdin.write_all(line.as_bytes()).await.unwrap();
	stdin.flush().await.unwrap();
}

fn interrupt(child: &Child) {
	let pid = child.id().expect("child already exited");
	let status = std::process::Command::new("kill")
		.args(["-INT", &pid.to_string()])
		.status()
		.unwrap();
	assert!(status.success());
}

async fn assert_exits_cleanly(child: &mut Child) {
	let status = tokio::time::timeout(Duration::from_secs(5), child.wait())
		.await
		.expect("still running 5s after SIGINT")
		.unwrap();
	assert!(status.success(), "exit status {status}");
}

#[tokio::test]
async fn sigint_after_handshake_exits_with_success() {
	let mut child = spawn_server();
	let mut stdin = child.stdin.take().unwrap();
	let mut stdout = BufReader::new(child.stdout.take().unwrap()).lines();

	send(
		&mut stdin,
		json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": "initialize",
			"params": {
				"protocolVersion": "2024-11-05",
				"capabilities": {},
				"clientInfo": {"name": "termination-test", "version": "0.0.0"}
			}
		}),
	)
	.await;

	let line = tokio::time::timeout(Duration::from_secs(10), stdout.next_line())
		.await
		.expect("no initialize response")
		.unwrap()
		.expect("stdout closed");
	let response: Value = serde_json::from_str(&line).unwrap();
	assert_eq!(response["id"], 1);
	assert_eq!(response["result"]["serverInfo"]["name"], "browser-logger");

	send(&mut stdin, json!({"jsonrpc": "2.0", "method": "notifications/initialized"})).await;
	send(
		&mut stdin,
		json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call", "params": {"name": "get_logs", "arguments": {}}}),
	)
	.await;
	let line = tokio::time::timeout(Duration::from_secs(10), stdout.next_line())
		.await
		.expect("no get_logs response")
		.unwrap()
		.expect("stdout closed");
	let response: Value = serde_json::from_str(&line).unwrap();
	assert_eq!(response["result"]["content"][0]["text"], "(No logs yet)");

	interrupt(&child);
	assert_exits_cleanly(&mut child).await;
	drop(stdin);
}

#[tokio::test]
async fn sigint_before_initialize_exits_with_success() {
	let mut child = spawn_server();
	let stdin = child.stdin.take().unwrap();
	let mut stderr = BufReader::new(child.stderr.take().unwrap()).lines();

	tokio::time::timeout(Duration::from_secs(10), async {
		while let Some(line) = stderr.next_line().await.unwrap() {
			if line.contains("Starting browser-logger") {
				return;
			}
		}
		panic!("stderr closed before startup finished");
	})
	.await
	.expect("server never reported startup");

	interrupt(&child);
	assert_exits_cleanly(&mut child).await;
	drop(stdin);
}
