use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use browser_logger_protocol::TargetKind;
use browser_logger_runtime::loopback::{self, Peer};
use browser_logger_runtime::{Outbound, Result as RuntimeResult};
use serde_json::{Value, json};
use tokio::sync::{mpsc, oneshot};

use super::*;

enum Plan {
	Gate(oneshot::Receiver<()>),
	Refuse,
}

/// Connector handing out loopback transports; addresses can be gated or refused.
struct ScriptedConnector {
	plans: Mutex<HashMap<String, Plan>>,
	peers: mpsc::UnboundedSender<(String, Peer)>,
}

impl ScriptedConnector {
	fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<(String, Peer)>) {
		let (peers, rx) = mpsc::unbounded_channel();
		let connector = Arc::new(Self {
			plans: Mutex::new(HashMap::new()),
			peers,
		});
		(connector, rx)
	}

	fn gate(&self, address: &str) -> oneshot::Sender<()> {
		let (tx, rx) = oneshot::channel();
		self.plans.lock().insert(address.to_string(), Plan::Gate(rx));
		tx
	}

	fn refuse(&self, address: &str) {
		self.plans.lock().insert(address.to_string(), Plan::Refuse);
	}
}

impl Connector for ScriptedConnector {
	fn open<'a>(
		&'a self,
		address: &'a str,
	) -> Pin<Box<dyn Future<Output = RuntimeResult<TransportParts>> + Send + 'a>> {
		let plan = self.plans.lock().remove(address);
		Box::pin(async move {
			match plan {
				Some(Plan::Refuse) => {
					return Err(Error::ConnectionFailed(format!("connection refused: {address}")));
				}
				Some(Plan::Gate(gate)) => {
					let _ = gate.await;
				}
				None => {}
			}
			let (parts, peer) = loopback::pair();
			let _ = self.peers.send((address.to_string(), peer));
			Ok(parts)
		})
	}
}

fn target(id: &str) -> Target {
	Target {
		id: id.to_string(),
		title: format!("Title {id}"),
		kind: TargetKind::Page,
		url: format!("http://localhost/{id}"),
		web_socket_debugger_url: Some(address(id)),
		description: None,
		devtools_frontend_url: None,
	}
}

fn address(id: &str) -> String {
	format!("ws://localhost/devtools/page/{id}")
}

fn console(kind: &str, text: &str) -> Value {
	json!({
		"method": "Runtime.consoleAPICalled",
		"params": {"type": kind, "args": [{"type": "string", "value": text}]}
	})
}

fn session() -> (DebugSession, mpsc::UnboundedReceiver<(String, Peer)>, Arc<ScriptedConnector>) {
	let (connector, peers) = ScriptedConnector::new();
	let session = DebugSession::new(connector.clone(), LogSink::new());
	(session, peers, connector)
}

async fn wait_status(session: &DebugSession, want: SessionStatus) {
	let mut rx = session.watch_status();
	tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| *s == want))
		.await
		.expect("timed out waiting for status")
		.expect("status channel closed");
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
	tokio::time::timeout(Duration::from_secs(5), async {
		while !condition() {
			tokio::time::sleep(Duration::from_millis(5)).await;
		}
	})
	.await
	.expect("condition not reached");
}

#[tokio::test]
async fn connect_enables_runtime_and_captures_console_calls() {
	let (session, mut peers, _) = session();

	let outcome = session.connect(target("A")).await.unwrap();
	assert_eq!(outcome, ConnectOutcome::Open);
	assert_eq!(session.status(), SessionStatus::Open);
	assert_eq!(session.current().map(|t| t.id), Some("A".to_string()));

	let (addr, mut peer) = peers.recv().await.unwrap();
	assert_eq!(addr, address("A"));

	let Some(Outbound::Text(first)) = peer.next_outbound().await else {
		panic!("expected enable request");
	};
	assert_eq!(
		serde_json::from_str::<Value>(&first).unwrap(),
		json!({"id": 1, "method": "Runtime.enable"})
	);
	assert!(peer.try_next_outbound().is_none());

	peer.push(&console("warn", "careful"));
	wait_until(|| session.sink().len() == 1).await;

	let records = session.sink().read(false);
	assert_eq!(records[0].kind, "warn");
	assert_eq!(records[0].message, "careful");
}

#[tokio::test]
async fn unrecognized_and_malformed_frames_are_dropped() {
	let (session, mut peers, _) = session();
	session.connect(target("A")).await.unwrap();
	let (_, peer) = peers.recv().await.unwrap();

	peer.push(&json!({"method": "Runtime.executionContextCreated", "params": {}}));
	peer.push_text("{definitely not json");
	peer.push(&json!({"method": "Runtime.consoleAPICalled", "params": {"args": "wrong"}}));
	peer.push(&json!({"id": 1, "result": {}}));
	peer.push(&console("log", "after"));

	wait_until(|| !session.sink().is_empty()).await;
	let records = session.sink().read(false);
	assert_eq!(records.len(), 1);
	assert_eq!(records[0].message, "after");
	assert_eq!(session.status(), SessionStatus::Open);
}

#[tokio::test]
async fn exception_frames_become_error_records() {
	let (session, mut peers, _) = session();
	session.connect(target("A")).await.unwrap();
	let (_, peer) = peers.recv().await.unwrap();

	peer.push(&json!({
		"method": "Runtime.exceptionThrown",
		"params": {"timestamp": 1.0, "exceptionDetails": {"text": "TypeError: boom", "url": "http://x/y.js"}}
	}));

	wait_until(|| session.sink().len() == 1).await;
	let record = &session.sink().read(false)[0];
	assert_eq!(record.kind, "error");
	assert_eq!(record.message, "TypeError: boom at http://x/y.js");
}

#[tokio::test]
async fn reconnect_before_open_completes_keeps_only_the_latest() {
	let (session, mut peers, connector) = session();
	let release_a = connector.gate(&address("A"));

	let pending = tokio::spawn({
		let session = session.clone();
		async move { session.connect(target("A")).await }
	});
	wait_status(&session, SessionStatus::Connecting).await;

	assert_eq!(session.connect(target("B")).await.unwrap(), ConnectOutcome::Open);
	release_a.send(()).unwrap();
	assert_eq!(pending.await.unwrap().unwrap(), ConnectOutcome::Superseded);

	let mut by_address = HashMap::new();
	for _ in 0..2 {
		let (addr, peer) = peers.recv().await.unwrap();
		by_address.insert(addr, peer);
	}
	let mut peer_a = by_address.remove(&address("A")).unwrap();
	let peer_b = by_address.remove(&address("B")).unwrap();

	// The superseded connection is closed without ever being enabled.
	assert_eq!(peer_a.next_outbound().await, Some(Outbound::Close));

	peer_a.push(&console("log", "from A"));
	peer_b.push(&console("log", "from B"));
	wait_until(|| !session.sink().is_empty()).await;
	tokio::time::sleep(Duration::from_millis(20)).await;

	let messages: Vec<_> = session.sink().read(false).into_iter().map(|r| r.message).collect();
	assert_eq!(messages, ["from B"]);
	assert_eq!(session.current().map(|t| t.id), Some("B".to_string()));
	assert_eq!(session.status(), SessionStatus::Open);
}

#[tokio::test]
async fn connect_closes_the_previous_open_connection_first() {
	let (session, mut peers, _) = session();
	session.connect(target("A")).await.unwrap();
	let (_, mut peer_a) = peers.recv().await.unwrap();
	assert!(matches!(peer_a.next_outbound().await, Some(Outbound::Text(_))));

	session.connect(target("B")).await.unwrap();
	let (_, peer_b) = peers.recv().await.unwrap();

	assert_eq!(peer_a.next_outbound().await, Some(Outbound::Close));
	peer_a.push(&console("log", "stale"));
	peer_b.push(&console("log", "fresh"));

	wait_until(|| !session.sink().is_empty()).await;
	tokio::time::sleep(Duration::from_millis(20)).await;
	let messages: Vec<_> = session.sink().read(false).into_iter().map(|r| r.message).collect();
	assert_eq!(messages, ["fresh"]);
}

#[tokio::test]
async fn failed_connect_returns_to_disconnected() {
	let (session, _peers, connector) = session();
	connector.refuse(&address("A"));

	let err = session.connect(target("A")).await.unwrap_err();
	assert!(matches!(err, Error::ConnectionFailed(_)));
	assert_eq!(session.status(), SessionStatus::Disconnected);
	assert!(session.current().is_none());
}

#[tokio::test]
async fn target_without_debugger_url_cannot_be_attached() {
	let (session, _peers, _) = session();
	let mut attached = target("A");
	attached.web_socket_debugger_url = None;

	let err = session.connect(attached).await.unwrap_err();
	assert!(matches!(err, Error::MissingDebuggerUrl { target_id } if target_id == "A"));
	assert_eq!(session.status(), SessionStatus::Disconnected);
}

#[tokio::test]
async fn close_is_idempotent_and_waits_for_the_remote() {
	let (session, mut peers, _) = session();
	session.close();
	assert_eq!(session.status(), SessionStatus::Disconnected);

	session.connect(target("A")).await.unwrap();
	let (_, mut peer) = peers.recv().await.unwrap();
	let _enable = peer.next_outbound().await;

	session.close();
	assert_eq!(session.status(), SessionStatus::Closing);
	assert!(session.current().is_none());
	assert_eq!(peer.next_outbound().await, Some(Outbound::Close));

	session.close();
	assert_eq!(session.status(), SessionStatus::Closing);

	peer.hang_up();
	wait_status(&session, SessionStatus::Disconnected).await;
	session.close();
	assert_eq!(session.status(), SessionStatus::Disconnected);
}

#[tokio::test]
async fn frames_after_close_are_not_recorded() {
	let (session, mut peers, _) = session();
	session.connect(target("A")).await.unwrap();
	let (_, mut peer) = peers.recv().await.unwrap();

	session.close();
	peer.push(&console("log", "too late"));
	peer.hang_up();

	wait_status(&session, SessionStatus::Disconnected).await;
	assert!(session.sink().is_empty());
}

#[tokio::test]
async fn remote_close_disconnects_and_keeps_logs() {
	let (session, mut peers, _) = session();
	session.connect(target("A")).await.unwrap();
	let (_, mut peer) = peers.recv().await.unwrap();

	peer.push(&console("info", "before close"));
	peer.hang_up();

	wait_status(&session, SessionStatus::Disconnected).await;
	assert!(session.current().is_none());
	assert_eq!(session.sink().len(), 1);
}

#[tokio::test]
async fn close_while_connecting_abandons_the_attempt() {
	let (session, mut peers, connector) = session();
	let release = connector.gate(&address("A"));

	let pending = tokio::spawn({
		let session = session.clone();
		async move { session.connect(target("A")).await }
	});
	wait_status(&session, SessionStatus::Connecting).await;

	session.close();
	assert_eq!(session.status(), SessionStatus::Disconnected);

	release.send(()).unwrap();
	assert_eq!(pending.await.unwrap().unwrap(), ConnectOutcome::Superseded);

	let (_, mut peer) = peers.recv().await.unwrap();
	assert_eq!(peer.next_outbound().await, Some(Outbound::Close));
	assert_eq!(session.status(), SessionStatus::Disconnected);
}

#[tokio::test]
async fn shutdown_gives_up_after_grace_period() {
	let (session, mut peers, _) = session();
	session.connect(target("A")).await.unwrap();
	let (_, _peer) = peers.recv().await.unwrap();

	// The peer never hangs up, so the close is never confirmed.
	session.shutdown(Duration::from_millis(20)).await;
	assert_eq!(session.status(), SessionStatus::Disconnected);
}

#[tokio::test]
async fn shutdown_returns_once_close_is_confirmed() {
	let (session, mut peers, _) = session();
	session.connect(target("A")).await.unwrap();
	let (_, mut peer) = peers.recv().await.unwrap();

	let closer = tokio::spawn(async move {
		while let Some(frame) = peer.next_outbound().await {
			if frame == Outbound::Close {
				peer.hang_up();
				break;
			}
		}
		peer
	});

	session.shutdown(Duration::from_secs(5)).await;
	assert_eq!(session.status(), SessionStatus::Disconnected);
	let _ = closer.await.unwrap();
}
