use std::future::Future;
use std::pin::Pin;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, trace, warn};

use super::{Connector, Outbound, TransportParts, TransportSender};
use crate::error::Result;

/// [`Connector`] that opens real WebSocket connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

impl Connector for WebSocketConnector {
	fn open<'a>(
		&'a self,
		address: &'a str,
	) -> Pin<Box<dyn Future<Output = Result<TransportParts>> + Send + 'a>> {
		Box::pin(connect_websocket(address))
	}
}

/// Connects to `url` and spawns the writer and reader tasks.
///
/// The writer drains the outbound queue until it sees [`Outbound::Close`] or
/// every sender is dropped, then closes the sink. The reader forwards text
/// frames until the remote closes, the socket errors, or the receiver is
/// dropped.
pub async fn connect_websocket(url: &str) -> Result<TransportParts> {
	debug!(target = "browser_logger.transport", url, "opening websocket");
	let (stream, _response) = connect_async(url).await?;
	let (mut ws_tx, mut ws_rx) = stream.split();

	let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Outbound>();
	let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<String>();

	tokio::spawn(async move {
		while let Some(outbound) = outbound_rx.recv().await {
			match outbound {
				Outbound::Text(text) => {
					if let Err(e) = ws_tx.send(Message::Text(text)).await {
						warn!(target = "browser_logger.transport", error = %e, "websocket write failed");
						return;
					}
				}
				Outbound::Close => break,
			}
		}
		if let Err(e) = ws_tx.close().await {
			debug!(target = "browser_logger.transport", error = %e, "websocket close failed");
		}
	});

	tokio::spawn(async move {
		while let Some(message) = ws_rx.next().await {
			let text = match message {
				Ok(Message::Text(text)) => text,
				Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
					Ok(text) => text,
					Err(_) => {
						debug!(target = "browser_logger.transport", "dropping non-utf8 binary frame");
						continue;
					}
				},
				Ok(Message::Close(frame)) => {
					debug!(target = "browser_logger.transport", ?frame, "remote closed websocket");
					break;
				}
				Ok(_) => continue,
				Err(e) => {
					warn!(target = "browser_logger.transport", error = %e, "websocket read failed");
					break;
				}
			};

			trace!(target = "browser_logger.transport", len = text.len(), "frame received");
			if inbound_tx.send(text).is_err() {
				break;
			}
		}
	});

	Ok(TransportParts {
		sender: TransportSender::new(outbound_tx),
		receiver: inbound_rx,
	})
}
