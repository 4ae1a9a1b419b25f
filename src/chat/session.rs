//! Per-connection WebSocket loop.
//!
//! Forwards room events to the socket and inbound `send_message` frames to
//! the hub until either side goes away, then unregisters the connection.

use crate::chat::hub::{ChatHub, ConnectionId};
use crate::chat::messages::{ClientEvent, ServerEvent};
use axum::extract::ws::{Message, WebSocket};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

enum Flow {
    Continue,
    Stop,
}

pub async fn run(hub: Arc<ChatHub>, name: String, socket: WebSocket) {
    let (mut sink, mut stream) = socket.split();
    let mut connection = hub.join(name).await;
    let id = connection.id;

    loop {
        let flow = tokio::select! {
            event = connection.events.recv() => forward_event(&mut sink, id, event).await,
            frame = stream.next() => handle_frame(&hub, id, frame).await,
        };

        if let Flow::Stop = flow {
            break;
        }
    }

    hub.leave(id).await;
}

async fn forward_event(
    sink: &mut SplitSink<WebSocket, Message>,
    id: ConnectionId,
    event: Result<ServerEvent, RecvError>,
) -> Flow {
    match event {
        Ok(event) => {
            let Ok(payload) = serde_json::to_string(&event) else {
                return Flow::Continue;
            };
            if sink.send(Message::Text(payload.into())).await.is_err() {
                debug!(connection = %id, "Socket closed while sending");
                return Flow::Stop;
            }
            Flow::Continue
        }
        Err(RecvError::Lagged(skipped)) => {
            warn!(connection = %id, skipped, "Chat client lagging; events dropped");
            Flow::Continue
        }
        Err(RecvError::Closed) => Flow::Stop,
    }
}

async fn handle_frame(
    hub: &ChatHub,
    id: ConnectionId,
    frame: Option<Result<Message, axum::Error>>,
) -> Flow {
    match frame {
        Some(Ok(Message::Text(text))) => {
            match ClientEvent::parse(text.as_str()) {
                Ok(ClientEvent::SendMessage { msg }) => {
                    hub.post(id, &msg).await;
                }
                Err(e) => debug!(connection = %id, "Ignoring malformed chat frame: {}", e),
            }
            Flow::Continue
        }
        Some(Ok(Message::Close(_))) | None => Flow::Stop,
        // Pings are answered by axum itself
        Some(Ok(_)) => Flow::Continue,
        Some(Err(e)) => {
            debug!(connection = %id, "WebSocket error: {}", e);
            Flow::Stop
        }
    }
}
