//! WebSocket handler for real-time updates.
//!
//! Each socket becomes a [`Connection`] in the shared registry. A writer task
//! drains the connection's queue into the socket; a reader task consumes
//! inbound frames, which carry no meaning beyond keeping the session alive.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use qa_realtime::{ChannelSink, Connection};
use tracing::{debug, info, warn};

use crate::state::AppState;

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (sink, mut outbound) = ChannelSink::channel();
    let conn = Connection::new(sink);
    let conn_id = conn.id();

    let registry = state.registry().clone();
    registry.register(conn, None);
    info!(connection_id = %conn_id, total = registry.len(), "Client connected");

    // Forward queued events to this client
    let mut send_task = tokio::spawn(async move {
        while let Some(text) = outbound.recv().await {
            if let Err(e) = sender.send(Message::Text(text.as_ref().into())).await {
                debug!(connection_id = %conn_id, error = %e, "WebSocket send failed");
                break;
            }
        }
    });

    // Handle incoming messages from client
    let mut recv_task = tokio::spawn(async move {
        while let Some(frame) = receiver.next().await {
            match frame {
                Ok(Message::Text(text)) => log_inbound(conn_id, text.as_str()),
                Ok(Message::Close(_)) => {
                    debug!(connection_id = %conn_id, "Client sent close frame");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(connection_id = %conn_id, error = %e, "WebSocket receive failed");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    }

    // A failed broadcast may already have pruned this connection.
    if registry.deregister(conn_id, None) {
        info!(connection_id = %conn_id, total = registry.len(), "Client disconnected");
    } else {
        debug!(connection_id = %conn_id, "Connection was already pruned");
    }
}

fn log_inbound(conn_id: qa_realtime::ConnectionId, text: &str) {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(_) => debug!(connection_id = %conn_id, message = %text, "Received WebSocket message"),
        Err(e) => {
            warn!(connection_id = %conn_id, error = %e, "Ignoring malformed WebSocket message")
        }
    }
}
