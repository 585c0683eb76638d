//! WebSocket connection handlers.
//!
//! A socket is a receive-only fan-out target: the server pushes room events,
//! and anything the client sends is ignored apart from close frames.

use std::sync::Arc;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, PushFrame, RoomId},
    ui::{error::ApiError, state::AppState},
    usecase::RoomActor,
};

/// `GET /api/rooms/{room_id}/ws`
///
/// The connection is registered before the upgrade completes, so the STATE
/// snapshot is already queued when the socket opens.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let room_id = RoomId::try_from(room_id)?;
    let room = state.directory.get_or_create(&room_id).await;

    // Create a channel for this connection to receive room events
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = room.register_connection(tx).await?;
    tracing::info!(
        "Connection '{}' registered to room '{}'",
        connection_id,
        room_id
    );

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, room, connection_id, rx)))
}

/// Spawns a task that forwards room events from the rx channel to the WebSocket sender.
///
/// `PushFrame::Close` sends a Close frame and ends the task.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<PushFrame>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                PushFrame::Text(text) => {
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                PushFrame::Close => {
                    if let Err(e) = sender.send(Message::Close(None)).await {
                        tracing::debug!("Failed to send close frame: {}", e);
                    }
                    break;
                }
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    room: Arc<RoomActor>,
    connection_id: ConnectionId,
    rx: mpsc::UnboundedReceiver<PushFrame>,
) {
    let (sender, mut receiver) = socket.split();

    // Spawn a task to watch the inbound side for close / errors
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::debug!("Connection '{}' requested close", connection_id);
                    break;
                }
                Ok(Message::Text(text)) => {
                    tracing::debug!(
                        "Ignoring inbound text from connection '{}' ({} bytes)",
                        connection_id,
                        text.len()
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("WebSocket error on connection '{}': {}", connection_id, e);
                    break;
                }
            }
        }
    });

    // Spawn a task to push room events to this connection
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    room.unregister_connection(&connection_id).await;
    tracing::info!(
        "Connection '{}' disconnected from room '{}'",
        connection_id,
        room.room_id()
    );
}
