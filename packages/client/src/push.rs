//! WebSocket push listener with reconnection support.
//!
//! Pushes are an optimisation on top of polling: when the listener gives up,
//! the reconciler still keeps the viewer consistent.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use watchparty_server::infrastructure::dto::websocket::PushMessage;

use crate::{domain::should_attempt_reconnect, error::ClientError};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Build the WebSocket URL of a room from the server's HTTP base URL
pub fn ws_url(base_url: &str, room_id: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base.to_string()
    };
    format!("{}/api/rooms/{}/ws", base, room_id)
}

/// Subscribes to a room's push channel and forwards decoded messages
pub struct PushListener {
    url: String,
}

impl PushListener {
    pub fn new(base_url: &str, room_id: &str) -> Self {
        Self {
            url: ws_url(base_url, room_id),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Listen until the receiver is dropped or reconnecting is given up
    pub async fn run(&self, tx: mpsc::UnboundedSender<PushMessage>) -> Result<(), ClientError> {
        let mut reconnect_count = 0;

        loop {
            tracing::info!(
                "Connecting push channel {} (attempt {}/{})",
                self.url,
                reconnect_count + 1,
                MAX_RECONNECT_ATTEMPTS
            );

            let error = match self.run_session(&tx).await {
                Ok(SessionEnd::ReceiverClosed) => {
                    tracing::debug!("Push receiver dropped, stopping listener");
                    return Ok(());
                }
                Ok(SessionEnd::ServerClosed) => {
                    // Connected fine before, so start counting afresh
                    reconnect_count = 0;
                    ClientError::Connection("Server closed the push channel".to_string())
                }
                Err(e) => e,
            };

            tracing::warn!("Push channel lost: {}", error);
            reconnect_count += 1;

            if !should_attempt_reconnect(&error, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                tracing::error!(
                    "Giving up on push channel after {} attempts; relying on polling",
                    reconnect_count
                );
                return Err(error);
            }

            tracing::info!(
                "Reconnecting push channel in {} seconds... (attempt {}/{})",
                RECONNECT_INTERVAL_SECS,
                reconnect_count + 1,
                MAX_RECONNECT_ATTEMPTS
            );
            tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
        }
    }

    async fn run_session(
        &self,
        tx: &mpsc::UnboundedSender<PushMessage>,
    ) -> Result<SessionEnd, ClientError> {
        let (ws_stream, _response) = connect_async(&self.url).await.map_err(|e| match e {
            tokio_tungstenite::tungstenite::Error::Http(response) => {
                ClientError::UnexpectedStatus {
                    status: response.status().as_u16(),
                    body: String::new(),
                }
            }
            other => ClientError::Connection(other.to_string()),
        })?;
        tracing::info!("Push channel connected");

        let (_write, mut read) = ws_stream.split();
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => match serde_json::from_str::<PushMessage>(&text) {
                    Ok(push) => {
                        if tx.send(push).is_err() {
                            return Ok(SessionEnd::ReceiverClosed);
                        }
                    }
                    Err(e) => tracing::warn!("Ignoring undecodable push message: {}", e),
                },
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the push channel");
                    return Ok(SessionEnd::ServerClosed);
                }
                Ok(_) => {}
                Err(e) => return Err(ClientError::Connection(e.to_string())),
            }
        }

        Ok(SessionEnd::ServerClosed)
    }
}

enum SessionEnd {
    ServerClosed,
    ReceiverClosed,
}
