//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 1 つのルームに属する WebSocket 接続の `UnboundedSender` を管理
//! - イベントを JSON に変換して各接続へ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された sender を受け取り、メッセージ送信に使用します。
//! 送信はチャンネルへの書き込みだけなので、遅い接続が他の接続への配信を
//! 待たせることはありません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, PushFrame, PusherChannel, RoomEvent},
    infrastructure::dto::websocket::PushMessage,
};

/// WebSocket を使った MessagePusher 実装（ルーム単位）
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中の WebSocket sender
    connections: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }

    fn encode(event: &RoomEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&PushMessage::from(event))
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        connections.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> bool {
        let mut connections = self.connections.lock().await;
        let removed = connections.remove(connection_id).is_some();
        if removed {
            tracing::debug!(
                "Connection '{}' unregistered from MessagePusher",
                connection_id
            );
        }
        removed
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &RoomEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(event)?;
        let connections = self.connections.lock().await;

        let sender = connections
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ConnectionNotFound(connection_id.to_string()))?;
        sender
            .send(PushFrame::Text(content))
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(&self, event: &RoomEvent) -> usize {
        let content = match Self::encode(event) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("Failed to encode event for broadcast: {}", e);
                return 0;
            }
        };

        let mut connections = self.connections.lock().await;
        let mut dead = Vec::new();

        for (connection_id, sender) in connections.iter() {
            // ブロードキャストでは一部の送信失敗を許容し、失敗した接続は登録解除する
            if let Err(e) = sender.send(PushFrame::Text(content.clone())) {
                tracing::warn!(
                    "Failed to push message to connection '{}': {}",
                    connection_id,
                    e
                );
                dead.push(*connection_id);
            }
        }

        for connection_id in &dead {
            connections.remove(connection_id);
            tracing::debug!("Dropped dead connection '{}'", connection_id);
        }

        connections.len()
    }

    async fn close_all(&self) -> usize {
        let mut connections = self.connections.lock().await;
        let count = connections.len();
        for (connection_id, sender) in connections.drain() {
            if sender.send(PushFrame::Close).is_err() {
                tracing::debug!("Connection '{}' was already gone at close", connection_id);
            }
        }
        count
    }

    async fn connection_count(&self) -> usize {
        self.connections.lock().await.len()
    }
}
