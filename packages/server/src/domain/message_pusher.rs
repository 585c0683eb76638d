//! MessagePusher trait 定義
//!
//! ルーム内の push 接続（WebSocket）を管理し、イベントを配信するための
//! インターフェースです。具体的な実装は Infrastructure 層が提供します。

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::{MessagePushError, RoomEvent};

/// Item carried from the engine to one connection's writer task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushFrame {
    /// Encoded event to forward as a text frame
    Text(String),
    /// Close the socket gracefully and stop the writer
    Close,
}

/// Sending half handed to the pusher for one connection
pub type PusherChannel = mpsc::UnboundedSender<PushFrame>;

/// Identifier of a registered push connection.
///
/// Connections carry no user identity; this only tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connection registry of a single room.
///
/// `broadcast` is best-effort: a connection that fails to accept a message is
/// dropped from the registry and the rest still receive it.
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録
    async fn register(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続を登録解除（登録されていた場合 true）
    async fn unregister(&self, connection_id: &ConnectionId) -> bool;

    /// 特定の接続にイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &RoomEvent,
    ) -> Result<(), MessagePushError>;

    /// 全接続にイベントを送信し、配信できた接続数を返す
    async fn broadcast(&self, event: &RoomEvent) -> usize;

    /// 全接続を正常にクローズして登録を空にし、クローズした接続数を返す
    async fn close_all(&self) -> usize;

    /// 登録中の接続数
    async fn connection_count(&self) -> usize;
}
