//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ChatMessage, RepositoryError, RoomId, RoomState};

/// Room Repository trait
///
/// Durable storage for per-room playback state and chat history.
/// Every room's records are written only by that room's `RoomActor`;
/// the repository itself does not serialize commands.
///
/// ## 依存性の逆転（DIP）
///
/// - UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない
/// - 読み書きの失敗は `RepositoryError` としてそのまま呼び出し元に返す（内部でリトライしない）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 保存済みの RoomState を取得（未初期化なら None）
    async fn load_state(&self, room_id: &RoomId) -> Result<Option<RoomState>, RepositoryError>;

    /// RoomState を保存（上書き）
    async fn save_state(&self, room_id: &RoomId, state: RoomState) -> Result<(), RepositoryError>;

    /// チャット履歴を古い順に取得（未保存なら空）
    async fn load_chat(&self, room_id: &RoomId) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// チャット履歴を保存（上書き）
    async fn save_chat(
        &self,
        room_id: &RoomId,
        messages: Vec<ChatMessage>,
    ) -> Result<(), RepositoryError>;

    /// Room の RoomState とチャット履歴をまとめて削除
    async fn delete_room(&self, room_id: &RoomId) -> Result<(), RepositoryError>;
}
