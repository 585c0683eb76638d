//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! Room の状態とチャット履歴はプロセスの寿命の間だけ保持されます。
//! 各操作はロック 1 回の中で完結するため、読み取り側が書き込み途中の
//! 状態を観測することはありません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, RepositoryError, RoomId, RoomRepository, RoomState};

/// Stored records of one room
#[derive(Debug, Default)]
struct StoredRoom {
    state: Option<RoomState>,
    chat: Vec<ChatMessage>,
}

/// インメモリ Room Repository 実装
#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<RoomId, StoredRoom>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 何らかのレコードを保持している Room の数
    pub async fn stored_room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn load_state(&self, room_id: &RoomId) -> Result<Option<RoomState>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.get(room_id).and_then(|room| room.state.clone()))
    }

    async fn save_state(&self, room_id: &RoomId, state: RoomState) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        rooms.entry(room_id.clone()).or_default().state = Some(state);
        Ok(())
    }

    async fn load_chat(&self, room_id: &RoomId) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms
            .get(room_id)
            .map(|room| room.chat.clone())
            .unwrap_or_default())
    }

    async fn save_chat(
        &self,
        room_id: &RoomId,
        messages: Vec<ChatMessage>,
    ) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        rooms.entry(room_id.clone()).or_default().chat = messages;
        Ok(())
    }

    async fn delete_room(&self, room_id: &RoomId) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        rooms.remove(room_id);
        Ok(())
    }
}
