//! UseCase: ルーム単位の同期エンジン（RoomActor）
//!
//! 1 つのルームの RoomState・チャット履歴・push 接続を所有し、
//! 変更系コマンド（init / play / pause / seek / postChat / registerConnection / delete）を
//! ルーム単位のロックで直列化します。
//!
//! - ロックは tokio の `Mutex`（FIFO）なので、コマンドは到着順に適用される
//! - イベント配信もロック内で行うため、接続側から見たイベント順序はコマンド順序と一致する
//! - `getState` / `getChat` はロックを取らずに Repository のスナップショットを読む
//! - 権限チェックは行わない（呼び出し元のゲートウェイが owner であることを確認済みとみなす）

use std::sync::Arc;

use tokio::sync::Mutex;
use watchparty_shared::time::Clock;

use crate::domain::{
    ChatLog, ChatMessage, ChatText, ConnectionId, MessagePusher, MovieId, PlaybackPosition,
    PlaybackSnapshot, PusherChannel, RoomEvent, RoomId, RoomRepository, RoomState, Timestamp,
    UserId, Username,
};

use super::error::RoomError;

/// State guarded by the per-room command lock
#[derive(Debug, Default)]
struct CommandGate {
    /// Set once the directory has torn this actor down
    retired: bool,
}

/// Single authoritative owner of one room
pub struct RoomActor {
    room_id: RoomId,
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（このルーム専用の接続レジストリ）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    chat_capacity: usize,
    command_gate: Mutex<CommandGate>,
}

impl RoomActor {
    /// 新しい RoomActor を作成
    pub fn new(
        room_id: RoomId,
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        chat_capacity: usize,
    ) -> Self {
        Self {
            room_id,
            repository,
            message_pusher,
            clock,
            chat_capacity,
            command_gate: Mutex::new(CommandGate::default()),
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    async fn load_state_or_default(&self, now: Timestamp) -> Result<RoomState, RoomError> {
        Ok(self
            .repository
            .load_state(&self.room_id)
            .await?
            .unwrap_or_else(|| RoomState::uninitialized(now)))
    }

    /// Lock the command gate, failing if the actor has been retired
    async fn begin_command(&self) -> Result<tokio::sync::MutexGuard<'_, CommandGate>, RoomError> {
        let gate = self.command_gate.lock().await;
        if gate.retired {
            return Err(RoomError::RoomDeleted);
        }
        Ok(gate)
    }

    /// ルームを初期化（既存の状態は上書き）
    ///
    /// 空・未指定の `movie_id` / `owner_id` は None として扱う。
    pub async fn init(
        &self,
        movie_id: Option<String>,
        owner_id: Option<String>,
    ) -> Result<(), RoomError> {
        let movie_id = MovieId::from_optional(movie_id);
        let owner_id = UserId::from_optional(owner_id);

        let _gate = self.begin_command().await?;
        let state = RoomState::initialized(movie_id, owner_id, self.now());
        self.repository.save_state(&self.room_id, state).await?;

        tracing::debug!("Room '{}' initialized", self.room_id);
        Ok(())
    }

    /// 現在の再生状態を取得（serverTime は呼び出し時点で計算）
    pub async fn get_state(&self) -> Result<PlaybackSnapshot, RoomError> {
        let now = self.now();
        let state = self.load_state_or_default(now).await?;
        Ok(state.snapshot(now))
    }

    /// `position` から再生を開始し、PLAY を配信
    pub async fn play(&self, position: f64, movie_id: Option<String>) -> Result<(), RoomError> {
        let position = PlaybackPosition::new(position)?;
        let movie_id = MovieId::from_optional(movie_id);

        let _gate = self.begin_command().await?;
        let now = self.now();
        let mut state = self.load_state_or_default(now).await?;
        state.play(position, movie_id, now);
        let event = RoomEvent::Play {
            time: position.seconds(),
            movie_id: state.movie_id.clone(),
        };
        self.repository.save_state(&self.room_id, state).await?;

        let delivered = self.message_pusher.broadcast(&event).await;
        tracing::debug!(
            "Room '{}' playing from {:.3}s (pushed to {} connections)",
            self.room_id,
            position.seconds(),
            delivered
        );
        Ok(())
    }

    /// 現在位置で再生を停止し、PAUSE を配信
    pub async fn pause(&self) -> Result<(), RoomError> {
        let _gate = self.begin_command().await?;
        let now = self.now();
        let mut state = self.load_state_or_default(now).await?;
        let frozen = state.pause(now);
        self.repository.save_state(&self.room_id, state).await?;

        let event = RoomEvent::Pause {
            time: frozen.seconds(),
        };
        let delivered = self.message_pusher.broadcast(&event).await;
        tracing::debug!(
            "Room '{}' paused at {:.3}s (pushed to {} connections)",
            self.room_id,
            frozen.seconds(),
            delivered
        );
        Ok(())
    }

    /// 再生位置を移動し、SEEK を配信（再生/停止の状態は変えない）
    pub async fn seek(&self, position: f64) -> Result<(), RoomError> {
        let position = PlaybackPosition::new(position)?;

        let _gate = self.begin_command().await?;
        let now = self.now();
        let mut state = self.load_state_or_default(now).await?;
        state.seek(position, now);
        self.repository.save_state(&self.room_id, state).await?;

        let event = RoomEvent::Seek {
            time: position.seconds(),
        };
        let delivered = self.message_pusher.broadcast(&event).await;
        tracing::debug!(
            "Room '{}' seeked to {:.3}s (pushed to {} connections)",
            self.room_id,
            position.seconds(),
            delivered
        );
        Ok(())
    }

    /// チャットを投稿し、CHAT を配信
    ///
    /// # Errors
    ///
    /// 空白のみのテキストは `ValueObjectError::ChatTextEmpty` で拒否され、
    /// 履歴への追加も配信も行われない。
    pub async fn post_chat(&self, user: Option<&str>, text: &str) -> Result<ChatMessage, RoomError> {
        let text = ChatText::new(text)?;
        let user = Username::new(user);

        let _gate = self.begin_command().await?;
        let message = ChatMessage::new(user, text, self.now());
        let stored = self.repository.load_chat(&self.room_id).await?;
        let mut log = ChatLog::from_messages(stored, self.chat_capacity);
        log.push(message.clone());
        self.repository
            .save_chat(&self.room_id, log.into_vec())
            .await?;

        let delivered = self
            .message_pusher
            .broadcast(&RoomEvent::Chat(message.clone()))
            .await;
        tracing::debug!(
            "Room '{}' chat from '{}' (pushed to {} connections)",
            self.room_id,
            message.user.as_str(),
            delivered
        );
        Ok(message)
    }

    /// チャット履歴を古い順に取得（最大 chat_capacity 件）
    pub async fn get_chat(&self) -> Result<Vec<ChatMessage>, RoomError> {
        let stored = self.repository.load_chat(&self.room_id).await?;
        Ok(ChatLog::from_messages(stored, self.chat_capacity).into_vec())
    }

    /// push 接続を登録し、直後に STATE スナップショットを送信
    ///
    /// コマンドロック内で登録と送信を行うため、STATE より前のイベントが
    /// 新しい接続に届くことはない。
    pub async fn register_connection(&self, sender: PusherChannel) -> Result<ConnectionId, RoomError> {
        let _gate = self.begin_command().await?;
        let snapshot = self.get_state().await?;

        let connection_id = ConnectionId::generate();
        self.message_pusher.register(connection_id, sender).await;
        if let Err(e) = self
            .message_pusher
            .push_to(&connection_id, &RoomEvent::from(snapshot))
            .await
        {
            tracing::warn!(
                "Failed to send initial state to connection '{}': {}",
                connection_id,
                e
            );
            self.message_pusher.unregister(&connection_id).await;
        } else {
            tracing::debug!(
                "Connection '{}' joined room '{}'",
                connection_id,
                self.room_id
            );
        }
        Ok(connection_id)
    }

    /// push 接続を登録解除（既に解除済みでもエラーにしない）
    pub async fn unregister_connection(&self, connection_id: &ConnectionId) -> bool {
        let removed = self.message_pusher.unregister(connection_id).await;
        if removed {
            tracing::debug!(
                "Connection '{}' left room '{}'",
                connection_id,
                self.room_id
            );
        }
        removed
    }

    /// 登録中の push 接続数
    pub async fn connection_count(&self) -> usize {
        self.message_pusher.connection_count().await
    }

    /// ルームを削除: 保存データを消去し、全接続を正常にクローズする
    ///
    /// 削除後の actor は retire され、以降の変更系コマンドは `RoomDeleted` になる。
    /// 同じ ID の次のルームは RoomDirectory が新しい actor として作成する。
    pub(crate) async fn delete(&self) -> Result<(), RoomError> {
        let mut gate = self.begin_command().await?;
        self.erase().await?;
        gate.retired = true;
        Ok(())
    }

    async fn erase(&self) -> Result<(), RoomError> {
        self.repository.delete_room(&self.room_id).await?;
        let closed = self.message_pusher.close_all().await;
        tracing::info!(
            "Room '{}' deleted ({} connections closed)",
            self.room_id,
            closed
        );
        Ok(())
    }
}
