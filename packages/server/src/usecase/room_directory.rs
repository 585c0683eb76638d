//! UseCase: ルーム ID から RoomActor への振り分け
//!
//! ルーム ID ごとに RoomActor を高々 1 つだけ保持します。
//! 初回アクセス時に遅延生成し、`delete` で削除します。
//! ディレクトリのロックはマップの参照・挿入・削除にだけ使い、
//! ルーム単位のコマンド直列化（RoomActor のロック）を待つ間は保持しません。
//! 削除中のルームには消去完了を待つための目印（Erasing）を置き、
//! 消去が終わるまで同じ ID の新しい actor は作られません。

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};
use watchparty_shared::time::{Clock, SystemClock};

use crate::{
    domain::{DEFAULT_CHAT_CAPACITY, RoomId, RoomRepository},
    infrastructure::message_pusher::WebSocketMessagePusher,
};

use super::{error::RoomError, room_actor::RoomActor};

/// Settings applied to every RoomActor the directory creates
#[derive(Debug, Clone)]
pub struct RoomDirectoryConfig {
    /// Number of chat messages kept per room
    pub chat_capacity: usize,
}

impl Default for RoomDirectoryConfig {
    fn default() -> Self {
        Self {
            chat_capacity: DEFAULT_CHAT_CAPACITY,
        }
    }
}

/// Entry of the room map
enum RoomSlot {
    Live(Arc<RoomActor>),
    /// Erase in progress; the mutex is held until the erase finishes
    Erasing(Arc<Mutex<()>>),
}

/// Routes room ids to their RoomActor
pub struct RoomDirectory {
    rooms: Mutex<HashMap<RoomId, RoomSlot>>,
    /// Repository（全ルーム共通、ルーム ID で分離）
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
    config: RoomDirectoryConfig,
}

impl RoomDirectory {
    /// 新しい RoomDirectory を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        clock: Arc<dyn Clock>,
        mut config: RoomDirectoryConfig,
    ) -> Self {
        let capacity = config.chat_capacity.clamp(1, DEFAULT_CHAT_CAPACITY);
        if capacity != config.chat_capacity {
            tracing::warn!(
                "Chat capacity {} is out of range, using {}",
                config.chat_capacity,
                capacity
            );
            config.chat_capacity = capacity;
        }
        Self {
            rooms: Mutex::new(HashMap::new()),
            repository,
            clock,
            config,
        }
    }

    /// SystemClock とデフォルト設定で作成
    pub fn with_repository(repository: Arc<dyn RoomRepository>) -> Self {
        Self::new(
            repository,
            Arc::new(SystemClock),
            RoomDirectoryConfig::default(),
        )
    }

    /// ルームの RoomActor を取得（存在しなければ作成）
    ///
    /// 削除中のルームは消去が終わるまで待ってから新しい actor を作る。
    pub async fn get_or_create(&self, room_id: &RoomId) -> Arc<RoomActor> {
        loop {
            let erasing = {
                let mut rooms = self.rooms.lock().await;
                match rooms.get(room_id) {
                    Some(RoomSlot::Live(actor)) => return actor.clone(),
                    Some(RoomSlot::Erasing(erasing)) => erasing.clone(),
                    None => {
                        tracing::info!("Room '{}' created", room_id);
                        let actor = Arc::new(self.create_actor(room_id.clone()));
                        rooms.insert(room_id.clone(), RoomSlot::Live(actor.clone()));
                        return actor;
                    }
                }
            };
            drop(erasing.lock().await);
        }
    }

    /// ルームの RoomActor を取得（作成はしない）
    pub async fn get(&self, room_id: &RoomId) -> Option<Arc<RoomActor>> {
        match self.rooms.lock().await.get(room_id) {
            Some(RoomSlot::Live(actor)) => Some(actor.clone()),
            _ => None,
        }
    }

    /// ルームを削除: 保存データの消去・全接続のクローズ・actor の破棄
    ///
    /// マップには消去中の目印だけを置いてロックを手放すので、
    /// 他のルームの参照は削除対象ルームの処理待ちに巻き込まれない。
    pub async fn delete(&self, room_id: &RoomId) -> Result<(), RoomError> {
        let (previous, erasing, guard) = self.begin_erase(room_id).await;

        let result = match &previous {
            Some(actor) => actor.delete().await,
            // actor がいなくても以前のプロセスが残したデータは消す
            None => self
                .repository
                .delete_room(room_id)
                .await
                .map_err(RoomError::from),
        };

        {
            let mut rooms = self.rooms.lock().await;
            let still_ours = matches!(
                rooms.get(room_id),
                Some(RoomSlot::Erasing(current)) if Arc::ptr_eq(current, &erasing)
            );
            if still_ours {
                match (&result, previous) {
                    // 消去に失敗した actor は使い続けられるよう元に戻す
                    (Err(_), Some(actor)) => {
                        rooms.insert(room_id.clone(), RoomSlot::Live(actor));
                    }
                    _ => {
                        rooms.remove(room_id);
                    }
                }
            }
        }
        drop(guard);

        match &result {
            Ok(()) => tracing::info!("Room '{}' removed from directory", room_id),
            Err(e) => tracing::error!("Failed to delete room '{}': {}", room_id, e),
        }
        result
    }

    /// Swap the slot for an erasing marker, waiting out any erase already running
    async fn begin_erase(
        &self,
        room_id: &RoomId,
    ) -> (Option<Arc<RoomActor>>, Arc<Mutex<()>>, OwnedMutexGuard<()>) {
        loop {
            let pending = {
                let mut rooms = self.rooms.lock().await;
                match rooms.get(room_id) {
                    Some(RoomSlot::Erasing(pending)) => pending.clone(),
                    _ => {
                        let erasing = Arc::new(Mutex::new(()));
                        // Fresh mutex, so this never waits
                        let guard = erasing.clone().lock_owned().await;
                        let previous =
                            match rooms.insert(room_id.clone(), RoomSlot::Erasing(erasing.clone())) {
                                Some(RoomSlot::Live(actor)) => Some(actor),
                                _ => None,
                            };
                        return (previous, erasing, guard);
                    }
                }
            };
            drop(pending.lock().await);
        }
    }

    /// 保持している RoomActor の数
    pub async fn room_count(&self) -> usize {
        self.rooms
            .lock()
            .await
            .values()
            .filter(|slot| matches!(slot, RoomSlot::Live(_)))
            .count()
    }

    pub async fn contains(&self, room_id: &RoomId) -> bool {
        matches!(
            self.rooms.lock().await.get(room_id),
            Some(RoomSlot::Live(_))
        )
    }

    fn create_actor(&self, room_id: RoomId) -> RoomActor {
        RoomActor::new(
            room_id,
            self.repository.clone(),
            Arc::new(WebSocketMessagePusher::new()),
            self.clock.clone(),
            self.config.chat_capacity,
        )
    }
}
