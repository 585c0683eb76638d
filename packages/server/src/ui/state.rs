//! Shared application state.

use std::sync::Arc;

use crate::usecase::RoomDirectory;

use super::authorizer::OwnerAuthorizer;

/// Shared application state
pub struct AppState {
    /// RoomDirectory（ルーム ID → RoomActor）
    pub directory: Arc<RoomDirectory>,
    /// 再生操作の前に呼び出し元が owner かどうかを判定する
    pub authorizer: Arc<dyn OwnerAuthorizer>,
}
