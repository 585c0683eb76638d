//! UseCase 層
//!
//! ルームの同期エンジンを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod error;
pub mod room_actor;
pub mod room_directory;

pub use error::RoomError;
pub use room_actor::RoomActor;
pub use room_directory::{RoomDirectory, RoomDirectoryConfig};
