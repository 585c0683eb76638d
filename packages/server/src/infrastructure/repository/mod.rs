//! Repository 実装
//!
//! - `inmemory`: HashMap をインメモリ DB として使用する実装

pub mod inmemory;

pub use inmemory::InMemoryRoomRepository;
