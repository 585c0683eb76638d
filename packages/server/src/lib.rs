//! Watch party room synchronization engine.
//!
//! One owner drives play / pause / seek for a room while any number of
//! viewers follow, either through WebSocket push or by polling the state
//! endpoint. Each room is served by a single `RoomActor` that serializes its
//! commands; the `RoomDirectory` guarantees at most one actor per room id.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
