//! HTTP / WebSocket handlers.

mod http;
mod websocket;

pub use http::{
    delete_room, get_chat, get_room_state, health_check, init_room, pause, play, post_chat, seek,
};
pub use websocket::websocket_handler;
