//! Data Transfer Objects (DTOs) for the watch party application.
//!
//! DTOs are organized by protocol:
//! - `websocket`: push messages sent over WebSocket
//! - `http`: HTTP API request / response bodies

pub mod conversion;
pub mod http;
pub mod websocket;
