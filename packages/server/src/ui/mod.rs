//! HTTP / WebSocket gateway for the room engine.

pub mod authorizer;
pub mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use authorizer::{AllowAllAuthorizer, OwnerAuthorizer, OwnerHeaderAuthorizer, REQUESTER_HEADER};
pub use server::Server;
