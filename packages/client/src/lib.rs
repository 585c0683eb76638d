//! Watchparty viewer client.
//!
//! Follows a room by polling its state and chat over HTTP, optionally
//! listening to the WebSocket push channel as well. Polling keeps the viewer
//! consistent even when pushes are lost.

pub mod api;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod push;
pub mod reconciler;
pub mod runner;
mod ui;

pub use error::ClientError;
pub use reconciler::{ClientReconciler, ReconcilerConfig, ReconcilerEvent, ReconcilerHandle};
pub use runner::{ClientOptions, run_client};
