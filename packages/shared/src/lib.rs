//! Shared utilities for the Watchparty server and client.

pub mod logger;
pub mod time;
