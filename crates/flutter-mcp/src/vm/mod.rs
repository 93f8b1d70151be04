//! Dart VM service client
//!
//! Bidirectional JSON-RPC 2.0 over WebSocket with concurrent request
//! multiplexing, event-stream subscriptions, and isolate discovery. One
//! client owns one connection; any number of callers may issue requests
//! concurrently and responses are correlated back by request id.

mod client;
mod error;

#[cfg(test)]
mod tests;

pub use client::{ConnectionState, DEFAULT_TIMEOUT_SECS, EventCallback, VmEvent, VmServiceClient};
pub use error::VmError;

/// Result type for VM service operations
pub type Result<T> = std::result::Result<T, VmError>;
