//! VM service client error types

use thiserror::Error;

/// Errors that can occur while talking to the VM service
#[derive(Debug, Error, Clone)]
pub enum VmError {
    /// No connection is currently established
    #[error("Not connected to a VM service")]
    NotConnected,

    /// The WebSocket handshake failed
    #[error("Connection failed: {0}")]
    ConnectFailed(String),

    /// The connection dropped while a request was in flight
    #[error("Connection closed")]
    Disconnected,

    /// The request timed out waiting for a response
    #[error("Timeout after {seconds}s waiting for {method}")]
    Timeout {
        /// The service method that timed out
        method: String,
        /// Configured timeout in seconds
        seconds: u64,
    },

    /// The service answered with a JSON-RPC error object
    #[error("VM service error {code}: {message}")]
    Upstream {
        /// Upstream error code, preserved verbatim
        code: i32,
        /// Upstream error message, preserved verbatim
        message: String,
    },

    /// The service sent something we could not interpret
    #[error("Protocol error: {0}")]
    Protocol(String),
}
