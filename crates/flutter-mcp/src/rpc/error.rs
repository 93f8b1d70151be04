//! Codec error types

use thiserror::Error;

/// Errors that can occur while decoding JSON-RPC messages
#[derive(Debug, Error)]
pub enum RpcError {
    /// The payload is not valid JSON
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The payload is JSON but not a valid JSON-RPC 2.0 message
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}
