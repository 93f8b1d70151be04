//! Server error types

use thiserror::Error;

use crate::rpc;

/// Errors that can occur during MCP request handling
#[derive(Debug, Error)]
pub enum ServerError {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid JSON-RPC request (including calls before `initialize`)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Method not found
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Invalid parameters
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Get the JSON-RPC error code for this error
    pub const fn error_code(&self) -> i32 {
        match self {
            Self::Json(_) => rpc::PARSE_ERROR,
            Self::InvalidRequest(_) => rpc::INVALID_REQUEST,
            Self::MethodNotFound(_) => rpc::METHOD_NOT_FOUND,
            Self::InvalidParams(_) => rpc::INVALID_PARAMS,
            Self::Internal(_) => rpc::INTERNAL_ERROR,
        }
    }
}
