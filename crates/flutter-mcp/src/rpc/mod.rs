//! JSON-RPC 2.0 codec
//!
//! Message parsing, classification, and serialization shared by the MCP
//! dispatcher and the VM service client. A message is classified as a
//! request, a notification, or a response; anything else is rejected.

mod error;
mod message;

#[cfg(test)]
mod tests;

pub use error::RpcError;
pub use message::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR, Message,
    Notification, Request, RequestId, Response, ResponseError,
};

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, RpcError>;
