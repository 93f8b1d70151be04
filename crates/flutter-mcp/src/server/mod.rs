//! MCP Server implementation
//!
//! This module provides the core MCP protocol handling including:
//! - the initialize handshake and its state guard
//! - tool listing and invocation with argument validation
//! - server-initiated log and progress notifications

mod error;
pub mod protocol;
mod types;

#[cfg(test)]
mod tests;

pub use error::ServerError;
pub use protocol::{ContentItem, McpServer, ToolCallResult};
pub use types::{ClientInfo, ServerConfig};

/// Result type for server operations
pub type Result<T> = std::result::Result<T, ServerError>;
