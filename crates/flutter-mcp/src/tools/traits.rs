//! Tool trait definition

use ::async_trait::async_trait;
use serde_json::Value;

use super::ToolError;
use crate::session::SessionState;

/// Result type for tool execution
pub type ToolResult = Result<String, ToolError>;

/// Tool trait for MCP tool implementations
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name
    fn name(&self) -> &'static str;

    /// Get the tool description
    fn description(&self) -> &'static str;

    /// Get the JSON schema for tool input
    fn input_schema(&self) -> Value;

    /// Execute the tool with given arguments
    async fn execute(&self, args: &Value, session: &SessionState) -> ToolResult;
}
