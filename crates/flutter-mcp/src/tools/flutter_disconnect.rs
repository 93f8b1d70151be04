//! Disconnect tool for closing the debug-service session

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{Tool, ToolResult};
use crate::session::SessionState;

/// Disconnect tool - closes the VM service session
pub struct FlutterDisconnectTool;

impl FlutterDisconnectTool {
    /// Create a new disconnect tool
    pub const fn new() -> Self {
        Self
    }
}

impl Default for FlutterDisconnectTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FlutterDisconnectTool {
    fn name(&self) -> &'static str {
        "flutter_disconnect"
    }

    fn description(&self) -> &'static str {
        "Disconnect from the Flutter application. Any request still in \
         flight fails with a disconnect error."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: &Value, session: &SessionState) -> ToolResult {
        session.disconnect().await?;
        Ok(json!({ "success": true }).to_string())
    }
}
