//! Connect tool for establishing the debug-service session

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Tool, ToolError, ToolResult};
use crate::session::SessionState;

/// Connect tool - opens the VM service session
pub struct FlutterConnectTool;

/// Input parameters for `flutter_connect`
#[derive(Debug, Deserialize)]
pub struct FlutterConnectInput {
    /// WebSocket URI of the debug service
    pub uri: String,

    /// Auth token, appended to the URI path when the service requires one
    pub auth_token: Option<String>,
}

impl FlutterConnectTool {
    /// Create a new connect tool
    pub const fn new() -> Self {
        Self
    }
}

impl Default for FlutterConnectTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FlutterConnectTool {
    fn name(&self) -> &'static str {
        "flutter_connect"
    }

    fn description(&self) -> &'static str {
        "Connect to a running Flutter application's debug service. \
         Use flutter_list_instances to find candidate URIs."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["uri"],
            "properties": {
                "uri": {
                    "type": "string",
                    "description": "WebSocket URI of the debug service (e.g., 'ws://127.0.0.1:8181/ws')"
                },
                "auth_token": {
                    "type": "string",
                    "description": "Auth token appended to the URI path, when required"
                }
            }
        })
    }

    async fn execute(&self, args: &Value, session: &SessionState) -> ToolResult {
        let input: FlutterConnectInput = serde_json::from_value(args.clone())
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        session
            .connect(&input.uri, input.auth_token.as_deref())
            .await?;

        Ok(json!({ "success": true, "uri": input.uri }).to_string())
    }
}
