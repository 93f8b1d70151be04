//! Text entry tool

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Tool, ToolError, ToolResult};
use crate::interaction::InteractionDriver;
use crate::session::SessionState;

/// Type tool - enters text into the focused input field
pub struct FlutterTypeTool;

/// Input parameters for `flutter_type`
#[derive(Debug, Deserialize)]
pub struct FlutterTypeInput {
    /// Text to enter
    pub text: String,
}

impl FlutterTypeTool {
    /// Create a new type tool
    pub const fn new() -> Self {
        Self
    }
}

impl Default for FlutterTypeTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FlutterTypeTool {
    fn name(&self) -> &'static str {
        "flutter_type"
    }

    fn description(&self) -> &'static str {
        "Enter text into the currently focused input field. Tap a field \
         first to focus it."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["text"],
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Text to enter into the focused field"
                }
            }
        })
    }

    async fn execute(&self, args: &Value, session: &SessionState) -> ToolResult {
        let input: FlutterTypeInput = serde_json::from_value(args.clone())
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        let client = session.client().await?;
        InteractionDriver::new(&client).enter_text(&input.text).await?;

        Ok(format!("Entered {} characters", input.text.chars().count()))
    }
}
