//! Widget property lookup tool

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Tool, ToolError, ToolResult};
use crate::inspector::Inspector;
use crate::session::SessionState;

/// Get-properties tool - fetches one widget's full details
pub struct FlutterGetPropertiesTool;

/// Input parameters for `flutter_get_properties`
#[derive(Debug, Deserialize)]
pub struct FlutterGetPropertiesInput {
    /// Widget id from an earlier snapshot
    pub widget_id: String,
}

impl FlutterGetPropertiesTool {
    /// Create a new get-properties tool
    pub const fn new() -> Self {
        Self
    }
}

impl Default for FlutterGetPropertiesTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FlutterGetPropertiesTool {
    fn name(&self) -> &'static str {
        "flutter_get_properties"
    }

    fn description(&self) -> &'static str {
        "Fetch the full details of a single widget by id, including its \
         diagnostic properties and geometry."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["widget_id"],
            "properties": {
                "widget_id": {
                    "type": "string",
                    "description": "Widget id from flutter_get_tree or flutter_find"
                }
            }
        })
    }

    async fn execute(&self, args: &Value, session: &SessionState) -> ToolResult {
        let input: FlutterGetPropertiesInput = serde_json::from_value(args.clone())
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        let client = session.client().await?;
        let node = Inspector::new(&client)
            .get_widget_properties(&input.widget_id)
            .await?;

        Ok(serde_json::to_value(&node)?.to_string())
    }
}
