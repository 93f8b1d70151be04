//! Widget tree snapshot tool

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Tool, ToolError, ToolResult};
use crate::inspector::Inspector;
use crate::session::SessionState;

/// Get-tree tool - snapshots the widget hierarchy as JSON
pub struct FlutterGetTreeTool;

/// Input parameters for `flutter_get_tree`
#[derive(Debug, Deserialize)]
pub struct FlutterGetTreeInput {
    /// Depth bound; 0 or absent means unbounded
    #[serde(default)]
    pub max_depth: usize,
}

impl FlutterGetTreeTool {
    /// Create a new get-tree tool
    pub const fn new() -> Self {
        Self
    }
}

impl Default for FlutterGetTreeTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FlutterGetTreeTool {
    fn name(&self) -> &'static str {
        "flutter_get_tree"
    }

    fn description(&self) -> &'static str {
        "Snapshot the widget tree of the connected application as JSON. \
         The snapshot is immutable; re-run after interactions to observe changes."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "max_depth": {
                    "type": "integer",
                    "description": "Depth bound below the root; 0 means unbounded",
                    "default": 0
                }
            }
        })
    }

    async fn execute(&self, args: &Value, session: &SessionState) -> ToolResult {
        let input: FlutterGetTreeInput = serde_json::from_value(args.clone())
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        let client = session.client().await?;
        let tree = Inspector::new(&client).get_widget_tree(input.max_depth).await?;

        tracing::debug!(nodes = tree.node_count(), "captured widget tree");

        Ok(tree.to_json().to_string())
    }
}
