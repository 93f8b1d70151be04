//! Widget search tool

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Tool, ToolError, ToolResult};
use crate::inspector::Inspector;
use crate::selector::Selector;
use crate::session::SessionState;

/// Find tool - resolves a selector against a fresh snapshot
pub struct FlutterFindTool;

/// Input parameters for `flutter_find`
#[derive(Debug, Deserialize)]
pub struct FlutterFindInput {
    /// CSS-like selector (e.g., `Button[text="OK"]`, `Column > Text`, `#id`)
    pub selector: String,
}

impl FlutterFindTool {
    /// Create a new find tool
    pub const fn new() -> Self {
        Self
    }
}

impl Default for FlutterFindTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FlutterFindTool {
    fn name(&self) -> &'static str {
        "flutter_find"
    }

    fn description(&self) -> &'static str {
        "Find widgets matching a CSS-like selector. Supports type names \
         (Button), ids (#x), text predicates ([text=\"OK\"], [contains=\"O\"]), \
         property predicates ([enabled=true]), and '>' / descendant combinators."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["selector"],
            "properties": {
                "selector": {
                    "type": "string",
                    "description": "Selector query to evaluate against the widget tree"
                }
            }
        })
    }

    async fn execute(&self, args: &Value, session: &SessionState) -> ToolResult {
        let input: FlutterFindInput = serde_json::from_value(args.clone())
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        let selector = Selector::parse(&input.selector)?;

        let client = session.client().await?;
        let tree = Inspector::new(&client).get_widget_tree(0).await?;

        let matches: Vec<Value> = selector
            .match_all(&tree)
            .into_iter()
            .map(|node| serde_json::to_value(node).unwrap_or(Value::Null))
            .collect();

        Ok(json!({
            "selector": input.selector,
            "count": matches.len(),
            "matches": matches,
        })
        .to_string())
    }
}
