//! Tap tool

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Tool, ToolError, ToolResult};
use crate::inspector::Inspector;
use crate::interaction::InteractionDriver;
use crate::selector::Selector;
use crate::session::SessionState;

/// Tap tool - taps a widget or a point
pub struct FlutterTapTool;

/// Input parameters for `flutter_tap`.
///
/// Exactly one targeting mode must be supplied: a selector, a widget id,
/// or both coordinates.
#[derive(Debug, Deserialize)]
pub struct FlutterTapInput {
    /// Selector resolving to the widget to tap
    pub selector: Option<String>,

    /// Widget id from an earlier snapshot
    pub widget_id: Option<String>,

    /// X coordinate in logical pixels
    pub x: Option<f64>,

    /// Y coordinate in logical pixels
    pub y: Option<f64>,
}

impl FlutterTapTool {
    /// Create a new tap tool
    pub const fn new() -> Self {
        Self
    }
}

impl Default for FlutterTapTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FlutterTapTool {
    fn name(&self) -> &'static str {
        "flutter_tap"
    }

    fn description(&self) -> &'static str {
        "Tap a widget (by selector or widget_id) or a point (x, y). \
         Exactly one targeting mode must be given."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "selector": {
                    "type": "string",
                    "description": "Selector resolving to the widget to tap"
                },
                "widget_id": {
                    "type": "string",
                    "description": "Widget id from flutter_get_tree or flutter_find"
                },
                "x": {
                    "type": "number",
                    "description": "X coordinate in logical pixels (requires y)"
                },
                "y": {
                    "type": "number",
                    "description": "Y coordinate in logical pixels (requires x)"
                }
            }
        })
    }

    async fn execute(&self, args: &Value, session: &SessionState) -> ToolResult {
        let input: FlutterTapInput = serde_json::from_value(args.clone())
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        let has_point = input.x.is_some() || input.y.is_some();
        let modes = [
            input.selector.is_some(),
            input.widget_id.is_some(),
            has_point,
        ]
        .iter()
        .filter(|&&m| m)
        .count();

        if modes != 1 {
            return Err(ToolError::InvalidParams(
                "provide exactly one of selector, widget_id, or x/y".to_string(),
            ));
        }

        if has_point && (input.x.is_none() || input.y.is_none()) {
            return Err(ToolError::InvalidParams(
                "coordinate taps require both x and y".to_string(),
            ));
        }

        let client = session.client().await?;
        let driver = InteractionDriver::new(&client);

        if let Some(selector_str) = &input.selector {
            let selector = Selector::parse(selector_str)?;
            let tree = Inspector::new(&client).get_widget_tree(0).await?;
            let node = selector
                .match_first(&tree)
                .ok_or_else(|| ToolError::WidgetNotFound(selector_str.clone()))?;

            driver.tap_node(node).await?;
            return Ok(format!("Tapped {} [id={}]", node.label(), node.id));
        }

        if let Some(widget_id) = &input.widget_id {
            let node = Inspector::new(&client).get_widget_properties(widget_id).await?;
            driver.tap_node(&node).await?;
            return Ok(format!("Tapped {} [id={}]", node.label(), node.id));
        }

        // Both coordinates are present past the checks above.
        let (x, y) = (input.x.unwrap_or_default(), input.y.unwrap_or_default());
        driver.tap_at(x, y).await?;
        Ok(format!("Tapped at ({x}, {y})"))
    }
}
