//! Scroll tool

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Tool, ToolError, ToolResult};
use crate::inspector::{Inspector, WidgetBounds};
use crate::interaction::InteractionDriver;
use crate::session::SessionState;

/// Default scroll gesture duration in milliseconds
const DEFAULT_DURATION_MS: u64 = 300;

/// Scroll tool - drags by an offset from a start point
pub struct FlutterScrollTool;

/// Input parameters for `flutter_scroll`.
///
/// The start point is the given widget's center, the explicit x/y pair, or
/// the root widget's center when neither is supplied.
#[derive(Debug, Deserialize)]
pub struct FlutterScrollInput {
    /// Horizontal scroll offset in logical pixels
    pub dx: f64,

    /// Vertical scroll offset in logical pixels
    pub dy: f64,

    /// Gesture duration in milliseconds
    pub duration_ms: Option<u64>,

    /// Widget whose center is the start point
    pub widget_id: Option<String>,

    /// Explicit start X coordinate
    pub x: Option<f64>,

    /// Explicit start Y coordinate
    pub y: Option<f64>,
}

impl FlutterScrollTool {
    /// Create a new scroll tool
    pub const fn new() -> Self {
        Self
    }
}

impl Default for FlutterScrollTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FlutterScrollTool {
    fn name(&self) -> &'static str {
        "flutter_scroll"
    }

    fn description(&self) -> &'static str {
        "Scroll by (dx, dy) logical pixels. Starts from a widget's center \
         (widget_id), an explicit point (x, y), or the root widget's center."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["dx", "dy"],
            "properties": {
                "dx": {
                    "type": "number",
                    "description": "Horizontal offset in logical pixels"
                },
                "dy": {
                    "type": "number",
                    "description": "Vertical offset in logical pixels (negative scrolls content up)"
                },
                "duration_ms": {
                    "type": "number",
                    "description": "Gesture duration in milliseconds",
                    "default": 300
                },
                "widget_id": {
                    "type": "string",
                    "description": "Widget whose center is the gesture start point"
                },
                "x": {
                    "type": "number",
                    "description": "Explicit start X coordinate"
                },
                "y": {
                    "type": "number",
                    "description": "Explicit start Y coordinate"
                }
            }
        })
    }

    async fn execute(&self, args: &Value, session: &SessionState) -> ToolResult {
        let input: FlutterScrollInput = serde_json::from_value(args.clone())
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        let client = session.client().await?;
        let inspector = Inspector::new(&client);

        let (x, y) = if let Some(widget_id) = &input.widget_id {
            let node = inspector.get_widget_properties(widget_id).await?;
            node.bounds
                .filter(WidgetBounds::is_valid)
                .map(|b| b.center())
                .ok_or_else(|| {
                    ToolError::ExecutionFailed(format!("widget {widget_id} has no valid bounds"))
                })?
        } else if let (Some(x), Some(y)) = (input.x, input.y) {
            (x, y)
        } else {
            // Fall back to the root widget's center, roughly mid-screen.
            let tree = inspector.get_widget_tree(1).await?;
            tree.root()
                .and_then(|root| root.bounds)
                .filter(WidgetBounds::is_valid)
                .map(|b| b.center())
                .ok_or_else(|| {
                    ToolError::ExecutionFailed(
                        "no start point: give widget_id or x/y (root has no bounds)".to_string(),
                    )
                })?
        };

        let duration = Duration::from_millis(input.duration_ms.unwrap_or(DEFAULT_DURATION_MS));
        InteractionDriver::new(&client)
            .scroll(x, y, input.dx, input.dy, duration)
            .await?;

        Ok(format!(
            "Scrolled by ({}, {}) from ({x}, {y})",
            input.dx, input.dy
        ))
    }
}
