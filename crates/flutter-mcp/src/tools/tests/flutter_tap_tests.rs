//! Tests for `flutter_tap`

use serde_json::json;

use crate::session::{SessionConfig, SessionState};
use crate::tools::flutter_tap::{FlutterTapInput, FlutterTapTool};
use crate::tools::{Tool, ToolError};

fn session() -> SessionState {
    SessionState::new(SessionConfig::default())
}

#[test]
fn test_tool_metadata() {
    let tool = FlutterTapTool::new();

    assert_eq!(tool.name(), "flutter_tap");
    assert!(!tool.description().is_empty());

    let schema = tool.input_schema();
    assert_eq!(schema["type"], "object");
    assert!(schema["properties"]["selector"].is_object());
    assert!(schema["properties"]["widget_id"].is_object());
    assert!(schema["properties"]["x"].is_object());
    assert!(schema["properties"]["y"].is_object());
}

#[test]
fn test_input_parsing_selector() {
    let input: FlutterTapInput =
        serde_json::from_value(json!({"selector": "Button[text=\"OK\"]"})).unwrap();

    assert_eq!(input.selector.as_deref(), Some("Button[text=\"OK\"]"));
    assert!(input.widget_id.is_none());
    assert!(input.x.is_none());
}

#[test]
fn test_input_parsing_coordinates() {
    let input: FlutterTapInput = serde_json::from_value(json!({"x": 10.0, "y": 20.5})).unwrap();

    assert_eq!(input.x, Some(10.0));
    assert_eq!(input.y, Some(20.5));
}

#[tokio::test]
async fn test_no_targeting_mode_rejected() {
    let tool = FlutterTapTool::new();
    let err = tool.execute(&json!({}), &session()).await.unwrap_err();
    assert!(matches!(err, ToolError::InvalidParams(_)));
}

#[tokio::test]
async fn test_multiple_targeting_modes_rejected() {
    let tool = FlutterTapTool::new();
    let err = tool
        .execute(
            &json!({"selector": "Button", "widget_id": "b1"}),
            &session(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::InvalidParams(_)));
}

#[tokio::test]
async fn test_half_coordinate_pair_rejected() {
    let tool = FlutterTapTool::new();
    let err = tool.execute(&json!({"x": 10.0}), &session()).await.unwrap_err();
    assert!(matches!(err, ToolError::InvalidParams(_)));
}

#[tokio::test]
async fn test_requires_connection() {
    let tool = FlutterTapTool::new();
    let err = tool
        .execute(&json!({"x": 10.0, "y": 20.0}), &session())
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::NotConnected(_)));
}
