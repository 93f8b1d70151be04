//! Tests for `flutter_scroll`

use serde_json::json;

use crate::session::{SessionConfig, SessionState};
use crate::tools::flutter_scroll::{FlutterScrollInput, FlutterScrollTool};
use crate::tools::{Tool, ToolError};

#[test]
fn test_tool_metadata() {
    let tool = FlutterScrollTool::new();

    assert_eq!(tool.name(), "flutter_scroll");
    let schema = tool.input_schema();
    let required = schema["required"].as_array().unwrap();
    assert!(required.contains(&json!("dx")));
    assert!(required.contains(&json!("dy")));
}

#[test]
fn test_input_parsing_offsets_only() {
    let input: FlutterScrollInput =
        serde_json::from_value(json!({"dx": 0.0, "dy": -200.0})).unwrap();

    assert_eq!(input.dy, -200.0);
    assert!(input.duration_ms.is_none());
    assert!(input.widget_id.is_none());
}

#[test]
fn test_input_parsing_with_origin() {
    let input: FlutterScrollInput = serde_json::from_value(json!({
        "dx": 0.0,
        "dy": -200.0,
        "x": 160.0,
        "y": 400.0,
        "duration_ms": 500
    }))
    .unwrap();

    assert_eq!(input.x, Some(160.0));
    assert_eq!(input.duration_ms, Some(500));
}

#[test]
fn test_input_missing_offsets_rejected() {
    let result: Result<FlutterScrollInput, _> = serde_json::from_value(json!({"dx": 1.0}));
    assert!(result.is_err());
}

#[tokio::test]
async fn test_requires_connection() {
    let tool = FlutterScrollTool::new();
    let session = SessionState::new(SessionConfig::default());

    let err = tool
        .execute(&json!({"dx": 0.0, "dy": -100.0}), &session)
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::NotConnected(_)));
}
