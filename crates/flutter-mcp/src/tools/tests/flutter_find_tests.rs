//! Tests for `flutter_find`

use serde_json::json;

use crate::session::{SessionConfig, SessionState};
use crate::tools::flutter_find::FlutterFindTool;
use crate::tools::{Tool, ToolError};

#[test]
fn test_tool_metadata() {
    let tool = FlutterFindTool::new();

    assert_eq!(tool.name(), "flutter_find");
    let schema = tool.input_schema();
    assert_eq!(schema["required"][0], "selector");
}

#[tokio::test]
async fn test_selector_parse_error_is_tool_error() {
    let tool = FlutterFindTool::new();
    let session = SessionState::new(SessionConfig::default());

    // The selector is parsed before any connection is attempted, so this
    // fails as a selector error even though the session is disconnected.
    let err = tool
        .execute(&json!({"selector": "Button["}), &session)
        .await
        .unwrap_err();

    match err {
        ToolError::Selector(message) => {
            assert!(message.contains("position"), "got: {message}");
        }
        other => panic!("expected selector error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_requires_connection() {
    let tool = FlutterFindTool::new();
    let session = SessionState::new(SessionConfig::default());

    let err = tool
        .execute(&json!({"selector": "Button"}), &session)
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::NotConnected(_)));
}
