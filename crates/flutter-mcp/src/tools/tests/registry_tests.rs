//! Tests for the tool registry

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::session::SessionState;
use crate::tools::{Tool, ToolError, ToolRegistry, ToolResult, register_all_tools};

struct MockTool {
    name: &'static str,
}

#[async_trait]
impl Tool for MockTool {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        "Mock tool for testing"
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object"})
    }

    async fn execute(&self, _args: &Value, _session: &SessionState) -> ToolResult {
        Err(ToolError::ExecutionFailed("Mock".to_string()))
    }
}

#[test]
fn test_register_and_get() {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(MockTool { name: "mock_a" }));

    assert!(registry.get("mock_a").is_some());
    assert!(registry.get("mock_b").is_none());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_reregistration_replaces() {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(MockTool { name: "mock_a" }));
    registry.register(Arc::new(MockTool { name: "mock_a" }));

    assert_eq!(registry.len(), 1);
}

#[test]
fn test_list_is_sorted_by_name() {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(MockTool { name: "zeta" }));
    registry.register(Arc::new(MockTool { name: "alpha" }));
    registry.register(Arc::new(MockTool { name: "mid" }));

    let names: Vec<&str> = registry.list().iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
}

#[test]
fn test_register_all_tools() {
    let mut registry = ToolRegistry::new();
    register_all_tools(&mut registry);

    assert_eq!(registry.len(), 10);
    assert!(registry.get("flutter_connect").is_some());
    assert!(registry.get("flutter_tap").is_some());
    assert!(registry.get("flutter_list_instances").is_some());
}

#[test]
fn test_every_tool_declares_an_object_schema() {
    let mut registry = ToolRegistry::new();
    register_all_tools(&mut registry);

    for tool in registry.list() {
        let schema = tool.input_schema();
        assert_eq!(schema["type"], "object", "tool {}", tool.name());
        assert!(!tool.description().is_empty(), "tool {}", tool.name());
    }
}
