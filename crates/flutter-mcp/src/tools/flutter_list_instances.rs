//! Instance discovery tool

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Tool, ToolError, ToolResult};
use crate::discovery::{self, DEFAULT_PORT_END, DEFAULT_PORT_START};
use crate::session::SessionState;

/// List-instances tool - probes a port range for running debug services
pub struct FlutterListInstancesTool;

/// Input parameters for `flutter_list_instances`
#[derive(Debug, Deserialize)]
pub struct FlutterListInstancesInput {
    /// First port to probe
    pub start: Option<u16>,

    /// Last port to probe
    pub end: Option<u16>,

    /// Per-port probe timeout in milliseconds
    pub timeout_ms: Option<u64>,
}

impl FlutterListInstancesTool {
    /// Create a new list-instances tool
    pub const fn new() -> Self {
        Self
    }
}

impl Default for FlutterListInstancesTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FlutterListInstancesTool {
    fn name(&self) -> &'static str {
        "flutter_list_instances"
    }

    fn description(&self) -> &'static str {
        "Probe local ports for running Flutter debug services and return \
         the instances found. An empty list is a valid result."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "start": {
                    "type": "integer",
                    "description": "First port of the probe range",
                    "default": DEFAULT_PORT_START
                },
                "end": {
                    "type": "integer",
                    "description": "Last port of the probe range",
                    "default": DEFAULT_PORT_END
                },
                "timeout_ms": {
                    "type": "number",
                    "description": "Per-port probe timeout in milliseconds",
                    "default": 1000
                }
            }
        })
    }

    async fn execute(&self, args: &Value, _session: &SessionState) -> ToolResult {
        let input: FlutterListInstancesInput = serde_json::from_value(args.clone())
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        let start = input.start.unwrap_or(DEFAULT_PORT_START);
        let end = input.end.unwrap_or(DEFAULT_PORT_END);
        let timeout = input
            .timeout_ms
            .map_or(discovery::DEFAULT_PROBE_TIMEOUT, Duration::from_millis);

        let instances = discovery::discover_instances(start, end, timeout).await;

        Ok(json!({
            "count": instances.len(),
            "instances": instances,
        })
        .to_string())
    }
}
