//! Target launch tool

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Tool, ToolError, ToolResult};
use crate::launcher::{self, LaunchConfig};
use crate::session::SessionState;

/// Launch tool - spawns a Flutter project and reports its debug endpoint
pub struct FlutterLaunchTool;

/// Input parameters for `flutter_launch`
#[derive(Debug, Deserialize)]
pub struct FlutterLaunchInput {
    /// Path to the Flutter project to run
    pub project_path: String,

    /// Device id to run on
    pub device: Option<String>,

    /// Fixed debug-service port
    pub port: Option<u16>,
}

impl FlutterLaunchTool {
    /// Create a new launch tool
    pub const fn new() -> Self {
        Self
    }
}

impl Default for FlutterLaunchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FlutterLaunchTool {
    fn name(&self) -> &'static str {
        "flutter_launch"
    }

    fn description(&self) -> &'static str {
        "Launch a Flutter project with `flutter run` and wait for its debug \
         service. Connect to the returned uri with flutter_connect."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["project_path"],
            "properties": {
                "project_path": {
                    "type": "string",
                    "description": "Path to the Flutter project directory"
                },
                "device": {
                    "type": "string",
                    "description": "Device id to run on (flutter devices)"
                },
                "port": {
                    "type": "integer",
                    "description": "Fixed debug-service port instead of an ephemeral one"
                }
            }
        })
    }

    async fn execute(&self, args: &Value, session: &SessionState) -> ToolResult {
        let input: FlutterLaunchInput = serde_json::from_value(args.clone())
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        let mut config = LaunchConfig::new(&input.project_path);
        config.device = input.device;
        config.port = input.port;

        let app = launcher::launch(config)
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        let report = json!({
            "uri": app.uri,
            "port": app.port,
            "pid": app.pid,
            "project_name": app.project_name,
        })
        .to_string();

        // The session owns the child from here; it is killed when replaced
        // or when the server shuts down.
        session.store_launched(app).await;

        Ok(report)
    }
}
