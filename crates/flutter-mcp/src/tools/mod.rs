//! Tool framework for MCP
//!
//! This module provides the tool trait and registry plus the Flutter tool
//! surface exposed over `tools/list` and `tools/call`.

#[cfg(test)]
mod tests;

// Discovery and launch tools
mod flutter_launch;
mod flutter_list_instances;

// Session tools
mod flutter_connect;
mod flutter_disconnect;

// Inspection tools
mod flutter_find;
mod flutter_get_properties;
mod flutter_get_tree;

// Interaction tools
mod flutter_scroll;
mod flutter_tap;
mod flutter_type;

// Framework
mod error;
mod registry;
mod schema;
mod traits;

// Re-export discovery and launch tools
pub use flutter_launch::FlutterLaunchTool;
pub use flutter_list_instances::FlutterListInstancesTool;

// Re-export session tools
pub use flutter_connect::FlutterConnectTool;
pub use flutter_disconnect::FlutterDisconnectTool;

// Re-export inspection tools
pub use flutter_find::FlutterFindTool;
pub use flutter_get_properties::FlutterGetPropertiesTool;
pub use flutter_get_tree::FlutterGetTreeTool;

// Re-export interaction tools
pub use flutter_scroll::FlutterScrollTool;
pub use flutter_tap::FlutterTapTool;
pub use flutter_type::FlutterTypeTool;

// Re-export framework types
pub use error::ToolError;
pub use registry::{ToolRegistry, register_all_tools};
pub use schema::validate_arguments;
pub use traits::{Tool, ToolResult};

/// Result type for tool operations
pub type Result<T> = std::result::Result<T, ToolError>;
