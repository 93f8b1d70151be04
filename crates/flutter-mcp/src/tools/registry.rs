//! Tool registry for managing available tools

use std::collections::HashMap;
use std::sync::Arc;

use super::traits::Tool;

/// Registry of available MCP tools.
///
/// Mutated only during startup registration; serving reads it immutably.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// List all registered tools, ordered by name
    pub fn list(&self) -> Vec<&Arc<dyn Tool>> {
        let mut tools: Vec<_> = self.tools.values().collect();
        tools.sort_by_key(|tool| tool.name());
        tools
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Register the full Flutter tool surface
pub fn register_all_tools(registry: &mut ToolRegistry) {
    // Discovery and launch
    registry.register(Arc::new(super::FlutterListInstancesTool::new()));
    registry.register(Arc::new(super::FlutterLaunchTool::new()));

    // Session management
    registry.register(Arc::new(super::FlutterConnectTool::new()));
    registry.register(Arc::new(super::FlutterDisconnectTool::new()));

    // Inspection
    registry.register(Arc::new(super::FlutterGetTreeTool::new()));
    registry.register(Arc::new(super::FlutterGetPropertiesTool::new()));
    registry.register(Arc::new(super::FlutterFindTool::new()));

    // Interaction
    registry.register(Arc::new(super::FlutterTapTool::new()));
    registry.register(Arc::new(super::FlutterTypeTool::new()));
    registry.register(Arc::new(super::FlutterScrollTool::new()));
}
