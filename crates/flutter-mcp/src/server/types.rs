//! Server configuration types

use serde::Deserialize;

use crate::session::SessionConfig;

/// MCP Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server name reported to clients
    pub name: String,

    /// Server version
    pub version: String,

    /// Debug-service session configuration
    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "flutter-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            session: SessionConfig::default(),
        }
    }
}

/// Client identity captured at `initialize`
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    /// Client name
    pub name: String,

    /// Client version
    #[serde(default)]
    pub version: String,
}
