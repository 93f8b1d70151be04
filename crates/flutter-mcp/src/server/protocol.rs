//! MCP protocol implementation
//!
//! JSON-RPC dispatch for the Model Context Protocol: the initialize
//! handshake, `tools/list`, `tools/call`, `ping`, and the server-initiated
//! notification channel.
//!
//! # Protocol Flow
//!
//! 1. Client sends `initialize` (only it and `ping` are legal before then)
//! 2. Server responds with capabilities and server info
//! 3. Client sends the `initialized` notification
//! 4. Client calls `tools/list` and `tools/call`

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use serde_json::{Value, json};
use tokio::sync::mpsc;

use super::error::ServerError;
use super::types::{ClientInfo, ServerConfig};
use crate::rpc::{Notification, Request};
use crate::session::SessionState;
use crate::tools::{ToolRegistry, register_all_tools, validate_arguments};

/// Protocol version implemented by this server
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP Server capabilities
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServerCapabilities {
    tools: ToolCapabilities,
    logging: Value,
}

/// Tool capabilities
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolCapabilities {
    list_changed: bool,
}

/// MCP initialization result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitializeResult {
    protocol_version: String,
    capabilities: ServerCapabilities,
    server_info: ServerInfo,
}

/// Server information
#[derive(Debug, Serialize)]
struct ServerInfo {
    name: String,
    version: String,
}

/// Tool definition for listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolDefinition {
    name: String,
    description: String,
    input_schema: Value,
}

/// Content item for tool responses
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentItem {
    /// Text content
    #[serde(rename = "text")]
    Text {
        /// The text content
        text: String,
    },
}

impl ContentItem {
    /// Create a text content item
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text { text: s.into() }
    }
}

/// Tool call result envelope.
///
/// Tool failures travel inside this envelope with `is_error: true`; they
/// are never JSON-RPC protocol errors.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Result content
    pub content: Vec<ContentItem>,

    /// Whether the tool execution errored
    pub is_error: bool,
}

/// MCP server for driving Flutter applications.
///
/// Dispatches tool calls from MCP clients onto the shared debug-service
/// session. `handle_request` takes `&self`: the initialized flag is atomic
/// and the session has interior mutability, so transports share one
/// `Arc<McpServer>` and calls may run concurrently.
pub struct McpServer {
    /// Server configuration
    config: ServerConfig,

    /// Tool registry, populated at construction
    tools: ToolRegistry,

    /// Debug-service session shared by all tools
    session: Arc<SessionState>,

    /// Whether `initialize` has completed
    initialized: AtomicBool,

    /// Client identity captured at `initialize`
    client_info: StdMutex<Option<ClientInfo>>,

    /// Outbound notification channel, installed by the transport
    notifications: StdMutex<Option<mpsc::UnboundedSender<Notification>>>,
}

impl McpServer {
    /// Create a new MCP server with the full tool surface registered
    pub fn new(config: ServerConfig) -> Self {
        let mut tools = ToolRegistry::new();
        register_all_tools(&mut tools);

        let session = Arc::new(SessionState::new(config.session.clone()));

        Self {
            config,
            tools,
            session,
            initialized: AtomicBool::new(false),
            client_info: StdMutex::new(None),
            notifications: StdMutex::new(None),
        }
    }

    /// Install the channel server-initiated notifications are sent on
    pub fn set_notification_sender(&self, sender: mpsc::UnboundedSender<Notification>) {
        *self
            .notifications
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(sender);
    }

    /// Handle a JSON-RPC request and produce its result value.
    ///
    /// # Errors
    ///
    /// Protocol failures map to JSON-RPC errors via
    /// [`ServerError::error_code`]; tool failures do not reach here.
    pub async fn handle_request(&self, request: &Request) -> super::Result<Value> {
        tracing::debug!(method = %request.method, id = %request.id, "handling request");

        let params = request.params.clone().unwrap_or(Value::Null);

        match request.method.as_str() {
            "initialize" => self.handle_initialize(&params),
            "ping" => Ok(json!({})),
            method if !self.is_initialized() => Err(ServerError::InvalidRequest(format!(
                "{method} called before initialize"
            ))),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(&params).await,
            other => Err(ServerError::MethodNotFound(other.to_string())),
        }
    }

    /// Handle a JSON-RPC notification (no response)
    pub fn handle_notification(&self, notification: &Notification) {
        match notification.method.as_str() {
            "initialized" | "notifications/initialized" => {
                tracing::debug!("client reported initialized");
            }
            other => {
                tracing::debug!(method = %other, "ignoring notification");
            }
        }
    }

    fn handle_initialize(&self, params: &Value) -> super::Result<Value> {
        if let Some(info) = params.get("clientInfo") {
            match serde_json::from_value::<ClientInfo>(info.clone()) {
                Ok(info) => {
                    tracing::info!(client = %info.name, version = %info.version, "client connected");
                    *self
                        .client_info
                        .lock()
                        .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(info);
                }
                Err(e) => tracing::debug!(error = %e, "malformed clientInfo ignored"),
            }
        }

        self.initialized.store(true, Ordering::SeqCst);

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolCapabilities {
                    list_changed: false,
                },
                logging: json!({}),
            },
            server_info: ServerInfo {
                name: self.config.name.clone(),
                version: self.config.version.clone(),
            },
        };

        Ok(serde_json::to_value(result)?)
    }

    fn handle_tools_list(&self) -> super::Result<Value> {
        let tools: Vec<ToolDefinition> = self
            .tools
            .list()
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
            })
            .collect();

        Ok(json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, params: &Value) -> super::Result<Value> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| ServerError::InvalidParams("missing tool name".to_string()))?;
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ServerError::MethodNotFound(name.to_string()))?;

        validate_arguments(&tool.input_schema(), &arguments)
            .map_err(ServerError::InvalidParams)?;

        let call_result = match tool.execute(&arguments, &self.session).await {
            Ok(output) => ToolCallResult {
                content: vec![ContentItem::text(output)],
                is_error: false,
            },
            Err(e) => {
                tracing::debug!(tool = name, error = %e, "tool failed");
                ToolCallResult {
                    content: vec![ContentItem::text(e.to_string())],
                    is_error: true,
                }
            }
        };

        Ok(serde_json::to_value(call_result)?)
    }

    /// Emit a `notifications/message` log notification
    pub fn notify_log(&self, level: &str, message: &str, data: Option<Value>) {
        let mut params = json!({ "level": level, "message": message });
        if let Some(data) = data {
            params["data"] = data;
        }
        self.send_notification("notifications/message", params);
    }

    /// Emit a `notifications/progress` notification
    pub fn notify_progress(&self, token: &Value, progress: f64, total: Option<f64>) {
        let mut params = json!({ "progressToken": token, "progress": progress });
        if let Some(total) = total {
            params["total"] = json!(total);
        }
        self.send_notification("notifications/progress", params);
    }

    fn send_notification(&self, method: &str, params: Value) {
        let guard = self
            .notifications
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(sender) = guard.as_ref() {
            let _ = sender.send(Notification {
                method: method.to_string(),
                params: Some(params),
            });
        }
    }

    /// Get the shared session state
    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    /// Check if the server has been initialized
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Client identity captured at `initialize`, if any
    pub fn client_info(&self) -> Option<ClientInfo> {
        self.client_info
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}
