//! SSE transport implementation
//!
//! HTTP server with Server-Sent Events for MCP communication: requests
//! arrive as POSTs, server-initiated notifications stream out over the SSE
//! channel.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response as HttpResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use rand::RngCore;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use super::error::TransportError;
use crate::rpc::{self, Message, Notification, Response};
use crate::server::McpServer;

/// SSE transport configuration
#[derive(Debug, Clone)]
pub struct SseConfig {
    /// Port to listen on
    pub port: u16,

    /// API key for authentication
    pub api_key: String,
}

impl SseConfig {
    /// Create a new SSE config with auto-generated API key
    pub fn new(port: u16) -> Self {
        Self {
            port,
            api_key: generate_api_key(),
        }
    }

    /// Create a new SSE config with specific API key
    pub fn with_api_key(port: u16, api_key: impl Into<String>) -> Self {
        Self {
            port,
            api_key: api_key.into(),
        }
    }
}

/// Generate a random API key
fn generate_api_key() -> String {
    let mut key = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut key);
    hex::encode(key)
}

/// Shared state for the SSE server
struct AppState {
    server: Arc<McpServer>,
    api_key: String,
}

/// SSE transport for MCP communication
pub struct SseTransport {
    config: SseConfig,
    server: Arc<McpServer>,
}

impl SseTransport {
    /// Create a new SSE transport
    pub fn new(server: McpServer, config: SseConfig) -> Self {
        Self {
            config,
            server: Arc::new(server),
        }
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    /// Run the SSE server
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or start.
    pub async fn run(&self) -> super::Result<()> {
        let state = Arc::new(AppState {
            server: Arc::clone(&self.server),
            api_key: self.config.api_key.clone(),
        });

        let app = Router::new()
            .route("/mcp", get(handle_sse))
            .route("/mcp", post(handle_post))
            .with_state(state);

        let addr = format!("0.0.0.0:{}", self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::BindFailed(e.to_string()))?;

        tracing::info!(port = self.config.port, "SSE server listening");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::Io(std::io::Error::other(e.to_string())))?;

        Ok(())
    }
}

/// Validate the Authorization header
fn validate_auth(
    headers: &HeaderMap,
    expected_key: &str,
) -> Result<(), (StatusCode, &'static str)> {
    let auth_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or((StatusCode::UNAUTHORIZED, "Authentication required"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or((StatusCode::UNAUTHORIZED, "Invalid authorization format"))?;

    if token != expected_key {
        return Err((StatusCode::FORBIDDEN, "Invalid API key"));
    }

    Ok(())
}

/// Handle SSE connection; server notifications stream to the most recent
/// subscriber.
async fn handle_sse(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HttpResponse> {
    validate_auth(&headers, &state.api_key)
        .map_err(|(status, msg)| (status, msg).into_response())?;

    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(100);

    let (notify_tx, mut notify_rx) = mpsc::unbounded_channel::<Notification>();
    state.server.set_notification_sender(notify_tx);

    let _ = tx
        .send(Ok(Event::default().event("connected").data("ok")))
        .await;

    tokio::spawn(async move {
        while let Some(notification) = notify_rx.recv().await {
            let payload = Message::Notification(notification).serialize();
            if tx
                .send(Ok(Event::default().event("message").data(payload)))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    Ok(Sse::new(ReceiverStream::new(rx)).keep_alive(KeepAlive::default()))
}

/// Handle POST requests (JSON-RPC over HTTP).
///
/// The body is taken raw so malformed JSON gets the same `-32700`
/// null-id envelope the stdio transport produces, rather than a
/// framework rejection.
async fn handle_post(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<HttpResponse, HttpResponse> {
    validate_auth(&headers, &state.api_key)
        .map_err(|(status, msg)| (status, msg).into_response())?;

    let message = match Message::parse(&body) {
        Ok(message) => message,
        Err(rpc::RpcError::Parse(e)) => {
            return Ok(error_response(rpc::PARSE_ERROR, &format!("Parse error: {e}")));
        }
        Err(rpc::RpcError::InvalidMessage(e)) => {
            return Ok(error_response(
                rpc::INVALID_REQUEST,
                &format!("Invalid request: {e}"),
            ));
        }
    };

    match message {
        Message::Request(request) => {
            let response = match state.server.handle_request(&request).await {
                Ok(result) => Response::success(request.id, result),
                Err(e) => Response::error(request.id, e.error_code(), e.to_string()),
            };
            Ok(Json(Message::Response(response).to_value()).into_response())
        }
        Message::Notification(notification) => {
            state.server.handle_notification(&notification);
            Ok(StatusCode::ACCEPTED.into_response())
        }
        Message::Response(_) => Ok(StatusCode::ACCEPTED.into_response()),
    }
}

fn error_response(code: i32, message: &str) -> HttpResponse {
    let response = Response::error(rpc::RequestId::Null, code, message);
    Json(Message::Response(response).to_value()).into_response()
}
