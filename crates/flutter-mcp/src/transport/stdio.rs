//! Stdio transport implementation
//!
//! Newline-delimited JSON-RPC over stdin/stdout: one message per line, a
//! flush after every write. The receive loop also multiplexes
//! server-initiated notifications onto stdout.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::rpc::{self, Message, Notification, Response};
use crate::server::McpServer;

/// Stdio transport for MCP communication.
///
/// The default transport for CLI-based MCP clients: requests come in on
/// stdin, responses and notifications go out on stdout, and EOF on stdin
/// shuts the server down.
pub struct StdioTransport {
    server: Arc<McpServer>,
}

impl StdioTransport {
    /// Create a new stdio transport
    pub fn new(server: McpServer) -> Self {
        Self {
            server: Arc::new(server),
        }
    }

    /// Run the transport, processing requests until stdin closes
    ///
    /// # Errors
    ///
    /// Returns an error if I/O operations fail.
    pub async fn run(&self) -> super::Result<()> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut lines = BufReader::new(stdin).lines();

        let (notify_tx, mut notify_rx) = mpsc::unbounded_channel::<Notification>();
        self.server.set_notification_sender(notify_tx);

        loop {
            // next_line is cancellation safe, so losing the race to a
            // notification never drops request bytes.
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        tracing::info!("stdin closed, shutting down");
                        break;
                    };

                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    if let Some(response) = self.process_line(trimmed).await {
                        write_json(&mut stdout, &response.to_value()).await?;
                    }
                }
                Some(notification) = notify_rx.recv() => {
                    write_json(&mut stdout, &Message::Notification(notification).to_value())
                        .await?;
                }
            }
        }

        self.server.session().shutdown_launched().await;
        Ok(())
    }

    /// Handle one incoming line; `Some` when a response must be written
    pub(super) async fn process_line(&self, line: &str) -> Option<Message> {
        let message = match Message::parse(line) {
            Ok(message) => message,
            Err(rpc::RpcError::Parse(e)) => {
                return Some(Message::Response(Response::error(
                    rpc::RequestId::Null,
                    rpc::PARSE_ERROR,
                    format!("Parse error: {e}"),
                )));
            }
            Err(rpc::RpcError::InvalidMessage(e)) => {
                return Some(Message::Response(Response::error(
                    rpc::RequestId::Null,
                    rpc::INVALID_REQUEST,
                    format!("Invalid request: {e}"),
                )));
            }
        };

        match message {
            Message::Request(request) => {
                let response = match self.server.handle_request(&request).await {
                    Ok(result) => Response::success(request.id, result),
                    Err(e) => Response::error(request.id, e.error_code(), e.to_string()),
                };
                Some(Message::Response(response))
            }
            Message::Notification(notification) => {
                self.server.handle_notification(&notification);
                None
            }
            Message::Response(response) => {
                tracing::debug!(id = %response.id, "ignoring client-sent response");
                None
            }
        }
    }
}

/// Write one message followed by a newline, then flush
async fn write_json(
    stdout: &mut tokio::io::Stdout,
    value: &serde_json::Value,
) -> super::Result<()> {
    let serialized = serde_json::to_string(value)?;
    stdout.write_all(serialized.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}
