//! # Flutter MCP Server Library
//!
//! This crate provides an MCP (Model Context Protocol) server for driving
//! running Flutter applications through the Dart VM service.
//!
//! ## Overview
//!
//! Flutter MCP lets LLMs and test harnesses inspect and interact with a
//! live Flutter app over its debug WebSocket, providing tools for:
//!
//! - **Discovery**: Probe local ports for running debug services
//! - **Inspection**: Snapshot the widget tree, fetch widget properties,
//!   query widgets with a CSS-like selector language
//! - **Interaction**: Tap, scroll, long-press, and enter text via the
//!   driver extension and the in-app pointer-injection handler
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flutter_mcp::{McpServer, ServerConfig};
//! use flutter_mcp::transport::StdioTransport;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), flutter_mcp::transport::TransportError> {
//!     let server = McpServer::new(ServerConfig::default());
//!     let transport = StdioTransport::new(server);
//!     transport.run().await
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`rpc`]: JSON-RPC 2.0 codec shared by both protocol sides
//! - [`server`]: MCP dispatcher (initialize, `tools/list`, `tools/call`)
//! - [`transport`]: Communication layers (stdio, SSE)
//! - [`vm`]: Dart VM service client over WebSocket
//! - [`inspector`]: Widget tree model and capture
//! - [`selector`]: CSS-like widget query language
//! - [`interaction`]: Gestures and text entry
//! - [`discovery`]: Local instance probing
//! - [`launcher`]: `flutter run` process management
//! - [`session`]: Connection state shared by the tools
//! - [`tools`]: The MCP tool surface

pub mod discovery;
pub mod inspector;
pub mod interaction;
pub mod launcher;
pub mod rpc;
pub mod selector;
pub mod server;
pub mod session;
pub mod tools;
pub mod transport;
pub mod vm;

pub use server::{McpServer, ServerConfig};
