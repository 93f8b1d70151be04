//! Flutter MCP CLI
//!
//! Command-line interface for the Flutter MCP server.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use flutter_mcp::session::SessionConfig;
use flutter_mcp::transport::{SseConfig, SseTransport, StdioTransport};
use flutter_mcp::{McpServer, ServerConfig};
use tracing_subscriber::EnvFilter;

/// Flutter MCP Server - drive running Flutter apps from LLMs
#[derive(Parser, Debug)]
#[command(name = "flutter-mcp")]
#[command(version)]
#[command(about = "MCP server for driving Flutter applications via the Dart VM service")]
struct Args {
    /// Log level (debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Per-call VM service timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Port for SSE transport (enables SSE mode instead of stdio)
    #[arg(long, value_name = "PORT")]
    port: Option<u16>,

    /// API key for SSE authentication (auto-generated if not provided)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,
}

// A clean stop exits 0; a fatal startup failure surfaces as Err and exits 1.
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout belongs to the MCP framing.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.log_level.clone())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let server_config = ServerConfig {
        session: SessionConfig {
            call_timeout: Duration::from_secs(args.timeout_secs),
        },
        ..Default::default()
    };

    let server = McpServer::new(server_config);

    if let Some(port) = args.port {
        let sse_config = match args.api_key {
            Some(key) => SseConfig::with_api_key(port, key),
            None => {
                let config = SseConfig::new(port);
                eprintln!("Generated API key: {}", config.api_key);
                config
            }
        };

        SseTransport::new(server, sse_config).run().await?;
    } else {
        if args.api_key.is_some() {
            tracing::warn!("--api-key is ignored in stdio mode");
        }

        StdioTransport::new(server).run().await?;
    }

    Ok(())
}
