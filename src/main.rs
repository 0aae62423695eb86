//! Snowflake MCP Server - Main entry point.
//!
//! This server provides MCP (Model Context Protocol) tools for AI assistants
//! to query a Snowflake data warehouse.

use clap::Parser;
use snowflake_mcp_server::auth::AuthConfig;
use snowflake_mcp_server::config::{Config, TransportMode};
use snowflake_mcp_server::db::{SessionProvider, SnowflakeConnector};
use snowflake_mcp_server::transport::{HttpTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse();

    // Initialize logging
    init_tracing(&config);

    info!(
        transport = %config.transport,
        account = %config.account,
        warehouse = %config.warehouse,
        "Starting Snowflake MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    // The session is created lazily on the first tool call, never here.
    let params = config.connection_params();
    let connector = Arc::new(SnowflakeConnector::new(params));
    let provider = Arc::new(SessionProvider::new(connector));

    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            let transport = StdioTransport::new(provider, config.schema.clone());
            transport.run().await
        }
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let auth = AuthConfig::from_tokens(config.auth_tokens.clone())?;
            let transport = HttpTransport::new(
                provider,
                config.schema.clone(),
                auth,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
