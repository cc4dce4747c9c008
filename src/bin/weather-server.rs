//! MCP tool host serving weather alerts and forecasts over stdio.

use std::sync::Arc;

use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;
use weather_mcp::config::HostConfig;
use weather_mcp::{NwsClient, WeatherHost};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = HostConfig::from_env();
    let source = NwsClient::new(config.nws_base_url)?;

    tracing::info!("Starting weather tool host...");
    let service = WeatherHost::new(Arc::new(source)).serve(stdio()).await?;
    let reason = service.waiting().await?;
    tracing::info!(?reason, "weather tool host stopped");

    Ok(())
}
