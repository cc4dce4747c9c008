//! Interactive client: Gemini plus the weather tool host.

use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;
use weather_mcp::config::ClientConfig;
use weather_mcp::options::{ModelOptions, TransportOptions};
use weather_mcp::providers::Gemini;
use weather_mcp::repl::chat_loop;
use weather_mcp::tools::tool_names;
use weather_mcp::{mcp, Agent};

/// Conventional exit status after SIGINT.
const INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env()?;
    let client = Gemini::create_with_base_url(
        config.api_key.clone(),
        config.base_url.clone(),
        ModelOptions::new(config.model.clone()),
        TransportOptions::default(),
    );

    let session = mcp::connect(&config.host).await?;
    let agent = Agent::new(client, session);

    let tools = match agent.catalog().await {
        Ok(tools) => tools,
        Err(e) => {
            mcp::disconnect(agent.into_server()).await;
            return Err(e.into());
        }
    };
    println!("\nConnected to server with tools: {:?}", tool_names(&tools));

    let stdin = BufReader::new(tokio::io::stdin());
    // `None` means the user interrupted the process.
    let outcome = tokio::select! {
        result = chat_loop(&agent, stdin, tokio::io::stdout()) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    mcp::disconnect(agent.into_server()).await;

    match outcome {
        Some(result) => result?,
        // A blocked stdin read would otherwise hold the runtime open.
        None => std::process::exit(INTERRUPTED),
    }
    Ok(())
}
