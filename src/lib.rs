//! # weather-mcp
//!
//! A weather tool host and a tool-calling LLM client, connected through the
//! Model Context Protocol.
//!
//! ## Architecture
//!
//! - **Host** (`weather-server`): an MCP server registering `get_alerts` and
//!   `get_forecast`, backed by the US National Weather Service API.
//! - **Client** (`weather-client`): spawns the host, then for each query
//!   advertises the host's tools to Gemini, runs any function call the
//!   model asks for, and has the model summarize the result.
//!
//! ### Core Types
//!
//! - **`Client`**: Trait for making requests to LLM providers.
//! - **`McpServer`**: What the agent needs from a tool host session.
//! - **`Agent`**: One query in, one answer out, tools in between.
//! - **`WeatherHost`**: The MCP server handler.
//! - **`WeatherSource`**: Upstream weather data behind the host's tools.
//!
//! ## Example
//! ```no_run
//! use weather_mcp::config::ClientConfig;
//! use weather_mcp::providers::{Gemini, Provider};
//! use weather_mcp::{mcp, Agent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let client = Gemini::create(config.api_key.clone(), config.model.clone());
//!     let session = mcp::connect(&config.host).await?;
//!
//!     let agent = Agent::new(client, session);
//!     let answer = agent.process_query("What's the weather in Sacramento, CA?").await?;
//!     println!("{answer}");
//!
//!     mcp::disconnect(agent.into_server()).await;
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod api;
pub mod client;
pub mod config;
pub mod host;
pub mod http;
pub mod mcp;
pub mod model;
pub mod options;
pub mod providers;
pub mod repl;
pub mod tools;
pub mod weather;

pub use agent::{Agent, AgentError};
pub use client::{Client, ClientError};
pub use host::WeatherHost;
pub use mcp::{McpError, McpServer, ToolCallResult};
pub use model::{FunctionCall, GeneralRequest, Message, Part, Response};
pub use tools::Tool;
pub use weather::{NwsClient, WeatherSource};

// Re-export rmcp for convenience
pub use rmcp;
