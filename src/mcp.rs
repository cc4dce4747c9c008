//! Client side of the tool-host session.
//!
//! The host runs as a child process speaking MCP over stdio. The
//! [`McpServer`] trait is what the agent sees of it; any rmcp client
//! session implements it.

use async_trait::async_trait;
use itertools::Itertools;
use rmcp::model::{CallToolRequestParam, RawContent, Tool};
use rmcp::service::{RoleClient, RunningService};
use rmcp::transport::{ConfigureCommandExt, TokioChildProcess};
use rmcp::{ClientHandler, ServiceExt};
use serde_json::{Map, Value};
use std::ops::Deref;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::HostCommand;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("failed to start tool host: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("session handshake failed: {0}")]
    Handshake(String),
    #[error("MCP error: {0}")]
    Mcp(String),
    #[error("tool not found: {0}")]
    ToolNotFound(String),
    #[error("tool failed: {0}")]
    ToolFailed(String),
}

/// Text a tool produced for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallResult {
    pub text: String,
}

/// Operations the agent needs from a tool host.
#[async_trait]
pub trait McpServer: Send + Sync {
    /// The host's current tool catalog.
    async fn list_tools(&self) -> Result<Vec<Tool>, McpError>;

    /// Execute a tool.
    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolCallResult, McpError>;
}

#[async_trait]
impl<S: ClientHandler + Send + Sync> McpServer for RunningService<RoleClient, S> {
    async fn list_tools(&self) -> Result<Vec<Tool>, McpError> {
        self.deref()
            .list_all_tools()
            .await
            .map_err(|e| McpError::Mcp(e.to_string()))
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolCallResult, McpError> {
        let params = CallToolRequestParam {
            name: name.to_string().into(),
            arguments: Some(arguments),
        };

        let result = self
            .deref()
            .call_tool(params)
            .await
            .map_err(|e| McpError::Mcp(e.to_string()))?;

        let mut text = result
            .content
            .into_iter()
            .filter_map(|content| match content.raw {
                RawContent::Text(text_content) => Some(text_content.text),
                _ => None,
            })
            .join("\n");

        if text.is_empty() {
            if let Some(structured) = result.structured_content {
                text = structured.to_string();
            }
        }

        if result.is_error.unwrap_or(false) {
            return Err(McpError::ToolFailed(text));
        }

        Ok(ToolCallResult { text })
    }
}

/// Launch the tool host and complete the session handshake.
pub async fn connect(host: &HostCommand) -> Result<RunningService<RoleClient, ()>, McpError> {
    info!(command = %host.command, args = ?host.args, dir = %host.working_dir.display(), "starting tool host");

    let transport = TokioChildProcess::new(Command::new(&host.command).configure(|cmd| {
        cmd.args(&host.args).current_dir(&host.working_dir);
    }))?;

    let service = ()
        .serve(transport)
        .await
        .map_err(|e| McpError::Handshake(e.to_string()))?;

    debug!("tool host session established");
    Ok(service)
}

/// End the session and reap the host process.
pub async fn disconnect<S: ClientHandler>(service: RunningService<RoleClient, S>) {
    match service.cancel().await {
        Ok(reason) => debug!(?reason, "tool host session closed"),
        Err(e) => warn!(error = %e, "tool host session did not shut down cleanly"),
    }
}
