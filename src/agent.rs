//! Agent that routes one user query through the model and the tool host.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::client::{Client, ClientError};
use crate::mcp::{McpError, McpServer, ToolCallResult};
use crate::model::{FunctionCall, GeneralRequest, Message, Response};
use crate::tools::{find_tool, Tool};

/// Instruction closing the summarization prompt.
const SUMMARY_REQUEST: &str = "Please provide a human-friendly summary of this weather information.";

/// Errors that abort or interrupt a turn.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Mcp(#[from] McpError),
}

/// Agent that lets the model call host tools on behalf of a query.
///
/// Each [`Agent::process_query`] is one independent turn:
/// 1. Fetches the host's tool catalog
/// 2. Sends the query plus the catalog to the model at temperature 0
/// 3. Executes each function call the model returned, in order
/// 4. Asks the model, without tools, to summarize each tool result
///
/// Nothing carries over between turns.
pub struct Agent<C: Client, S: McpServer> {
    client: C,
    server: S,
}

impl<C: Client, S: McpServer> Agent<C, S> {
    pub fn new(client: C, server: S) -> Self {
        Self { client, server }
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    /// Give up the agent, keeping the session so the caller can close it.
    pub fn into_server(self) -> S {
        self.server
    }

    /// The host's current tool catalog.
    pub async fn catalog(&self) -> Result<Vec<Tool>, AgentError> {
        Ok(self.server.list_tools().await?)
    }

    /// Run one query to completion and return the answer text.
    ///
    /// Failing to reach the host or the first model call fails the turn.
    /// A failing tool call or summary is reported inline and the remaining
    /// calls still run.
    pub async fn process_query(&self, query: &str) -> Result<String, AgentError> {
        let mut final_text = Vec::new();

        let tools = self.catalog().await?;
        debug!(model = self.client.model(), "Advertising {} tools", tools.len());

        let request = GeneralRequest::new(vec![Message::user(query)])
            .with_tools(tools.clone())
            .with_temperature(0.0);
        let response = self.client.request(request).await?;
        debug!(finish = ?response.finish, "model replied");
        let mut usage = response.usage.unwrap_or_default();

        if let Some(text) = response.text() {
            final_text.push(text);
        }

        for call in response.function_calls() {
            final_text.push(format!(
                "[Calling tool {} with args {}]",
                call.name,
                call.arguments_json()
            ));

            let result = match self.execute_tool(&tools, call).await {
                Ok(result) => result,
                Err(e) => {
                    warn!("Tool {} execution failed: {}", call.name, e);
                    final_text.push(format!("Error processing tool result: {e}"));
                    continue;
                }
            };
            final_text.push(result.text.clone());

            match self.summarize(query, call, &result).await {
                Ok(summary) => {
                    usage += summary.usage.unwrap_or_default();
                    match summary.text() {
                        Some(text) => final_text.push(text),
                        None => debug!("Summary for {} came back empty", call.name),
                    }
                }
                Err(e) => {
                    warn!("Summary for {} failed: {}", call.name, e);
                    final_text.push(format!("Error processing tool result: {e}"));
                }
            }
        }

        debug!(?usage, "turn complete");
        Ok(final_text.join("\n"))
    }

    /// Run one call against the host, refusing names outside `tools`.
    async fn execute_tool(
        &self,
        tools: &[Tool],
        call: &FunctionCall,
    ) -> Result<ToolCallResult, AgentError> {
        if find_tool(tools, &call.name).is_none() {
            return Err(McpError::ToolNotFound(call.name.clone()).into());
        }

        info!("Tool call requested: {}", call.name);
        debug!("Tool arguments: {}", call.arguments_json());

        let result = self
            .server
            .call_tool(&call.name, call.arguments.clone())
            .await?;

        info!("Tool {} executed successfully", call.name);
        debug!("Tool result: {}", result.text);
        Ok(result)
    }

    /// Second, tool-free model call turning a raw result into prose.
    async fn summarize(
        &self,
        query: &str,
        call: &FunctionCall,
        result: &ToolCallResult,
    ) -> Result<Response, AgentError> {
        let prompt = summary_prompt(query, call, result);
        Ok(self
            .client
            .request(GeneralRequest::new(vec![Message::user(prompt)]))
            .await?)
    }
}

/// The follow-up prompt embedding the original query and one tool exchange.
pub fn summary_prompt(query: &str, call: &FunctionCall, result: &ToolCallResult) -> String {
    format!(
        "Original query: {query}\n\n\
         Tool used: {} with parameters {}\n\n\
         Tool result: {}\n\n\
         {SUMMARY_REQUEST}",
        call.name,
        call.arguments_json(),
        result.text,
    )
}
