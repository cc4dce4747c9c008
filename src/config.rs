//! Process configuration, read from the environment once at startup.
//!
//! Everything downstream receives these structs explicitly; nothing else in
//! the crate reads environment variables.

use std::path::PathBuf;

use thiserror::Error;

use crate::providers::gemini::GEMINI_BASE_URL;
use crate::weather::NWS_API_BASE;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// How to launch the tool host as a child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCommand {
    pub command: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl HostCommand {
    /// `cargo run --quiet --bin weather-server`, run from `working_dir`.
    pub fn cargo_run(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: "cargo".to_string(),
            args: ["run", "--quiet", "--bin", "weather-server"]
                .map(String::from)
                .to_vec(),
            working_dir: working_dir.into(),
        }
    }

    /// Split a whitespace-separated command line into program and arguments.
    pub fn parse(
        name: &'static str,
        line: &str,
        working_dir: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let mut words = line.split_whitespace().map(String::from);
        let command = words.next().ok_or(ConfigError::Invalid {
            name,
            reason: "empty command".to_string(),
        })?;
        Ok(Self {
            command,
            args: words.collect(),
            working_dir: working_dir.into(),
        })
    }
}

/// Settings for the interactive client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub host: HostCommand,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("GEMINI_API_KEY").ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;
        let model = get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = get("GEMINI_API_BASE").unwrap_or_else(|| GEMINI_BASE_URL.to_string());
        let working_dir = get("MCP_SERVER_PATH").unwrap_or_else(|| ".".to_string());

        let host = match get("MCP_SERVER_COMMAND") {
            Some(line) => HostCommand::parse("MCP_SERVER_COMMAND", &line, working_dir)?,
            None => HostCommand::cargo_run(working_dir),
        };

        Ok(Self {
            api_key,
            model,
            base_url,
            host,
        })
    }
}

/// Settings for the tool host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub nws_base_url: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            nws_base_url: NWS_API_BASE.to_string(),
        }
    }
}

impl HostConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup("NWS_API_BASE").filter(|v| !v.trim().is_empty()) {
            Some(nws_base_url) => Self { nws_base_url },
            None => Self::default(),
        }
    }
}
