//! Model and transport settings shared by every HTTP-backed client.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::HashMap;
use std::time::Duration;

/// Sampling and identity settings for one model, plus anything specific to
/// its provider in `T`.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelOptions<T> {
    /// Model identifier, e.g. `gemini-2.0-flash`.
    pub model: String,
    pub system: Option<String>,
    /// Used when a request does not set its own temperature.
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
    pub provider: T,
}

impl<T: Default> ModelOptions<T> {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            temperature: None,
            top_p: None,
            max_tokens: None,
            provider: T::default(),
        }
    }
}

impl<T> ModelOptions<T> {
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// How requests leave the process.
#[derive(Debug, Clone)]
pub enum TransportOptions {
    Http {
        /// Whole-request timeout; `None` keeps reqwest's default.
        timeout: Option<Duration>,
        proxy: Option<String>,
        /// Skip proxies picked up from the environment.
        no_proxy: bool,
        /// Sent with every request.
        headers: HashMap<String, String>,
    },
}

impl Default for TransportOptions {
    fn default() -> Self {
        TransportOptions::Http {
            timeout: None,
            proxy: None,
            no_proxy: false,
            headers: HashMap::new(),
        }
    }
}

impl TransportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self {
            TransportOptions::Http { timeout, .. } => *timeout,
        }
    }

    pub fn with_timeout(mut self, duration: Duration) -> Self {
        let TransportOptions::Http { timeout, .. } = &mut self;
        *timeout = Some(duration);
        self
    }

    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        let TransportOptions::Http { proxy, .. } = &mut self;
        *proxy = Some(proxy_url.into());
        self
    }

    pub fn with_no_proxy(mut self) -> Self {
        let TransportOptions::Http { no_proxy, .. } = &mut self;
        *no_proxy = true;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let TransportOptions::Http { headers, .. } = &mut self;
        headers.insert(key.into(), value.into());
        self
    }
}
