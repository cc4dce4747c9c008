//! The model API boundary.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{GeneralRequest, Response};
use crate::options::{ModelOptions, TransportOptions};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The provider answered, but with an error.
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// A language model reachable over some transport.
///
/// One call is one complete, non-streaming generation.
#[async_trait]
pub trait Client: Send + Sync {
    /// Options only this provider understands.
    type ModelProvider: Send + Sync;

    async fn request(&self, request: GeneralRequest) -> Result<Response, ClientError>;

    fn model_options(&self) -> &ModelOptions<Self::ModelProvider>;

    fn transport_options(&self) -> &TransportOptions;

    /// Identifier of the model requests go to.
    fn model(&self) -> &str {
        &self.model_options().model
    }
}
