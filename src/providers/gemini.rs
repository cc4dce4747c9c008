//! Gemini provider implementation.

use crate::options::{ModelOptions, TransportOptions};
use crate::providers::Provider;

pub use crate::api::gemini::{GeminiClient, GeminiModel};

/// Public Gemini API endpoint.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct Gemini;

impl Gemini {
    /// Create a client against a non-default endpoint (proxies, test servers).
    pub fn create_with_base_url(
        api_key: String,
        base_url: String,
        model_options: ModelOptions<GeminiModel>,
        transport_options: TransportOptions,
    ) -> GeminiClient {
        GeminiClient::new(api_key, base_url, model_options, transport_options)
    }
}

impl Provider for Gemini {
    type Client = GeminiClient;

    fn create(api_key: String, model: String) -> Self::Client {
        Self::create_with_options(
            api_key,
            ModelOptions::new(model),
            TransportOptions::default(),
        )
    }

    fn create_with_options(
        api_key: String,
        model_options: ModelOptions<GeminiModel>,
        transport_options: TransportOptions,
    ) -> Self::Client {
        Self::create_with_base_url(
            api_key,
            GEMINI_BASE_URL.to_string(),
            model_options,
            transport_options,
        )
    }
}
