//! HTTP client utilities shared by the model API and the weather data client.

use reqwest::{Client, RequestBuilder};

use crate::client::ClientError;
use crate::options::TransportOptions;

/// Build a reqwest client honoring the timeout and proxy settings.
///
/// A proxy URL reqwest cannot parse is ignored rather than failing the build.
pub fn build_http_client(transport_options: &TransportOptions) -> Result<Client, reqwest::Error> {
    let TransportOptions::Http {
        timeout,
        proxy,
        no_proxy,
        ..
    } = transport_options;

    let mut builder = Client::builder();
    if let Some(t) = timeout {
        builder = builder.timeout(*t);
    }
    if *no_proxy {
        builder = builder.no_proxy();
    } else if let Some(p) = proxy.as_deref().and_then(|url| reqwest::Proxy::all(url).ok()) {
        builder = builder.proxy(p);
    }
    builder.build()
}

/// Attach the configured per-request headers.
pub fn add_extra_headers(
    request: RequestBuilder,
    transport_options: &TransportOptions,
) -> RequestBuilder {
    let TransportOptions::Http { headers, .. } = transport_options;
    headers
        .iter()
        .fold(request, |request, (key, value)| request.header(key, value))
}

/// Extension trait for RequestBuilder that logs request body.
pub trait RequestBuilderExt {
    /// Set JSON request body and log it. Returns the RequestBuilder for chaining.
    fn json_logged<T: serde::Serialize + ?Sized>(self, json: &T) -> Self;
}

impl RequestBuilderExt for RequestBuilder {
    fn json_logged<T: serde::Serialize + ?Sized>(self, json: &T) -> Self {
        if let Ok(req_body) = serde_json::to_string_pretty(json) {
            tracing::debug!("API request body ({} bytes):\n{}", req_body.len(), req_body);
        }

        self.json(json)
    }
}

/// Extension trait for Response that logs response body.
#[async_trait::async_trait]
pub trait ResponseExt {
    /// Get response text and log it. Consumes the response.
    async fn text_logged(self) -> Result<String, reqwest::Error>;

    /// Parse response as JSON and log it. Consumes the response.
    async fn json_logged<T: serde::de::DeserializeOwned>(self) -> Result<T, ClientError>;
}

#[async_trait::async_trait]
impl ResponseExt for reqwest::Response {
    async fn text_logged(self) -> Result<String, reqwest::Error> {
        let text = self.text().await?;
        tracing::debug!("API response ({} bytes):\n{}", text.len(), text);
        Ok(text)
    }

    async fn json_logged<T: serde::de::DeserializeOwned>(self) -> Result<T, ClientError> {
        let bytes = self.bytes().await?;

        if let Ok(text) = std::str::from_utf8(&bytes) {
            tracing::debug!("API response ({} bytes):\n{}", text.len(), text);
        }

        serde_json::from_slice(&bytes).map_err(ClientError::from)
    }
}
