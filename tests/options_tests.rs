use std::time::Duration;
use weather_mcp::client::Client;
use weather_mcp::options::{ModelOptions, TransportOptions};
use weather_mcp::providers::{Gemini, GeminiModel, Provider};

#[test]
fn test_transport_options_builder() {
    let options = TransportOptions::new()
        .with_timeout(Duration::from_secs(30))
        .with_proxy("http://proxy.example.com")
        .with_header("User-Agent", "weather-app/1.0");

    match options {
        TransportOptions::Http {
            timeout,
            proxy,
            no_proxy,
            headers,
        } => {
            assert_eq!(timeout, Some(Duration::from_secs(30)));
            assert_eq!(proxy, Some("http://proxy.example.com".to_string()));
            assert!(!no_proxy);

            assert_eq!(headers.get("User-Agent"), Some(&"weather-app/1.0".to_string()));
        }
    }
}

#[test]
fn test_model_options_new() {
    let options: ModelOptions<GeminiModel> = ModelOptions::new("gemini-2.0-flash");

    assert_eq!(options.model, "gemini-2.0-flash");
    assert_eq!(options.system, None);
    assert_eq!(options.temperature, None);
    assert_eq!(options.max_tokens, None);
}

#[test]
fn test_provider_carries_options_into_client() {
    let model_options = ModelOptions::<GeminiModel>::new("gemini-2.0-flash")
        .with_temperature(0.7)
        .with_max_tokens(512);

    let client = Gemini::create_with_options(
        "test-key".to_string(),
        model_options,
        TransportOptions::new().with_timeout(Duration::from_secs(10)),
    );

    assert_eq!(client.model_options().model, "gemini-2.0-flash");
    assert_eq!(client.model_options().temperature, Some(0.7));
    assert_eq!(client.model_options().max_tokens, Some(512));
    assert_eq!(
        client.transport_options().timeout(),
        Some(Duration::from_secs(10))
    );
}
