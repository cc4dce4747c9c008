//! US National Weather Service API client.
//! See: <https://www.weather.gov/documentation/services-web-api>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::{Alert, ForecastPeriod, WeatherError, WeatherSource};
use crate::http::{add_extra_headers, build_http_client, ResponseExt};
use crate::options::TransportOptions;

pub const NWS_API_BASE: &str = "https://api.weather.gov";
pub const USER_AGENT: &str = "weather-app/1.0";

/// Hard limit on each upstream request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the NWS GeoJSON endpoints.
#[derive(Debug, Clone)]
pub struct NwsClient {
    http: Client,
    base_url: String,
    transport_options: TransportOptions,
}

impl NwsClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, WeatherError> {
        Self::with_transport(base_url, Self::default_transport())
    }

    pub fn with_transport(
        base_url: impl Into<String>,
        transport_options: TransportOptions,
    ) -> Result<Self, WeatherError> {
        Ok(Self {
            http: build_http_client(&transport_options)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport_options,
        })
    }

    /// The headers NWS asks every client to send, with a 30 second timeout.
    pub fn default_transport() -> TransportOptions {
        TransportOptions::new()
            .with_timeout(REQUEST_TIMEOUT)
            .with_header("User-Agent", USER_AGENT)
            .with_header("Accept", "application/geo+json")
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, WeatherError> {
        debug!(url, "NWS request");
        let request = add_extra_headers(self.http.get(url), &self.transport_options);
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                url: url.to_string(),
                status,
            });
        }
        let body = response.text_logged().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WeatherSource for NwsClient {
    async fn active_alerts(&self, state: &str) -> Result<Vec<Alert>, WeatherError> {
        let code = state_code(state)?;
        let url = format!("{}/alerts/active/area/{code}", self.base_url);
        let collection: FeatureCollection<Alert> = self.get(&url).await?;
        Ok(collection.into_properties())
    }

    async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<ForecastPeriod>, WeatherError> {
        let points_url = format!("{}/points/{},{}", self.base_url, latitude, longitude);
        let point: Feature<PointProperties> = self.get(&points_url).await?;

        let forecast: Feature<ForecastProperties> =
            self.get(&point.properties.forecast).await?;
        Ok(forecast.properties.periods)
    }
}

/// Upper-cased two-letter code; anything else never reaches the URL path.
fn state_code(state: &str) -> Result<String, WeatherError> {
    let state = state.trim();
    if state.len() == 2 && state.bytes().all(|b| b.is_ascii_alphabetic()) {
        Ok(state.to_ascii_uppercase())
    } else {
        Err(WeatherError::InvalidState(state.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct Feature<T> {
    properties: T,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection<T> {
    #[serde(default = "Vec::new")]
    features: Vec<Feature<T>>,
}

impl<T> FeatureCollection<T> {
    fn into_properties(self) -> Vec<T> {
        self.features.into_iter().map(|f| f.properties).collect()
    }
}

#[derive(Debug, Deserialize)]
struct PointProperties {
    forecast: String,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    #[serde(default)]
    periods: Vec<ForecastPeriod>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::{alerts_report, forecast_report, ALERTS_UNAVAILABLE, FORECAST_UNAVAILABLE};
    use serde_json::json;
    use wiremock::matchers::{any, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> NwsClient {
        NwsClient::with_transport(server.uri(), NwsClient::default_transport().with_no_proxy())
            .unwrap()
    }

    #[tokio::test]
    async fn alerts_use_upper_case_state_and_nws_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/alerts/active/area/CA"))
            .and(header("User-Agent", USER_AGENT))
            .and(header("Accept", "application/geo+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "features": [{
                    "properties": {
                        "event": "Wind Advisory",
                        "areaDesc": "Sacramento Valley",
                        "severity": "Moderate",
                        "description": "Gusts to 45 mph.",
                        "instruction": "Secure outdoor objects."
                    }
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let alerts = client(&mock_server).active_alerts("ca").await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].event.as_deref(), Some("Wind Advisory"));
        assert_eq!(alerts[0].area_desc.as_deref(), Some("Sacramento Valley"));
    }

    #[tokio::test]
    async fn forecast_follows_the_points_link() {
        let mock_server = MockServer::start().await;
        let forecast_url = format!("{}/gridpoints/STO/41,64/forecast", mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/points/38.58,-121.49"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": {"forecast": forecast_url}
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/gridpoints/STO/41,64/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": {
                    "periods": [{
                        "name": "Tonight",
                        "temperature": 54,
                        "temperatureUnit": "F",
                        "windSpeed": "5 mph",
                        "windDirection": "S",
                        "detailedForecast": "Mostly clear."
                    }]
                }
            })))
            .mount(&mock_server)
            .await;

        let periods = client(&mock_server).forecast(38.58, -121.49).await.unwrap();
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].name, "Tonight");
        assert_eq!(periods[0].temperature, Some(54.0));
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let err = client(&mock_server).forecast(0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, WeatherError::Status { status, .. } if status == 404));
    }

    #[tokio::test]
    async fn malformed_state_never_hits_the_network() {
        let mock_server = MockServer::start().await;

        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"features": []})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let nws = client(&mock_server);
        for state in ["CA/../x", "C", "CAL", "1A", ""] {
            let err = nws.active_alerts(state).await.unwrap_err();
            assert!(matches!(err, WeatherError::InvalidState(_)), "{state:?}");
        }
        assert_eq!(alerts_report(&nws, "CA/../x").await, ALERTS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn slow_upstream_times_out_into_fallback_text() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"properties": {"forecast": "unused"}}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let nws = NwsClient::with_transport(
            mock_server.uri(),
            NwsClient::default_transport()
                .with_no_proxy()
                .with_timeout(Duration::from_millis(200)),
        )
        .unwrap();

        let err = nws.forecast(38.58, -121.49).await.unwrap_err();
        assert!(matches!(&err, WeatherError::Http(e) if e.is_timeout()), "{err}");
        assert_eq!(
            forecast_report(&nws, 38.58, -121.49).await,
            FORECAST_UNAVAILABLE
        );
    }
}
