//! Weather data for the tool host: the upstream source abstraction and the
//! text reports handed back to the model.
//!
//! Reports never fail. Upstream errors are logged and replaced by a fixed
//! fallback message so a caller always gets text for a call it made.

use async_trait::async_trait;
use itertools::Itertools;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

pub mod nws;

pub use nws::{NwsClient, NWS_API_BASE};

pub const ALERTS_UNAVAILABLE: &str = "Unable to fetch alerts or no alerts found.";
pub const NO_ACTIVE_ALERTS: &str = "No active alerts for this state.";
pub const FORECAST_UNAVAILABLE: &str = "Unable to fetch forecast data for this location.";

/// Number of forecast periods included in a report.
pub const FORECAST_PERIODS: usize = 5;

const SEPARATOR: &str = "\n---\n";

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("not a two-letter state code: {0:?}")]
    InvalidState(String),
}

/// Properties of an active weather alert.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub event: Option<String>,
    pub area_desc: Option<String>,
    pub severity: Option<String>,
    pub description: Option<String>,
    pub instruction: Option<String>,
}

/// One named period of a gridpoint forecast ("Tonight", "Tuesday", ...).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub name: String,
    pub temperature: Option<f64>,
    #[serde(default)]
    pub temperature_unit: String,
    #[serde(default)]
    pub wind_speed: String,
    #[serde(default)]
    pub wind_direction: String,
    #[serde(default)]
    pub detailed_forecast: String,
}

/// Upstream provider of alert and forecast data.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Active alerts for a two-letter US state code.
    async fn active_alerts(&self, state: &str) -> Result<Vec<Alert>, WeatherError>;

    /// Forecast periods for a coordinate, nearest first.
    async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<ForecastPeriod>, WeatherError>;
}

impl Alert {
    pub fn render(&self) -> String {
        let or_unknown = |v: &Option<String>| v.clone().unwrap_or_else(|| "Unknown".to_string());
        format!(
            "Event: {}\nArea: {}\nSeverity: {}\nDescription: {}\nInstructions: {}",
            or_unknown(&self.event),
            or_unknown(&self.area_desc),
            or_unknown(&self.severity),
            self.description
                .as_deref()
                .unwrap_or("No description available"),
            self.instruction
                .as_deref()
                .unwrap_or("No specific instructions provided"),
        )
    }
}

impl ForecastPeriod {
    pub fn render(&self) -> String {
        let temperature = self
            .temperature
            .map(|t| t.to_string())
            .unwrap_or_else(|| "Unknown".to_string());
        format!(
            "{}:\nTemperature: {}°{}\nWind: {} {}\nForecast: {}",
            self.name,
            temperature,
            self.temperature_unit,
            self.wind_speed,
            self.wind_direction,
            self.detailed_forecast,
        )
    }
}

/// Text report of active alerts for `state`.
pub async fn alerts_report(source: &dyn WeatherSource, state: &str) -> String {
    match source.active_alerts(state).await {
        Ok(alerts) if alerts.is_empty() => NO_ACTIVE_ALERTS.to_string(),
        Ok(alerts) => alerts.iter().map(Alert::render).join(SEPARATOR),
        Err(e) => {
            warn!(state, error = %e, "alert fetch failed");
            ALERTS_UNAVAILABLE.to_string()
        }
    }
}

/// Text report of the next few forecast periods at a coordinate.
pub async fn forecast_report(source: &dyn WeatherSource, latitude: f64, longitude: f64) -> String {
    match source.forecast(latitude, longitude).await {
        Ok(periods) if periods.is_empty() => FORECAST_UNAVAILABLE.to_string(),
        Ok(periods) => periods
            .iter()
            .take(FORECAST_PERIODS)
            .map(ForecastPeriod::render)
            .join(SEPARATOR),
        Err(e) => {
            warn!(latitude, longitude, error = %e, "forecast fetch failed");
            FORECAST_UNAVAILABLE.to_string()
        }
    }
}
