//! The weather tool host: an MCP server exposing `get_alerts` and
//! `get_forecast`.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use serde::Deserialize;
use tracing::info;

use crate::weather::{alerts_report, forecast_report, WeatherSource};

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AlertsArgs {
    #[schemars(description = "Two-letter US state code (e.g. CA, NY)")]
    pub state: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ForecastArgs {
    #[schemars(description = "Latitude of the location")]
    pub latitude: f64,
    #[schemars(description = "Longitude of the location")]
    pub longitude: f64,
}

#[derive(Clone)]
pub struct WeatherHost {
    source: Arc<dyn WeatherSource>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WeatherHost {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self {
            source,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Get weather alerts for a US state.")]
    async fn get_alerts(&self, Parameters(AlertsArgs { state }): Parameters<AlertsArgs>) -> String {
        info!(%state, "get_alerts");
        alerts_report(self.source.as_ref(), &state).await
    }

    #[tool(description = "Get weather forecast for a location.")]
    async fn get_forecast(
        &self,
        Parameters(ForecastArgs {
            latitude,
            longitude,
        }): Parameters<ForecastArgs>,
    ) -> String {
        info!(latitude, longitude, "get_forecast");
        forecast_report(self.source.as_ref(), latitude, longitude).await
    }
}

#[tool_handler]
impl ServerHandler for WeatherHost {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "weather".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Weather alerts and forecasts from the US National Weather Service.".into(),
            ),
            ..Default::default()
        }
    }
}
