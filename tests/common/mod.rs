#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};
use weather_mcp::client::{Client, ClientError};
use weather_mcp::model::{FunctionCall, GeneralRequest, Message, Part, Response};
use weather_mcp::options::{ModelOptions, TransportOptions};
use weather_mcp::rmcp::service::{RoleClient, RunningService};
use weather_mcp::rmcp::ServiceExt;
use weather_mcp::weather::{Alert, ForecastPeriod, WeatherError, WeatherSource};
use weather_mcp::WeatherHost;

#[derive(Clone)]
pub struct MockClient {
    responses: Arc<Mutex<Vec<Response>>>,
    pub requests: Arc<Mutex<Vec<GeneralRequest>>>,
    model_options: ModelOptions<()>,
    transport_options: TransportOptions,
}

impl MockClient {
    pub fn new(responses: Vec<Response>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::new(Mutex::new(Vec::new())),
            model_options: ModelOptions::new("mock"),
            transport_options: TransportOptions::default(),
        }
    }

    pub fn requests(&self) -> Vec<GeneralRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Client for MockClient {
    type ModelProvider = ();

    async fn request(&self, request: GeneralRequest) -> Result<Response, ClientError> {
        self.requests.lock().unwrap().push(request);
        let mut responses = self.responses.lock().unwrap();
        if !responses.is_empty() {
            Ok(responses.remove(0))
        } else {
            Err(ClientError::ProviderError(
                "No more mock responses".to_string(),
            ))
        }
    }

    fn model_options(&self) -> &ModelOptions<Self::ModelProvider> {
        &self.model_options
    }

    fn transport_options(&self) -> &TransportOptions {
        &self.transport_options
    }
}

pub fn text(content: &str) -> Response {
    Response {
        data: vec![Message::assistant(content)],
        ..Default::default()
    }
}

pub fn args(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

pub fn calls(parts: Vec<Part>) -> Response {
    Response {
        data: vec![Message::Assistant(parts)],
        ..Default::default()
    }
}

pub fn call(name: &str, arguments: Value) -> Part {
    Part::FunctionCall(FunctionCall::new(name, args(arguments)))
}

pub fn prompt_of(request: &GeneralRequest) -> String {
    request
        .messages
        .iter()
        .filter_map(Message::content)
        .collect()
}

/// Deterministic stand-in for the NWS API.
pub struct FakeWeather {
    pub up: bool,
}

#[async_trait]
impl WeatherSource for FakeWeather {
    async fn active_alerts(&self, state: &str) -> Result<Vec<Alert>, WeatherError> {
        if !self.up {
            return Err(WeatherError::Parse(
                serde_json::from_str::<()>("").unwrap_err(),
            ));
        }
        Ok(vec![Alert {
            event: Some("Red Flag Warning".to_string()),
            area_desc: Some(format!("Northern {state}")),
            severity: Some("Severe".to_string()),
            description: Some("Critical fire weather.".to_string()),
            instruction: None,
        }])
    }

    async fn forecast(&self, _: f64, _: f64) -> Result<Vec<ForecastPeriod>, WeatherError> {
        if !self.up {
            return Err(WeatherError::Parse(
                serde_json::from_str::<()>("").unwrap_err(),
            ));
        }
        Ok(vec![ForecastPeriod {
            name: "Tonight".to_string(),
            temperature: Some(54.0),
            temperature_unit: "F".to_string(),
            wind_speed: "5 mph".to_string(),
            wind_direction: "S".to_string(),
            detailed_forecast: "Mostly clear.".to_string(),
        }])
    }
}

pub const SACRAMENTO_FORECAST: &str =
    "Tonight:\nTemperature: 54°F\nWind: 5 mph S\nForecast: Mostly clear.";

/// A weather host served in-process over a duplex pipe.
pub async fn weather_session(up: bool) -> RunningService<RoleClient, ()> {
    let (client_transport, server_transport) = tokio::io::duplex(4096);
    let host = WeatherHost::new(Arc::new(FakeWeather { up }));
    tokio::spawn(async move {
        let service = host
            .serve(server_transport)
            .await
            .expect("Failed to start server");
        let _ = service.waiting().await;
    });
    ().serve(client_transport)
        .await
        .expect("Failed to connect to server")
}

pub fn forecast_args() -> Value {
    json!({"latitude": 38.58, "longitude": -121.49})
}

/// Host double that records calls and answers from a fixed table.
#[derive(Default)]
pub struct RecordingHost {
    pub tools: Vec<weather_mcp::Tool>,
    pub calls: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingHost {
    pub fn with_tools(names: &[&str]) -> Self {
        Self {
            tools: names
                .iter()
                .map(|n| {
                    weather_mcp::Tool::new(
                        n.to_string(),
                        format!("{n} tool"),
                        Arc::new(args(json!({"type": "object"}))),
                    )
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl weather_mcp::McpServer for RecordingHost {
    async fn list_tools(&self) -> Result<Vec<weather_mcp::Tool>, weather_mcp::McpError> {
        Ok(self.tools.clone())
    }

    async fn call_tool(
        &self,
        name: &str,
        _arguments: Map<String, Value>,
    ) -> Result<weather_mcp::ToolCallResult, weather_mcp::McpError> {
        self.calls.lock().unwrap().push(name.to_string());
        if self.fail {
            return Err(weather_mcp::McpError::Mcp("host went away".to_string()));
        }
        Ok(weather_mcp::ToolCallResult {
            text: format!("{name} result"),
        })
    }
}
