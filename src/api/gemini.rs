//! Gemini `generateContent` client.
//!
//! Function calling only: text and function-call parts go out, text and
//! function-call parts come back. Everything else the API can return is
//! dropped while converting into [`Response`].
//! See: <https://ai.google.dev/api/generate-content>

use async_trait::async_trait;
use nonempty::NonEmpty;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;
use tracing::debug;

use crate::client::{Client, ClientError};
use crate::http::{add_extra_headers, build_http_client, RequestBuilderExt, ResponseExt};
use crate::model::{FinishReason, FunctionCall, GeneralRequest, Message, Part, Response, Usage};
use crate::options::{ModelOptions, TransportOptions};
use crate::tools::{strip_reserved_keys, Tool};

/// Gemini-only sampling knobs.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeminiModel {
    pub top_k: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model_options: ModelOptions<GeminiModel>,
    transport_options: TransportOptions,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model_options: ModelOptions<GeminiModel>,
        transport_options: TransportOptions,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model_options,
            transport_options,
        }
    }

    fn endpoint(&self) -> Result<String, ClientError> {
        let model = self.model_options.model.trim();
        if model.is_empty() {
            return Err(ClientError::Config("Model must be specified".to_string()));
        }
        Ok(format!(
            "{}/v1beta/models/{model}:generateContent",
            self.base_url
        ))
    }
}

/// Turn a non-2xx reply into a provider error, preferring the API's own message.
fn error_from_body(status: StatusCode, body: &str) -> ClientError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error }) => format!("Gemini error ({}): {}", error.code, error.message),
        Err(_) => format!("HTTP {status}: {body}"),
    };
    ClientError::ProviderError(message)
}

#[async_trait]
impl Client for GeminiClient {
    type ModelProvider = GeminiModel;

    async fn request(&self, request: GeneralRequest) -> Result<Response, ClientError> {
        let url = self.endpoint()?;
        let body = GeminiRequest::new(request, &self.model_options);
        debug!(
            %url,
            tools = body.tools.as_ref().map_or(0, |t| t[0].function_declarations.len()),
            "Gemini request"
        );

        let http = build_http_client(&self.transport_options)?;
        let request = http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header("x-goog-api-key", &self.api_key);
        let response = add_extra_headers(request, &self.transport_options)
            .json_logged(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text_logged().await.unwrap_or_default();
            return Err(error_from_body(status, &body));
        }

        let reply: GeminiResponse = response.json_logged().await?;
        Ok(reply.into())
    }

    fn model_options(&self) -> &ModelOptions<Self::ModelProvider> {
        &self.model_options
    }

    fn transport_options(&self) -> &TransportOptions {
        &self.transport_options
    }
}

// Outgoing

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
    tools: Option<[ToolSet; 1]>,
}

impl GeminiRequest {
    fn new(request: GeneralRequest, options: &ModelOptions<GeminiModel>) -> Self {
        let mut system: Vec<WirePart> = options.system.iter().cloned().map(WirePart::text).collect();
        let mut contents = Vec::with_capacity(request.messages.len());
        for message in request.messages {
            match message {
                Message::System(parts) => system.extend(parts.iter().map(WirePart::from)),
                other => contents.push(Content::from(&other)),
            }
        }

        let tools = (!request.tools.is_empty()).then(|| {
            [ToolSet {
                function_declarations: request.tools.iter().map(FunctionDeclaration::from).collect(),
            }]
        });

        Self {
            contents,
            system_instruction: (!system.is_empty()).then_some(Content {
                role: None,
                parts: system,
            }),
            generation_config: GenerationConfig {
                temperature: request.temperature.or(options.temperature),
                top_p: options.top_p,
                top_k: options.provider.top_k,
                max_output_tokens: options.max_tokens,
            },
            tools,
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: Option<f32>,
    top_p: Option<f32>,
    top_k: Option<u32>,
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolSet {
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct FunctionDeclaration {
    name: String,
    description: String,
    parameters: Value,
}

impl From<&Tool> for FunctionDeclaration {
    fn from(tool: &Tool) -> Self {
        Self {
            name: tool.name.to_string(),
            description: tool.description.as_deref().unwrap_or_default().to_string(),
            parameters: Value::Object(strip_reserved_keys(&tool.input_schema)),
        }
    }
}

// Shared by both directions

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize)]
struct Content {
    role: Option<Role>,
    #[serde(default)]
    parts: Vec<WirePart>,
}

impl From<&Message> for Content {
    fn from(message: &Message) -> Self {
        let role = match message {
            Message::Assistant(_) => Role::Model,
            Message::User(_) | Message::System(_) => Role::User,
        };
        Self {
            role: Some(role),
            parts: message.parts().iter().map(WirePart::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Role {
    User,
    Model,
}

/// One element of `parts`. Gemini distinguishes them by which field is
/// present, so this is untagged; unrecognised shapes land in `Other`.
#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
enum WirePart {
    Text {
        text: String,
        thought: Option<bool>,
    },
    FunctionCall {
        function_call: WireCall,
        thought_signature: Option<String>,
    },
    Other(Value),
}

#[derive(Debug, Serialize, Deserialize)]
struct WireCall {
    name: String,
    #[serde(default)]
    args: Value,
}

impl WirePart {
    fn text(text: String) -> Self {
        WirePart::Text {
            text,
            thought: None,
        }
    }

    /// The model-level part, or `None` for thoughts and unsupported parts.
    fn into_part(self) -> Option<Part> {
        match self {
            WirePart::Text {
                thought: Some(true),
                ..
            } => None,
            WirePart::Text { text, .. } => Some(Part::Text(text)),
            WirePart::FunctionCall { function_call, .. } => {
                let arguments = match function_call.args {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };
                Some(Part::FunctionCall(FunctionCall::new(
                    function_call.name,
                    arguments,
                )))
            }
            WirePart::Other(value) => {
                debug!(%value, "Ignoring unsupported Gemini part");
                None
            }
        }
    }
}

impl From<&Part> for WirePart {
    fn from(part: &Part) -> Self {
        match part {
            Part::Text(text) => WirePart::text(text.clone()),
            Part::FunctionCall(call) => WirePart::FunctionCall {
                function_call: WireCall {
                    name: call.name.clone(),
                    args: Value::Object(call.arguments.clone()),
                },
                thought_signature: None,
            },
        }
    }
}

// Incoming

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: NonEmpty<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    thoughts_token_count: u32,
}

/// Map Gemini's `finishReason` string onto the provider-neutral reason.
fn finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("MAX_TOKENS") => FinishReason::OutputTokens,
        Some("SAFETY" | "RECITATION" | "LANGUAGE" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII") => {
            FinishReason::ContentFilter
        }
        Some("MALFORMED_FUNCTION_CALL" | "UNEXPECTED_TOOL_CALL" | "TOO_MANY_TOOL_CALLS") => {
            FinishReason::ToolCalls
        }
        _ => FinishReason::Stop,
    }
}

impl From<GeminiResponse> for Response {
    fn from(reply: GeminiResponse) -> Self {
        let candidate = reply.candidates.head;
        let finish = finish_reason(candidate.finish_reason.as_deref());
        let parts = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(WirePart::into_part)
            .collect();

        Response {
            data: vec![Message::Assistant(parts)],
            usage: reply.usage_metadata.map(|u| Usage {
                prompt_tokens: Some(u.prompt_token_count),
                completion_tokens: Some(u.candidates_token_count + u.thoughts_token_count),
            }),
            finish,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: u32,
    message: String,
}
