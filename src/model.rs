//! Provider-agnostic request and response types.
//!
//! Model output is resolved once, at the API boundary, into a list of [`Part`]s.
//! A part is either free text or a structured [`FunctionCall`]; nothing
//! downstream inspects provider payloads.

use std::ops::AddAssign;

use rmcp::model::Tool;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A structured call emitted by the model: a tool name plus its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Arguments rendered as a compact JSON object.
    pub fn arguments_json(&self) -> String {
        Value::Object(self.arguments.clone()).to_string()
    }
}

/// A single segment of message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Part {
    Text(String),
    FunctionCall(FunctionCall),
}

impl Part {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

/// A message in a conversation, tagged by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    User(Vec<Part>),
    Assistant(Vec<Part>),
    System(Vec<Part>),
}

impl Message {
    /// Create a user message holding a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self::User(vec![Part::text(text)])
    }

    /// Create an assistant message holding a single text part.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::Assistant(vec![Part::text(text)])
    }

    pub fn parts(&self) -> &[Part] {
        match self {
            Message::User(parts) | Message::Assistant(parts) | Message::System(parts) => parts,
        }
    }

    /// Concatenated text parts, or `None` if the message carries no text.
    pub fn content(&self) -> Option<String> {
        let text: String = self
            .parts()
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::FunctionCall(_) => None,
            })
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

/// One model invocation: conversation, advertised tools and sampling overrides.
#[derive(Debug, Clone, Default)]
pub struct GeneralRequest {
    pub messages: Vec<Message>,
    pub tools: Vec<Tool>,
    /// Overrides the client's configured temperature for this request only.
    pub temperature: Option<f32>,
}

impl GeneralRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinishReason {
    #[default]
    Stop,
    OutputTokens,
    ContentFilter,
    ToolCalls,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
}

impl AddAssign for Usage {
    fn add_assign(&mut self, rhs: Self) {
        fn add(a: Option<u32>, b: Option<u32>) -> Option<u32> {
            match (a, b) {
                (None, None) => None,
                (a, b) => Some(a.unwrap_or_default() + b.unwrap_or_default()),
            }
        }
        self.prompt_tokens = add(self.prompt_tokens, rhs.prompt_tokens);
        self.completion_tokens = add(self.completion_tokens, rhs.completion_tokens);
    }
}

/// A model reply.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub data: Vec<Message>,
    pub usage: Option<Usage>,
    pub finish: FinishReason,
}

impl Response {
    /// All text the model produced, or `None` when it only emitted calls.
    pub fn text(&self) -> Option<String> {
        let text: String = self.data.iter().filter_map(Message::content).collect();
        (!text.is_empty()).then_some(text)
    }

    /// Structured calls in the order the model returned them.
    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        self.data
            .iter()
            .flat_map(|m| m.parts())
            .filter_map(|p| match p {
                Part::FunctionCall(call) => Some(call),
                Part::Text(_) => None,
            })
            .collect()
    }
}
