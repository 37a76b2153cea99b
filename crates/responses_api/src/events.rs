use serde::Deserialize;

use crate::usage::Usage;

/// Event types the stream parser acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEventKind {
    OutputTextDelta,
    ReasoningSummaryTextDelta,
    FunctionCallArgumentsDelta,
    /// `response.completed` and its `response.done` alias.
    Completed,
    /// Any other event type; only its `model` field is consulted.
    Other,
}

impl StreamEventKind {
    pub fn parse(value: &str) -> Self {
        match value {
            "response.output_text.delta" => Self::OutputTextDelta,
            "response.reasoning_summary_text.delta" => Self::ReasoningSummaryTextDelta,
            "response.function_call_arguments.delta" => Self::FunctionCallArgumentsDelta,
            "response.completed" | "response.done" => Self::Completed,
            _ => Self::Other,
        }
    }
}

/// Decoded form of one SSE `data:` payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamEvent {
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default)]
    pub delta: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub response: Option<ResponseEnvelope>,
}

/// The `response` object carried by lifecycle events.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl StreamEvent {
    pub fn kind(&self) -> StreamEventKind {
        StreamEventKind::parse(&self.event_type)
    }

    /// Non-empty model name from the `response` object.
    pub fn response_model(&self) -> Option<&str> {
        self.response
            .as_ref()
            .and_then(|response| response.model.as_deref())
            .filter(|model| !model.is_empty())
    }

    /// Non-empty top-level model name.
    pub fn top_level_model(&self) -> Option<&str> {
        self.model.as_deref().filter(|model| !model.is_empty())
    }

    pub fn usage(&self) -> Option<&Usage> {
        self.response
            .as_ref()
            .and_then(|response| response.usage.as_ref())
    }
}
