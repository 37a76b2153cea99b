use chat_provider::{ChatMessage, ClassifiedError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::convert::to_wire_messages;

pub const DEFAULT_REASONING_EFFORT: &str = "medium";

/// One entry of the request `input` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: WireContent,
}

/// Bare text when the source had no attachments, a part sequence otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireContent {
    Text(String),
    Parts(Vec<WireContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireContentPart {
    InputText { text: String },
    InputImage { image_url: String },
    InputAudio { input_audio: WireAudio },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireAudio {
    pub data: String,
    pub format: String,
}

/// Caller-supplied JSON merged over the computed request body.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomParams {
    /// JSON object text, typically straight from a settings field.
    Json(String),
    Object(Map<String, Value>),
}

impl CustomParams {
    /// Resolve to an object. Blank text resolves to nothing; text that is not
    /// a JSON object is logged and ignored.
    pub fn to_object(&self) -> Option<Map<String, Value>> {
        match self {
            Self::Object(map) => Some(map.clone()),
            Self::Json(text) if text.trim().is_empty() => None,
            Self::Json(text) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => Some(map),
                Ok(other) => {
                    tracing::warn!(
                        kind = json_type_name(&other),
                        "ignoring custom request parameters that are not a JSON object"
                    );
                    None
                }
                Err(error) => {
                    tracing::warn!(%error, "ignoring unparseable custom request parameters");
                    None
                }
            },
        }
    }
}

/// Per-request generation options.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOptions {
    pub model: Option<String>,
    /// Default: true.
    pub stream: bool,
    /// Sent as `max_output_tokens` only when non-zero.
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    /// Default: `medium`.
    pub reasoning_effort: String,
    /// Omits the `reasoning` block entirely.
    pub disable_reasoning: bool,
    pub custom: Option<CustomParams>,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            model: None,
            stream: true,
            max_tokens: None,
            temperature: None,
            top_p: None,
            reasoning_effort: DEFAULT_REASONING_EFFORT.to_owned(),
            disable_reasoning: false,
            custom: None,
        }
    }
}

impl ChatOptions {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_reasoning_effort(mut self, effort: impl Into<String>) -> Self {
        self.reasoning_effort = effort.into();
        self
    }

    pub fn without_reasoning(mut self) -> Self {
        self.disable_reasoning = true;
        self
    }

    pub fn with_custom(mut self, custom: CustomParams) -> Self {
        self.custom = Some(custom);
        self
    }
}

/// Canonical request payload shape for the responses endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub input: Vec<WireMessage>,
    /// Default: true.
    #[serde(default = "default_true")]
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<ResponsesReasoning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_cache_key: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsesReasoning {
    pub effort: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl ResponsesRequest {
    pub fn new(input: Vec<WireMessage>) -> Self {
        Self {
            model: None,
            input,
            stream: true,
            max_output_tokens: None,
            temperature: None,
            top_p: None,
            reasoning: None,
            prompt_cache_key: None,
        }
    }

    /// Apply generation options on top of the given input.
    pub fn from_options(
        input: Vec<WireMessage>,
        options: &ChatOptions,
        conversation_id: Option<&str>,
    ) -> Self {
        let mut request = Self::new(input);
        request.model = options
            .model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .map(ToOwned::to_owned);
        request.stream = options.stream;
        request.max_output_tokens = options.max_tokens.filter(|limit| *limit > 0);
        request.temperature = options.temperature;
        request.top_p = options.top_p;
        if !options.disable_reasoning {
            let effort = options.reasoning_effort.trim();
            request.reasoning = Some(ResponsesReasoning {
                effort: if effort.is_empty() {
                    DEFAULT_REASONING_EFFORT.to_owned()
                } else {
                    effort.to_owned()
                },
                summary: Some("auto".to_owned()),
            });
        }
        request.prompt_cache_key = conversation_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ToOwned::to_owned);
        request
    }
}

/// Build the JSON request body, merging custom parameters last so they
/// override computed fields.
pub fn build_request_body(
    messages: &[ChatMessage],
    options: &ChatOptions,
    conversation_id: Option<&str>,
) -> Result<Value, ClassifiedError> {
    let request =
        ResponsesRequest::from_options(to_wire_messages(messages), options, conversation_id);
    let mut body = serde_json::to_value(&request).map_err(|error| {
        ClassifiedError::unknown(format!("failed to serialize request body: {error}"))
    })?;

    if let (Some(custom), Value::Object(fields)) = (
        options.custom.as_ref().and_then(CustomParams::to_object),
        &mut body,
    ) {
        fields.extend(custom);
    }

    Ok(body)
}

/// Effective `stream` flag of a built body; defaults to true.
pub fn is_streaming_body(body: &Value) -> bool {
    body.get("stream").and_then(Value::as_bool).unwrap_or(true)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
