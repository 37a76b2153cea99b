//! Non-streaming response handling.

use chat_provider::{ChatCallbacks, ClassifiedError, Completion, ToolCall};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{invalid_body_error, no_content_error};
use crate::usage::{to_timings, Usage};

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    model: Option<Value>,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    usage: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputItem {
    Message {
        #[serde(default)]
        content: Option<Vec<Value>>,
    },
    Reasoning {
        #[serde(default)]
        content: Option<Vec<Value>>,
        #[serde(default)]
        summary: Option<Vec<Value>>,
    },
    FunctionCall {
        #[serde(default)]
        call_id: Option<String>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        arguments: Option<String>,
    },
    #[serde(other)]
    Other,
}

/// Fields extracted from a complete JSON response body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResponse {
    pub model: Option<String>,
    pub content: String,
    pub reasoning: String,
    pub usage: Option<Usage>,
    pub tool_calls: Vec<ToolCall>,
}

/// Parse a non-streaming response body.
///
/// Text comes from `output_text` parts of `message` items; reasoning from
/// `reasoning_summary_text` parts (or `summary_text` summary entries) of
/// `reasoning` items. Parts without string text and output items of an
/// unexpected shape are skipped. A blank body is reported as "no content" and
/// a body that is not JSON as a parse failure.
pub fn parse_response_body(body: &str) -> Result<ParsedResponse, ClassifiedError> {
    if body.trim().is_empty() {
        return Err(no_content_error());
    }
    let parsed: ResponseBody =
        serde_json::from_str(body).map_err(|error| invalid_body_error(&error))?;

    let mut response = ParsedResponse {
        model: parsed
            .model
            .as_ref()
            .and_then(Value::as_str)
            .filter(|model| !model.is_empty())
            .map(ToOwned::to_owned),
        usage: parsed
            .usage
            .and_then(|usage| serde_json::from_value::<Usage>(usage).ok()),
        ..ParsedResponse::default()
    };

    let items = match parsed.output {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    for item in items {
        let item = match serde_json::from_value::<OutputItem>(item) {
            Ok(item) => item,
            Err(error) => {
                tracing::debug!(%error, "skipping unusable response output item");
                continue;
            }
        };
        match item {
            OutputItem::Message { content } => {
                collect_text(&mut response.content, content.as_deref(), "output_text");
            }
            OutputItem::Reasoning { content, summary } => {
                collect_text(
                    &mut response.reasoning,
                    content.as_deref(),
                    "reasoning_summary_text",
                );
                collect_text(&mut response.reasoning, summary.as_deref(), "summary_text");
            }
            OutputItem::FunctionCall {
                call_id,
                name,
                arguments,
            } => response.tool_calls.push(ToolCall {
                call_id: call_id.unwrap_or_default(),
                name: name.unwrap_or_default(),
                arguments: arguments.unwrap_or_default(),
            }),
            OutputItem::Other => {}
        }
    }

    Ok(response)
}

/// Deliver a non-streaming body to the callbacks.
///
/// Fires `on_model` and `on_timings` when the body carries them, then
/// `on_complete` once. An empty assistant text is a "no content" error; error
/// reporting through `on_error` is left to the caller.
pub fn finish_response<C>(body: &str, callbacks: &mut C) -> Result<Completion, ClassifiedError>
where
    C: ChatCallbacks + ?Sized,
{
    let parsed = parse_response_body(body)?;
    if parsed.content.is_empty() {
        return Err(no_content_error());
    }

    if let Some(model) = parsed.model.as_deref() {
        callbacks.on_model(model);
    }
    let timings = parsed.usage.as_ref().map(to_timings);
    if let Some(timings) = &timings {
        callbacks.on_timings(timings);
    }

    let completion = Completion {
        content: parsed.content,
        reasoning: (!parsed.reasoning.is_empty()).then_some(parsed.reasoning),
        timings,
        tool_calls: parsed.tool_calls,
    };
    callbacks.on_complete(&completion);
    Ok(completion)
}

/// Append the `text` of every part whose `type` matches. Parts without string
/// text are skipped.
fn collect_text(target: &mut String, parts: Option<&[Value]>, part_type: &str) {
    for part in parts.unwrap_or_default() {
        if part.get("type").and_then(Value::as_str) != Some(part_type) {
            continue;
        }
        if let Some(text) = part.get("text").and_then(Value::as_str) {
            target.push_str(text);
        }
    }
}
