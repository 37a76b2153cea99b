use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClassifiedError;

/// Normalized token counters for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingsResult {
    /// Prompt tokens consumed.
    pub prompt_n: u64,
    /// Tokens generated.
    pub predicted_n: u64,
    /// Prompt tokens served from cache.
    pub cache_n: u64,
}

/// Function call requested by the model in a non-streaming response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub call_id: String,
    pub name: String,
    /// Raw argument text as sent by the backend; usually a JSON document.
    pub arguments: String,
}

impl ToolCall {
    /// Parses the argument text as JSON, if it is valid JSON.
    #[must_use]
    pub fn arguments_json(&self) -> Option<Value> {
        serde_json::from_str(&self.arguments).ok()
    }
}

/// Final result handed to [`ChatCallbacks::on_complete`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Full assistant text.
    pub content: String,
    /// Full reasoning summary text; `None` when the backend produced none.
    pub reasoning: Option<String>,
    /// Last usage counters seen for the request.
    pub timings: Option<TimingsResult>,
    pub tool_calls: Vec<ToolCall>,
}

/// Per-request observer for transport progress.
///
/// Every method defaults to a no-op so callers implement only what they
/// render. Within one request the transport invokes these serially, and
/// invokes none of them once the request's cancellation flag is set.
pub trait ChatCallbacks {
    /// Incremental assistant text. Receives exactly the delta, never the
    /// cumulative text.
    fn on_chunk(&mut self, _text: &str) {}

    /// Incremental reasoning summary text.
    fn on_reasoning_chunk(&mut self, _text: &str) {}

    /// Raw fragment of streamed function-call arguments.
    fn on_tool_call_chunk(&mut self, _text: &str) {}

    /// Model identity reported by the backend. Fires at most once per request.
    fn on_model(&mut self, _model: &str) {}

    /// Usage counters, whenever the backend reports them.
    fn on_timings(&mut self, _timings: &TimingsResult) {}

    /// Fires once when a request finishes successfully.
    fn on_complete(&mut self, _completion: &Completion) {}

    /// Fires once when a request fails. Never fires for cancellation.
    fn on_error(&mut self, _error: &ClassifiedError) {}
}

impl ChatCallbacks for () {}

impl<T: ChatCallbacks + ?Sized> ChatCallbacks for &mut T {
    fn on_chunk(&mut self, text: &str) {
        (**self).on_chunk(text);
    }

    fn on_reasoning_chunk(&mut self, text: &str) {
        (**self).on_reasoning_chunk(text);
    }

    fn on_tool_call_chunk(&mut self, text: &str) {
        (**self).on_tool_call_chunk(text);
    }

    fn on_model(&mut self, model: &str) {
        (**self).on_model(model);
    }

    fn on_timings(&mut self, timings: &TimingsResult) {
        (**self).on_timings(timings);
    }

    fn on_complete(&mut self, completion: &Completion) {
        (**self).on_complete(completion);
    }

    fn on_error(&mut self, error: &ClassifiedError) {
        (**self).on_error(error);
    }
}
