//! Streaming response consumption: line reassembly, event dispatch and
//! per-request aggregation.

use std::pin::pin;

use chat_provider::{CancelSignal, ChatCallbacks, ClassifiedError, Completion, TimingsResult};
use futures_util::{Stream, StreamExt};

use crate::cancel::{await_or_cancel, is_cancelled};
use crate::events::{StreamEvent, StreamEventKind};
use crate::sse::{classify_line, decode_event, SseLine, SseLineBuffer};
use crate::usage::to_timings;

/// How a consumed stream ended.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamOutcome {
    /// The stream was exhausted; the completion callback has fired.
    Completed(Completion),
    /// The caller cancelled; no further callbacks fired.
    Cancelled,
}

/// Running state for one in-flight streamed request.
#[derive(Debug, Clone, Default)]
pub struct AggregationState {
    pub text: String,
    pub reasoning: String,
    pub last_timings: Option<TimingsResult>,
    pub model_emitted: bool,
}

impl AggregationState {
    /// Handle one complete SSE line. Malformed `data:` payloads are logged
    /// and skipped.
    pub fn process_line<C>(
        &mut self,
        line: &str,
        callbacks: &mut C,
        cancellation: Option<&CancelSignal>,
    ) where
        C: ChatCallbacks + ?Sized,
    {
        match classify_line(line) {
            SseLine::Data(payload) => match decode_event(payload) {
                Ok(event) => self.apply_event(&event, callbacks, cancellation),
                Err(error) => {
                    tracing::warn!(%error, payload, "skipping malformed stream event");
                }
            },
            SseLine::Event(name) => tracing::trace!(name, "ignoring SSE event name"),
            SseLine::Blank | SseLine::Done | SseLine::Other(_) => {}
        }
    }

    /// Dispatch one decoded event to the accumulators and callbacks.
    pub fn apply_event<C>(
        &mut self,
        event: &StreamEvent,
        callbacks: &mut C,
        cancellation: Option<&CancelSignal>,
    ) where
        C: ChatCallbacks + ?Sized,
    {
        if is_cancelled(cancellation) {
            return;
        }

        if let Some(model) = event.top_level_model() {
            self.emit_model(model, callbacks);
        }

        match event.kind() {
            StreamEventKind::OutputTextDelta => {
                let delta = event.delta.as_deref().unwrap_or_default();
                self.text.push_str(delta);
                if !delta.is_empty() {
                    callbacks.on_chunk(delta);
                }
            }
            StreamEventKind::ReasoningSummaryTextDelta => {
                let delta = event.delta.as_deref().unwrap_or_default();
                self.reasoning.push_str(delta);
                if !delta.is_empty() {
                    callbacks.on_reasoning_chunk(delta);
                }
            }
            StreamEventKind::FunctionCallArgumentsDelta => {
                if let Some(delta) = event.delta.as_deref().filter(|delta| !delta.is_empty()) {
                    callbacks.on_tool_call_chunk(delta);
                }
            }
            StreamEventKind::Completed => {
                if let Some(usage) = event.usage() {
                    let timings = to_timings(usage);
                    self.last_timings = Some(timings);
                    callbacks.on_timings(&timings);
                }
                if let Some(model) = event.response_model() {
                    self.emit_model(model, callbacks);
                }
            }
            StreamEventKind::Other => {}
        }
    }

    fn emit_model<C>(&mut self, model: &str, callbacks: &mut C)
    where
        C: ChatCallbacks + ?Sized,
    {
        if self.model_emitted {
            return;
        }
        self.model_emitted = true;
        callbacks.on_model(model);
    }

    pub fn into_completion(self) -> Completion {
        Completion {
            content: self.text,
            reasoning: (!self.reasoning.is_empty()).then_some(self.reasoning),
            timings: self.last_timings,
            tool_calls: Vec::new(),
        }
    }
}

/// Consume a streamed response body, raising callbacks as deltas arrive.
///
/// The stream is owned for the duration of the call and dropped on every exit
/// path. Cancellation is checked before each read, after each chunk and
/// before each line; once observed the function returns
/// [`StreamOutcome::Cancelled`] without firing further callbacks. Bytes after
/// the last newline when the stream ends are discarded.
pub async fn consume_stream<S, B, C>(
    stream: S,
    callbacks: &mut C,
    cancellation: Option<&CancelSignal>,
) -> Result<StreamOutcome, ClassifiedError>
where
    S: Stream<Item = Result<B, ClassifiedError>>,
    B: AsRef<[u8]>,
    C: ChatCallbacks + ?Sized,
{
    let mut stream = pin!(stream);
    let mut lines = SseLineBuffer::default();
    let mut state = AggregationState::default();

    loop {
        if is_cancelled(cancellation) {
            return Ok(StreamOutcome::Cancelled);
        }
        let Ok(next) = await_or_cancel(stream.next(), cancellation).await else {
            return Ok(StreamOutcome::Cancelled);
        };
        let Some(chunk) = next else {
            break;
        };
        let chunk = chunk?;

        if is_cancelled(cancellation) {
            return Ok(StreamOutcome::Cancelled);
        }
        for line in lines.feed(chunk.as_ref()) {
            if is_cancelled(cancellation) {
                return Ok(StreamOutcome::Cancelled);
            }
            state.process_line(&line, callbacks, cancellation);
        }
    }

    if is_cancelled(cancellation) {
        return Ok(StreamOutcome::Cancelled);
    }
    if !lines.is_empty_buffer() {
        tracing::debug!(
            bytes = lines.pending().len(),
            "discarding unterminated trailing stream data"
        );
    }

    let completion = state.into_completion();
    callbacks.on_complete(&completion);
    Ok(StreamOutcome::Completed(completion))
}

#[cfg(test)]
mod tests {
    use chat_provider::ChatCallbacks;

    use super::AggregationState;

    #[derive(Default)]
    struct Models(Vec<String>);

    impl ChatCallbacks for Models {
        fn on_model(&mut self, model: &str) {
            self.0.push(model.to_owned());
        }
    }

    #[test]
    fn empty_model_names_do_not_consume_the_single_emission() {
        let mut state = AggregationState::default();
        let mut models = Models::default();

        state.process_line(
            r#"data: {"type":"response.created","model":""}"#,
            &mut models,
            None,
        );
        state.process_line(
            r#"data: {"type":"response.created","model":"gpt-x"}"#,
            &mut models,
            None,
        );

        assert_eq!(models.0, vec!["gpt-x".to_owned()]);
    }

    #[test]
    fn completion_reports_reasoning_only_when_present() {
        let state = AggregationState {
            text: "answer".to_owned(),
            ..AggregationState::default()
        };
        let completion = state.into_completion();
        assert_eq!(completion.content, "answer");
        assert_eq!(completion.reasoning, None);
    }
}
