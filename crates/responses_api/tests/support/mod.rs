#![allow(dead_code)]

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use chat_provider::{ChatCallbacks, ClassifiedError, Completion, TimingsResult};
use futures_util::{stream, FutureExt, Stream};

/// One observed callback invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Chunk(String),
    Reasoning(String),
    ToolCall(String),
    Model(String),
    Timings(TimingsResult),
    Complete(Completion),
    Error(ClassifiedError),
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
}

impl Recorder {
    pub fn chunks(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Chunk(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn models(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Model(model) => Some(model.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn completions(&self) -> Vec<Completion> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Complete(completion) => Some(completion.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<ClassifiedError> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Error(error) => Some(error.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ChatCallbacks for Recorder {
    fn on_chunk(&mut self, text: &str) {
        self.calls.push(Call::Chunk(text.to_owned()));
    }

    fn on_reasoning_chunk(&mut self, text: &str) {
        self.calls.push(Call::Reasoning(text.to_owned()));
    }

    fn on_tool_call_chunk(&mut self, text: &str) {
        self.calls.push(Call::ToolCall(text.to_owned()));
    }

    fn on_model(&mut self, model: &str) {
        self.calls.push(Call::Model(model.to_owned()));
    }

    fn on_timings(&mut self, timings: &TimingsResult) {
        self.calls.push(Call::Timings(*timings));
    }

    fn on_complete(&mut self, completion: &Completion) {
        self.calls.push(Call::Complete(completion.clone()));
    }

    fn on_error(&mut self, error: &ClassifiedError) {
        self.calls.push(Call::Error(error.clone()));
    }
}

/// Render `data:` frames the way a Responses server does, each preceded by
/// its `event:` line.
pub fn sse_body(frames: &[&str]) -> String {
    let mut body = String::new();
    for frame in frames {
        let event_type = serde_json::from_str::<serde_json::Value>(frame)
            .ok()
            .and_then(|value| value["type"].as_str().map(ToOwned::to_owned))
            .unwrap_or_else(|| "message".to_owned());
        body.push_str("event: ");
        body.push_str(&event_type);
        body.push('\n');
        body.push_str("data: ");
        body.push_str(frame);
        body.push_str("\n\n");
    }
    body
}

pub type ChunkResult = Result<Vec<u8>, ClassifiedError>;

/// Stream yielding `bytes` cut at the given ascending offsets.
pub fn split_stream(bytes: &[u8], cuts: &[usize]) -> impl Stream<Item = ChunkResult> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for &cut in cuts {
        let cut = cut.clamp(start, bytes.len());
        chunks.push(Ok(bytes[start..cut].to_vec()));
        start = cut;
    }
    chunks.push(Ok(bytes[start..].to_vec()));
    stream::iter(chunks)
}

/// Stream yielding the given results in order.
pub fn results_stream(results: Vec<ChunkResult>) -> impl Stream<Item = ChunkResult> {
    stream::iter(results)
}

/// Run a future whose inputs are all immediately ready.
pub fn run_ready<F: std::future::Future>(future: F) -> F::Output {
    future
        .now_or_never()
        .expect("future over ready chunks should not wait")
}

/// Stream wrapper that records when it is dropped.
pub struct TrackedStream<S> {
    inner: S,
    dropped: Arc<AtomicBool>,
}

impl<S> TrackedStream<S> {
    pub fn new(inner: S) -> (Self, Arc<AtomicBool>) {
        let dropped = Arc::new(AtomicBool::new(false));
        (
            Self {
                inner,
                dropped: Arc::clone(&dropped),
            },
            dropped,
        )
    }
}

impl<S: Stream + Unpin> Stream for TrackedStream<S> {
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl<S> Drop for TrackedStream<S> {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::Release);
    }
}

pub fn was_dropped(flag: &Arc<AtomicBool>) -> bool {
    flag.load(Ordering::Acquire)
}
