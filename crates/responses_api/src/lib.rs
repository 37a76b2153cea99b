//! Streaming transport for OpenAI-style Responses API servers.
//!
//! This crate turns caller messages into a `/v1/responses` request, consumes
//! the event stream (or single JSON body) it returns, and reports progress
//! through [`chat_provider::ChatCallbacks`]. Every failure reaches callers as
//! a [`chat_provider::ClassifiedError`]. It contains no retry policy,
//! credential issuance, or persistence.

pub mod cancel;
pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod events;
pub mod headers;
pub mod payload;
pub mod response;
pub mod sse;
pub mod stream;
pub mod url;
pub mod usage;

pub use client::{settle, ResponsesClient};
pub use config::ResponsesConfig;
pub use convert::to_wire_messages;
pub use events::{StreamEvent, StreamEventKind};
pub use payload::{
    build_request_body, ChatOptions, CustomParams, ResponsesRequest, WireContent,
    WireContentPart, WireMessage,
};
pub use response::{finish_response, parse_response_body, ParsedResponse};
pub use sse::SseLineBuffer;
pub use stream::{consume_stream, AggregationState, StreamOutcome};
pub use url::normalize_responses_url;
pub use usage::{to_timings, Usage};
