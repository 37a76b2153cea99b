//! Backend-agnostic contract between chat callers and streaming transports.
//!
//! This crate defines only the shapes a caller hands to a transport
//! (conversation records, API-shaped messages, cancellation) and the shapes a
//! transport hands back (callbacks, timings, classified errors). It contains
//! no HTTP, wire encoding, or persistence code.

use std::sync::{atomic::AtomicBool, Arc};

pub mod callbacks;
pub mod error;
pub mod record;

pub use callbacks::{ChatCallbacks, Completion, TimingsResult, ToolCall};
pub use error::{ClassifiedError, ErrorKind};
pub use record::{
    ApiAudio, ApiContent, ApiContentPart, ApiImageUrl, ApiMessage, Attachment, ChatMessage,
    ConversationRecord, Role,
};

/// Shared cancellation flag for one in-flight request.
///
/// Setting the flag is advisory: transports observe it at their suspension
/// points and stop without reporting an error.
pub type CancelSignal = Arc<AtomicBool>;

/// Creates a fresh, unset cancellation flag.
#[must_use]
pub fn cancel_signal() -> CancelSignal {
    Arc::new(AtomicBool::new(false))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::{cancel_signal, ChatCallbacks, ClassifiedError, Completion, TimingsResult};

    #[derive(Default)]
    struct ChunkOnly {
        chunks: Vec<String>,
    }

    impl ChatCallbacks for ChunkOnly {
        fn on_chunk(&mut self, text: &str) {
            self.chunks.push(text.to_owned());
        }
    }

    #[test]
    fn cancel_signal_starts_unset() {
        let signal = cancel_signal();
        assert!(!signal.load(Ordering::Acquire));
        signal.store(true, Ordering::Release);
        assert!(signal.load(Ordering::Acquire));
    }

    #[test]
    fn unimplemented_callbacks_are_no_ops() {
        let mut callbacks = ChunkOnly::default();
        callbacks.on_reasoning_chunk("thinking");
        callbacks.on_model("model-a");
        callbacks.on_timings(&TimingsResult::default());
        callbacks.on_complete(&Completion::default());
        callbacks.on_error(&ClassifiedError::unknown("boom"));
        callbacks.on_chunk("hello");

        assert_eq!(callbacks.chunks, vec!["hello".to_owned()]);
    }

    #[test]
    fn unit_callbacks_accept_every_event() {
        let mut callbacks = ();
        callbacks.on_chunk("a");
        callbacks.on_tool_call_chunk("{\"x\":");
        callbacks.on_error(&ClassifiedError::aborted());
    }
}
