use crate::events::StreamEvent;

/// Incremental splitter for newline-delimited SSE text.
///
/// Bytes are buffered until a `\n` arrives, so a line split across network
/// chunks (including inside a multi-byte UTF-8 sequence) is only decoded once
/// it is complete.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    buffer: Vec<u8>,
}

impl SseLineBuffer {
    /// Feed arbitrary bytes and drain every line completed by them.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let Some(last_newline) = self.buffer.iter().rposition(|byte| *byte == b'\n') else {
            return Vec::new();
        };
        let partial = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, partial);

        complete[..last_newline]
            .split(|byte| *byte == b'\n')
            .map(|line| {
                let line = line.strip_suffix(b"\r").unwrap_or(line);
                String::from_utf8_lossy(line).into_owned()
            })
            .collect()
    }

    /// Split a complete SSE body in one shot. A trailing unterminated line is
    /// not returned.
    pub fn split_lines(input: &str) -> Vec<String> {
        let mut buffer = Self::default();
        buffer.feed(input.as_bytes())
    }

    /// Bytes received after the last newline.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    pub fn is_empty_buffer(&self) -> bool {
        self.buffer.iter().all(u8::is_ascii_whitespace)
    }
}

/// One classified SSE line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// Frame separator.
    Blank,
    /// `event: <name>`; the name is informational only.
    Event(&'a str),
    /// `data: <payload>` other than `[DONE]`.
    Data(&'a str),
    /// `data: [DONE]`.
    Done,
    /// Comments, `id:`, `retry:` and anything else.
    Other(&'a str),
}

/// Classify a single line. The space after the field colon is optional.
pub fn classify_line(line: &str) -> SseLine<'_> {
    if line.trim().is_empty() {
        return SseLine::Blank;
    }
    if let Some(name) = strip_field(line, "event:") {
        return SseLine::Event(name);
    }
    if let Some(payload) = strip_field(line, "data:") {
        if payload.trim() == "[DONE]" {
            return SseLine::Done;
        }
        return SseLine::Data(payload);
    }
    SseLine::Other(line)
}

/// Decode a `data:` payload into a stream event.
pub fn decode_event(payload: &str) -> Result<StreamEvent, serde_json::Error> {
    serde_json::from_str(payload)
}

fn strip_field<'a>(line: &'a str, field: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(field)?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

#[cfg(test)]
mod tests {
    use super::{classify_line, SseLine, SseLineBuffer};

    #[test]
    fn feed_keeps_partial_line_until_newline() {
        let mut buffer = SseLineBuffer::default();

        assert!(buffer.feed(b"data: {\"type\":\"x\"").is_empty());
        assert_eq!(buffer.feed(b"}\n"), vec!["data: {\"type\":\"x\"}".to_owned()]);
        assert!(buffer.is_empty_buffer());
    }

    #[test]
    fn classify_line_recognizes_done_marker() {
        assert_eq!(classify_line("data: [DONE]"), SseLine::Done);
        assert_eq!(classify_line("data:{}"), SseLine::Data("{}"));
        assert_eq!(
            classify_line("event: response.created"),
            SseLine::Event("response.created")
        );
        assert_eq!(classify_line(""), SseLine::Blank);
        assert_eq!(classify_line(": keepalive"), SseLine::Other(": keepalive"));
    }
}
