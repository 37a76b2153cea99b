use responses_api::sse::{classify_line, decode_event, SseLine};
use responses_api::{SseLineBuffer, StreamEventKind};

#[test]
fn split_lines_drops_unterminated_tail() {
    let lines = SseLineBuffer::split_lines("event: a\ndata: {}\n\ndata: partial");
    assert_eq!(lines, vec!["event: a", "data: {}", ""]);
}

#[test]
fn feed_reassembles_line_split_across_chunks() {
    let mut buffer = SseLineBuffer::default();
    assert!(buffer
        .feed(b"data: {\"type\":\"response.output_text.delta\",\"delta\":\"ab")
        .is_empty());
    assert!(!buffer.is_empty_buffer());

    let lines = buffer.feed(b"c\"}\n\n");
    assert_eq!(
        lines,
        vec![
            "data: {\"type\":\"response.output_text.delta\",\"delta\":\"abc\"}".to_owned(),
            String::new(),
        ]
    );
    assert!(buffer.is_empty_buffer());
}

#[test]
fn feed_reassembles_multibyte_character_split_across_chunks() {
    let line = "data: {\"delta\":\"é\"}\n".as_bytes();
    let split = line
        .iter()
        .position(|byte| *byte == 0xC3)
        .expect("line contains a two-byte character")
        + 1;

    let mut buffer = SseLineBuffer::default();
    assert!(buffer.feed(&line[..split]).is_empty());
    assert_eq!(buffer.feed(&line[split..]), vec!["data: {\"delta\":\"é\"}"]);
}

#[test]
fn classify_line_ignores_event_names_and_done() {
    assert_eq!(
        classify_line("event: response.output_text.delta"),
        SseLine::Event("response.output_text.delta")
    );
    assert_eq!(classify_line("data: [DONE]"), SseLine::Done);
    assert_eq!(classify_line("data: {\"a\":1}"), SseLine::Data("{\"a\":1}"));
    assert_eq!(classify_line("id: 7"), SseLine::Other("id: 7"));
}

#[test]
fn decode_event_reads_usage_and_models() {
    let event = decode_event(
        r#"{"type":"response.completed","model":"top","response":{"model":"inner","usage":{"input_tokens":1}}}"#,
    )
    .expect("event should decode");

    assert_eq!(event.kind(), StreamEventKind::Completed);
    assert_eq!(event.top_level_model(), Some("top"));
    assert_eq!(event.response_model(), Some("inner"));
    assert_eq!(event.usage().and_then(|usage| usage.input_tokens), Some(1));
}

#[test]
fn decode_event_rejects_malformed_json() {
    assert!(decode_event("{\"type\":").is_err());
}

#[test]
fn event_kind_maps_done_alias_and_unknown_types() {
    assert_eq!(
        StreamEventKind::parse("response.done"),
        StreamEventKind::Completed
    );
    assert_eq!(
        StreamEventKind::parse("response.function_call_arguments.delta"),
        StreamEventKind::FunctionCallArgumentsDelta
    );
    assert_eq!(
        StreamEventKind::parse("response.in_progress"),
        StreamEventKind::Other
    );
}
