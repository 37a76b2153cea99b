use chat_provider::{
    ApiContent, ApiContentPart, ApiMessage, Attachment, ChatMessage, ClassifiedError,
    ConversationRecord, ErrorKind, Role, ToolCall,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn api_message_deserializes_typed_parts() {
    let message: ApiMessage = serde_json::from_value(json!({
        "role": "user",
        "content": [
            {"type": "text", "text": "look"},
            {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}},
            {"type": "input_audio", "input_audio": {"data": "UklG", "format": "wav"}},
            {"type": "file", "file": {"file_id": "f-1"}}
        ]
    }))
    .expect("api message should deserialize");

    let ApiContent::Parts(parts) = message.content else {
        panic!("expected part sequence");
    };
    assert_eq!(parts.len(), 4);
    assert_eq!(
        parts[0],
        ApiContentPart::Text {
            text: "look".to_owned()
        }
    );
    assert!(matches!(&parts[1], ApiContentPart::ImageUrl { image_url } if image_url.url.starts_with("data:image/png")));
    assert!(matches!(&parts[2], ApiContentPart::InputAudio { input_audio } if input_audio.format == "wav"));
    assert_eq!(parts[3], ApiContentPart::Unsupported);
}

#[test]
fn api_message_deserializes_bare_string_content() {
    let message: ApiMessage =
        serde_json::from_value(json!({"role": "system", "content": "be brief"}))
            .expect("api message should deserialize");
    assert_eq!(message, ApiMessage::text("system", "be brief"));
}

#[test]
fn api_part_with_missing_payload_deserializes_best_effort() {
    let part: ApiContentPart = serde_json::from_value(json!({"type": "image_url"}))
        .expect("missing payload should default");
    assert!(matches!(part, ApiContentPart::ImageUrl { image_url } if image_url.url.is_empty()));
}

#[test]
fn conversation_record_round_trips_with_attachments() {
    let record = ConversationRecord::new(Role::User, "see attached").with_attachment(
        Attachment::Pdf {
            name: "paper.pdf".to_owned(),
            content: "abstract".to_owned(),
            page_images: vec!["data:image/png;base64,AA".to_owned()],
        },
    );

    let value = serde_json::to_value(&record).expect("serialize record");
    assert_eq!(value["role"], "user");
    assert_eq!(value["attachments"][0]["type"], "pdf");
    assert_eq!(record.attachments[0].name(), "paper.pdf");

    let chat: ChatMessage = record.clone().into();
    assert_eq!(chat, ChatMessage::Record(record));
}

#[test]
fn classified_error_flags_server_rejection_only_for_http_400() {
    let rejected = ClassifiedError::http(400, "invalid model");
    let unavailable = ClassifiedError::http(503, "overloaded");

    assert_eq!(rejected.kind(), ErrorKind::Http);
    assert!(rejected.is_server_rejection());
    assert!(!unavailable.is_server_rejection());
    assert_eq!(unavailable.status(), Some(503));
    assert_eq!(rejected.to_string(), "invalid model");
}

#[test]
fn aborted_error_is_distinguishable() {
    let aborted = ClassifiedError::aborted();
    assert!(aborted.is_aborted());
    assert!(!ClassifiedError::network("down").is_aborted());
    assert_eq!(aborted.kind().to_string(), "aborted");
}

#[test]
fn tool_call_arguments_parse_when_json() {
    let call = ToolCall {
        call_id: "call-1".to_owned(),
        name: "read".to_owned(),
        arguments: r#"{"path":"README.md"}"#.to_owned(),
    };
    assert_eq!(call.arguments_json(), Some(json!({"path": "README.md"})));

    let broken = ToolCall {
        arguments: "{\"path\":".to_owned(),
        ..call
    };
    assert_eq!(broken.arguments_json(), None);
}
