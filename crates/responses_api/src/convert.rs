//! Conversion of caller messages into Responses API `input` entries.

use chat_provider::{
    ApiContent, ApiContentPart, ApiMessage, Attachment, ChatMessage, ConversationRecord, Role,
};

use crate::payload::{WireAudio, WireContent, WireContentPart, WireMessage};

const DEVELOPER_ROLE: &str = "developer";

/// Convert caller messages into wire messages, in order.
///
/// Developer turns whose content is a blank bare string are dropped, so the
/// output never has more entries than the input.
pub fn to_wire_messages(messages: &[ChatMessage]) -> Vec<WireMessage> {
    messages
        .iter()
        .map(|message| match message {
            ChatMessage::Record(record) => record_to_wire(record),
            ChatMessage::Api(message) => api_message_to_wire(message),
        })
        .filter(|message| !is_empty_developer_turn(message))
        .collect()
}

/// Convert one persisted conversation record.
pub fn record_to_wire(record: &ConversationRecord) -> WireMessage {
    let role = wire_role(record.role.as_str());
    if record.attachments.is_empty() {
        return WireMessage {
            role,
            content: WireContent::Text(record.content.clone()),
        };
    }

    let mut parts = Vec::new();
    if !record.content.is_empty() {
        parts.push(WireContentPart::InputText {
            text: record.content.clone(),
        });
    }
    for attachment in &record.attachments {
        push_attachment_parts(&mut parts, attachment);
    }

    WireMessage {
        role,
        content: WireContent::Parts(parts),
    }
}

/// Convert one message that is already shaped like a chat-completions entry.
pub fn api_message_to_wire(message: &ApiMessage) -> WireMessage {
    let content = match &message.content {
        ApiContent::Text(text) => WireContent::Text(text.clone()),
        ApiContent::Parts(parts) => {
            WireContent::Parts(parts.iter().filter_map(api_part_to_wire).collect())
        }
    };
    WireMessage {
        role: wire_role(&message.role),
        content,
    }
}

/// Audio format hint understood by the backend: `wav` or `mp3`.
pub fn audio_format(mime_type: &str) -> &'static str {
    if mime_type.contains("wav") {
        "wav"
    } else {
        "mp3"
    }
}

fn wire_role(role: &str) -> String {
    if role == Role::System.as_str() {
        DEVELOPER_ROLE.to_owned()
    } else {
        role.to_owned()
    }
}

fn is_empty_developer_turn(message: &WireMessage) -> bool {
    message.role == DEVELOPER_ROLE
        && matches!(&message.content, WireContent::Text(text) if text.trim().is_empty())
}

fn push_attachment_parts(parts: &mut Vec<WireContentPart>, attachment: &Attachment) {
    match attachment {
        Attachment::Image { url, .. } => parts.push(WireContentPart::InputImage {
            image_url: url.clone(),
        }),
        Attachment::Audio {
            mime_type, data, ..
        } => parts.push(WireContentPart::InputAudio {
            input_audio: WireAudio {
                data: data.clone(),
                format: audio_format(mime_type).to_owned(),
            },
        }),
        Attachment::TextFile { name, content } | Attachment::LegacyContext { name, content } => {
            parts.push(WireContentPart::InputText {
                text: format!("--- File: {name} ---\n{content}"),
            })
        }
        Attachment::Pdf {
            name,
            content,
            page_images,
        } => {
            if page_images.is_empty() {
                parts.push(WireContentPart::InputText {
                    text: format!("--- PDF File: {name} ---\n{content}"),
                });
            } else {
                parts.extend(
                    page_images
                        .iter()
                        .map(|image| WireContentPart::InputImage {
                            image_url: image.clone(),
                        }),
                );
            }
        }
    }
}

fn api_part_to_wire(part: &ApiContentPart) -> Option<WireContentPart> {
    match part {
        ApiContentPart::Text { text } => Some(WireContentPart::InputText { text: text.clone() }),
        ApiContentPart::ImageUrl { image_url } => Some(WireContentPart::InputImage {
            image_url: image_url.url.clone(),
        }),
        ApiContentPart::InputAudio { input_audio } => Some(WireContentPart::InputAudio {
            input_audio: WireAudio {
                data: input_audio.data.clone(),
                format: input_audio.format.clone(),
            },
        }),
        ApiContentPart::Unsupported => None,
    }
}
