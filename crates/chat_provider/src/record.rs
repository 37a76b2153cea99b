use serde::{Deserialize, Serialize};

/// Author of one conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

/// Typed payload attached to a conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Attachment {
    Image {
        name: String,
        /// Data URL or remote URL of the image.
        url: String,
    },
    Audio {
        name: String,
        mime_type: String,
        /// Base64 encoded audio bytes.
        data: String,
    },
    TextFile {
        name: String,
        content: String,
    },
    Pdf {
        name: String,
        /// Extracted text, used when no page images were rendered.
        content: String,
        /// Pre-rendered page images as data URLs.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        page_images: Vec<String>,
    },
    /// Free-form context pasted into older conversations.
    LegacyContext {
        name: String,
        content: String,
    },
}

impl Attachment {
    pub fn name(&self) -> &str {
        match self {
            Self::Image { name, .. }
            | Self::Audio { name, .. }
            | Self::TextFile { name, .. }
            | Self::Pdf { name, .. }
            | Self::LegacyContext { name, .. } => name,
        }
    }
}

/// One persisted conversation turn, read-only to transports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl ConversationRecord {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Message already shaped like a chat-completions request entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub role: String,
    pub content: ApiContent,
}

impl ApiMessage {
    #[must_use]
    pub fn text(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: ApiContent::Text(text.into()),
        }
    }

    #[must_use]
    pub fn parts(role: impl Into<String>, parts: Vec<ApiContentPart>) -> Self {
        Self {
            role: role.into(),
            content: ApiContent::Parts(parts),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiContent {
    Text(String),
    Parts(Vec<ApiContentPart>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApiContentPart {
    Text {
        #[serde(default)]
        text: String,
    },
    ImageUrl {
        #[serde(default)]
        image_url: ApiImageUrl,
    },
    InputAudio {
        #[serde(default)]
        input_audio: ApiAudio,
    },
    /// Any part type this contract does not model.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiImageUrl {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiAudio {
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub format: String,
}

/// Either input shape a caller may hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatMessage {
    Record(ConversationRecord),
    Api(ApiMessage),
}

impl From<ConversationRecord> for ChatMessage {
    fn from(record: ConversationRecord) -> Self {
        Self::Record(record)
    }
}

impl From<ApiMessage> for ChatMessage {
    fn from(message: ApiMessage) -> Self {
        Self::Api(message)
    }
}
