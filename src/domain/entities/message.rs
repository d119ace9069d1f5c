use chrono::{DateTime, Utc};

/// Message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// A typed question
    Text(String),
    /// A recorded voice clip, already sanitized and extension-checked
    Audio { filename: String, data: Vec<u8> },
}

impl Content {
    pub fn kind(&self) -> &'static str {
        match self {
            Content::Text(_) => "text",
            Content::Audio { .. } => "audio",
        }
    }
}

/// A single request from a farmer, either typed or spoken
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub client: String,
    pub content: Content,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(client: impl Into<String>, content: Content) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            client: client.into(),
            content,
            timestamp: Utc::now(),
        }
    }

    pub fn from_text(client: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(client, Content::Text(text.into()))
    }

    pub fn from_audio(client: impl Into<String>, filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self::new(client, Content::Audio { filename: filename.into(), data })
    }
}
