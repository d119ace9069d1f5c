//! Application layer errors

use thiserror::Error;

/// General assistant errors
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Speech-to-text and text-to-speech errors
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Missing API key")]
    MissingApiKey,

    #[error("Nothing to speak")]
    EmptyText,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: status {status}, body: {body}")]
    Api { status: u16, body: String },

    /// The body is not JSON at all
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// JSON arrived but carries no usable text
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Admin endpoint errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdminError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("no key provided")]
    NoKeyProvided,
}
