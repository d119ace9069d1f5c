//! Message parser - Parses raw request payloads into structured messages

use std::collections::HashMap;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::domain::entities::Message;

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").unwrap());

/// An uploaded file from a multipart request
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub field: String,
    pub filename: String,
    pub data: Vec<u8>,
}

/// Transport-neutral request body: form or JSON fields plus uploaded files
#[derive(Debug, Clone, Default)]
pub struct Payload {
    pub fields: HashMap<String, String>,
    pub files: Vec<Upload>,
}

impl Payload {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn file(&self, field: &str) -> Option<&Upload> {
        self.files.iter().find(|f| f.field == field)
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_file(mut self, field: impl Into<String>, filename: impl Into<String>, data: Vec<u8>) -> Self {
        self.files.push(Upload {
            field: field.into(),
            filename: filename.into(),
            data,
        });
        self
    }
}

/// Make a client-supplied file name safe to store.
///
/// The name is NFKD-decomposed so accented letters keep their base
/// letter, then the remaining non-ASCII is dropped. Path separators become spaces,
/// whitespace runs become `_`, anything outside `[A-Za-z0-9_.-]` is
/// removed and leading/trailing `.`/`_` are stripped.
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = UNSAFE_CHARS.replace_all(&joined, "");

    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Whether `name` carries one of the `allowed` extensions
pub fn allowed_file(name: &str, allowed: &[String]) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_lowercase();
            allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext))
        }
        None => false,
    }
}

/// Parses incoming payloads into Message objects
pub struct MessageParser {
    allowed_extensions: Vec<String>,
}

impl MessageParser {
    pub fn new(allowed_extensions: Vec<String>) -> Self {
        Self { allowed_extensions }
    }

    /// Audio wins over text; `None` means the request carries nothing usable
    pub fn parse(&self, client: impl Into<String>, payload: Payload) -> Option<Message> {
        let client = client.into();

        if let Some(upload) = payload.file("audio") {
            if allowed_file(&upload.filename, &self.allowed_extensions) {
                return Some(Message::from_audio(
                    client,
                    self.storage_name(&upload.filename),
                    upload.data.clone(),
                ));
            }
            tracing::debug!("Ignoring upload with disallowed name: {}", upload.filename);
        }

        match payload.field("text") {
            Some(text) if !text.is_empty() => Some(Message::from_text(client, text)),
            _ => None,
        }
    }

    fn storage_name(&self, filename: &str) -> String {
        let safe = secure_filename(filename);
        if allowed_file(&safe, &self.allowed_extensions) {
            return safe;
        }

        let ext = filename
            .rsplit_once('.')
            .map(|(_, e)| e.to_lowercase())
            .unwrap_or_default();
        format!("{}.{}", uuid::Uuid::new_v4().simple(), ext)
    }
}
