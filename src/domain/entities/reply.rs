use serde::{Deserialize, Serialize};

/// Bot response returned to the client.
///
/// `voice` is a URL path to the synthesized answer. It is absent for
/// transcription replies and empty when synthesis failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: None,
        }
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcription_reply_omits_voice() {
        let json = serde_json::to_value(Reply::text("hello")).unwrap();
        assert_eq!(json, serde_json::json!({"text": "hello"}));
    }

    #[test]
    fn test_failed_synthesis_keeps_empty_voice() {
        let json = serde_json::to_value(Reply::text("hi").with_voice("")).unwrap();
        assert_eq!(json, serde_json::json!({"text": "hi", "voice": ""}));
    }
}
