//! Console adapter for terminal use

use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::application::errors::AssistantError;
use crate::application::services::ChatService;
use crate::domain::entities::Reply;

const HELP: &str = "Type a farming question and press enter.\n/help - Show this message\n/version - Show version\n/quit - Exit";

/// Line commands understood by the REPL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Help,
    Version,
    Quit,
    Unknown(String),
}

impl ConsoleCommand {
    /// `None` for lines that are questions rather than commands
    pub fn parse(line: &str) -> Option<Self> {
        let name = line.strip_prefix('/')?.split_whitespace().next().unwrap_or("");
        Some(match name.to_lowercase().as_str() {
            "help" => Self::Help,
            "version" => Self::Version,
            "quit" | "exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        })
    }
}

/// Console adapter for asking questions without a browser
pub struct ConsoleAdapter {
    chat: Arc<ChatService>,
}

impl ConsoleAdapter {
    pub fn new(chat: Arc<ChatService>) -> Self {
        Self { chat }
    }

    /// One question; with `voice` the answer is also synthesized
    pub async fn ask(&self, question: &str, voice: bool) -> Reply {
        if voice {
            self.chat.process_text(question).await
        } else {
            Reply::text(self.chat.answer(question).await)
        }
    }

    pub async fn transcribe_file(&self, path: &Path) -> Result<String, AssistantError> {
        let audio = tokio::fs::read(path)
            .await
            .map_err(|e| AssistantError::Internal(format!("Failed to read {}: {}", path.display(), e)))?;
        Ok(self.chat.transcribe(&audio).await)
    }

    /// Read questions line by line until EOF or /quit
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<(), AssistantError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!("Starting console chat");
        let mut lines = input.lines();

        loop {
            write_out(&mut output, "> ").await?;

            let Some(line) = lines.next_line().await.map_err(io_error)? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match ConsoleCommand::parse(line) {
                Some(ConsoleCommand::Quit) => break,
                Some(ConsoleCommand::Help) => HELP.to_string(),
                Some(ConsoleCommand::Version) => format!("agri-assistant v{}", env!("CARGO_PKG_VERSION")),
                Some(ConsoleCommand::Unknown(name)) => format!("Unknown command: /{}", name),
                None => self.chat.answer(line).await,
            };

            write_out(&mut output, &format!("[BOT] {}\n", response)).await?;
        }

        Ok(())
    }
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<(), AssistantError> {
    output.write_all(text.as_bytes()).await.map_err(io_error)?;
    output.flush().await.map_err(io_error)
}

fn io_error(e: std::io::Error) -> AssistantError {
    AssistantError::Internal(format!("Console IO error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::application::errors::SpeechError;
    use crate::application::services::ChatSettings;
    use crate::domain::traits::Transcriber;
    use crate::infrastructure::llm::{LLMMessage, LLMResponse, LLMResult, LLM};
    use crate::infrastructure::storage::AudioStore;

    struct EchoLLM;

    #[async_trait]
    impl LLM for EchoLLM {
        fn name(&self) -> &str {
            "echo"
        }

        async fn chat(
            &self,
            messages: Vec<LLMMessage>,
            _model: Option<&str>,
            _temperature: Option<f32>,
            _max_tokens: Option<u32>,
        ) -> LLMResult<LLMResponse> {
            let question = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            Ok(LLMResponse {
                content: format!("answer to {}", question),
                model: "echo".to_string(),
                usage: None,
                finish_reason: None,
            })
        }
    }

    struct NoTranscriber;

    #[async_trait]
    impl Transcriber for NoTranscriber {
        fn name(&self) -> &str {
            "none"
        }

        async fn transcribe(&self, _audio: &[u8]) -> Result<String, SpeechError> {
            Err(SpeechError::MissingApiKey)
        }
    }

    fn adapter(dir: &tempfile::TempDir) -> ConsoleAdapter {
        let chat = ChatService::new(
            Arc::new(EchoLLM),
            Arc::new(NoTranscriber),
            AudioStore::new(dir.path().join("u"), dir.path().join("a")),
            ChatSettings {
                system_prompt: "farm".to_string(),
                temperature: None,
                max_tokens: None,
                voice_url_base: "/static/audio".to_string(),
            },
        );
        ConsoleAdapter::new(Arc::new(chat))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ConsoleCommand::parse("/help"), Some(ConsoleCommand::Help));
        assert_eq!(ConsoleCommand::parse("/EXIT"), Some(ConsoleCommand::Quit));
        assert_eq!(ConsoleCommand::parse("/foo bar"), Some(ConsoleCommand::Unknown("foo".to_string())));
        assert_eq!(ConsoleCommand::parse("how much urea?"), None);
    }

    #[tokio::test]
    async fn test_repl_answers_until_quit() {
        let dir = tempfile::tempdir().unwrap();
        let input: &[u8] = b"what is mulch?\n\n/quit\nnever asked\n";
        let mut output = Vec::new();

        adapter(&dir).run(input, &mut output).await.unwrap();

        let out = String::from_utf8(output).unwrap();
        assert!(out.contains("[BOT] answer to what is mulch?"));
        assert!(!out.contains("never asked"));
    }

    #[tokio::test]
    async fn test_ask_without_voice() {
        let dir = tempfile::tempdir().unwrap();
        let reply = adapter(&dir).ask("drip irrigation?", false).await;
        assert_eq!(reply, Reply::text("answer to drip irrigation?"));
    }

    #[tokio::test]
    async fn test_transcribe_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = adapter(&dir).transcribe_file(&dir.path().join("missing.webm")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_transcribe_without_key() {
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("clip.webm");
        std::fs::write(&clip, b"webm").unwrap();
        let text = adapter(&dir).transcribe_file(&clip).await.unwrap();
        assert_eq!(text, "Transcription service not configured.");
    }
}
