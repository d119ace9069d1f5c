//! Provider integration tests against mocked upstream APIs
//! Run with: cargo test --test provider_http_test

use httpmock::prelude::*;
use serde_json::json;

use agri_assistant::application::errors::SpeechError;
use agri_assistant::application::services::chat_service::{friendly_speech_error, TRANSCRIPTION_FAILED_REPLY};
use agri_assistant::domain::traits::{Synthesizer, Transcriber};
use agri_assistant::infrastructure::llm::{LLMError, LLMMessage, OpenAIProvider, LLM};
use agri_assistant::infrastructure::speech::{GoogleTts, HuggingFaceTranscriber};
use agri_assistant::infrastructure::storage::KeyStore;

fn provider(server: &MockServer, key: &str) -> OpenAIProvider {
    OpenAIProvider::new(KeyStore::new(Some(key.to_string())), None)
        .with_base_url(server.url("/v1"))
}

fn ask() -> Vec<LLMMessage> {
    vec![
        LLMMessage::system("I want you to act like a helpful agriculture chatbot"),
        LLMMessage::user("How often should I water tomatoes?"),
    ]
}

#[tokio::test]
async fn test_openai_chat_success() {
    let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer sk-test")
            .json_body_partial(r#"{"model": "gpt-3.5-turbo"}"#);
        then.status(200).json_body(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": "gpt-3.5-turbo-0125",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Water deeply twice a week."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 20, "completion_tokens": 6, "total_tokens": 26}
        }));
    }).await;

    let response = provider(&server, "sk-test")
        .chat(ask(), None, None, None)
        .await
        .expect("chat should succeed");

    mock.assert_async().await;
    assert_eq!(response.content, "Water deeply twice a week.");
    assert_eq!(response.model, "gpt-3.5-turbo-0125");
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    assert_eq!(response.usage.and_then(|u| u.total_tokens), Some(26));
}

#[tokio::test]
async fn test_openai_unauthorized() {
    let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(401).json_body(json!({"error": {"message": "Incorrect API key provided"}}));
    }).await;

    let err = provider(&server, "sk-bad").chat(ask(), None, None, None).await.unwrap_err();
    assert!(matches!(err, LLMError::Unauthorized(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_openai_rate_limited() {
    let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(429);
    }).await;

    let err = provider(&server, "sk").chat(ask(), None, None, None).await.unwrap_err();
    assert_eq!(err, LLMError::RateLimited);
}

#[tokio::test]
async fn test_openai_server_error() {
    let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(500).body("upstream exploded");
    }).await;

    let err = provider(&server, "sk").chat(ask(), None, None, None).await.unwrap_err();
    match err {
        LLMError::ApiError(msg) => assert!(msg.contains("upstream exploded")),
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_openai_empty_choices() {
    let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(json!({"choices": []}));
    }).await;

    let err = provider(&server, "sk").chat(ask(), None, None, None).await.unwrap_err();
    assert!(matches!(err, LLMError::ParseError(_)));
}

#[tokio::test]
async fn test_openai_blank_configured_key_is_missing() {
    let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(json!({"choices": [{"message": {"content": "unused"}}]}));
    }).await;

    let err = provider(&server, "   ").chat(ask(), None, None, None).await.unwrap_err();

    assert_eq!(err, LLMError::MissingApiKey);
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_openai_uses_rotated_key() {
    let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
        when.method(POST).header("authorization", "Bearer sk-rotated");
        then.status(200).json_body(json!({
            "choices": [{"message": {"role": "assistant", "content": "ok"}, "finish_reason": "stop"}]
        }));
    }).await;

    let keys = KeyStore::new(Some("sk-old".to_string()));
    let provider = OpenAIProvider::new(keys.clone(), None).with_base_url(server.url("/v1"));
    keys.set("sk-rotated").await;

    let response = provider.chat(ask(), None, None, None).await.unwrap();
    mock.assert_async().await;
    assert_eq!(response.content, "ok");
}

#[tokio::test]
async fn test_huggingface_transcription() {
    let server = MockServer::start_async().await;
    let mock = server.mock_async(|when, then| {
        when.method(POST)
            .path("/models/asr")
            .header("authorization", "Bearer hf-test")
            .body("webm-bytes");
        then.status(200).json_body(json!({"text": "when to harvest onions"}));
    }).await;

    let transcriber = HuggingFaceTranscriber::new(Some("hf-test".to_string()))
        .with_model_url(server.url("/models/asr"));

    let text = transcriber.transcribe(b"webm-bytes").await.unwrap();
    mock.assert_async().await;
    assert_eq!(text, "when to harvest onions");
}

#[tokio::test]
async fn test_huggingface_unexpected_shape() {
    let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
        when.method(POST).path("/models/asr");
        then.status(200).json_body(json!([{"generated_text": "list shaped"}]));
    }).await;

    let transcriber = HuggingFaceTranscriber::new(Some("hf".to_string()))
        .with_model_url(server.url("/models/asr"));

    assert!(matches!(
        transcriber.transcribe(b"x").await,
        Err(SpeechError::UnexpectedResponse(_))
    ));
}

#[tokio::test]
async fn test_huggingface_non_json_body() {
    let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
        when.method(POST).path("/models/asr");
        then.status(200).header("content-type", "text/html").body("<html>oops</html>");
    }).await;

    let transcriber = HuggingFaceTranscriber::new(Some("hf".to_string()))
        .with_model_url(server.url("/models/asr"));

    let err = transcriber.transcribe(b"x").await.unwrap_err();
    assert!(matches!(err, SpeechError::Decode(_)), "got {:?}", err);
    assert_eq!(friendly_speech_error(&err), TRANSCRIPTION_FAILED_REPLY);
}

#[tokio::test]
async fn test_huggingface_model_loading() {
    let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
        when.method(POST).path("/models/asr");
        then.status(503).json_body(json!({"error": "Model is currently loading"}));
    }).await;

    let transcriber = HuggingFaceTranscriber::new(Some("hf".to_string()))
        .with_model_url(server.url("/models/asr"));

    assert!(matches!(
        transcriber.transcribe(b"x").await,
        Err(SpeechError::Api { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_google_tts_concatenates_chunks() {
    let server = MockServer::start_async().await;
    let first = server.mock_async(|when, then| {
        when.method(GET)
            .path("/translate_tts")
            .query_param("tl", "en")
            .query_param("client", "tw-ob")
            .query_param("total", "2")
            .query_param("idx", "0");
        then.status(200).body("AAA");
    }).await;
    let second = server.mock_async(|when, then| {
        when.method(GET).path("/translate_tts").query_param("idx", "1");
        then.status(200).body("BBB");
    }).await;

    let text = "Apply compost before planting to improve soil structure and moisture retention. \
                Rotate legumes with cereals every season.";
    let tts = GoogleTts::new("en").with_base_url(server.base_url());

    let audio = tts.synthesize(text).await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(audio, b"AAABBB");
}

#[tokio::test]
async fn test_google_tts_error_status() {
    let server = MockServer::start_async().await;
    server.mock_async(|when, then| {
        when.method(GET).path("/translate_tts");
        then.status(429).body("Too Many Requests");
    }).await;

    let tts = GoogleTts::new("en").with_base_url(server.base_url());
    assert!(matches!(
        tts.synthesize("hello").await,
        Err(SpeechError::Api { status: 429, .. })
    ));
}
