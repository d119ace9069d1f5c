//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - LLM: OpenAI chat completions
//! - Speech: Transcription and text-to-speech
//! - Storage: Runtime key, .env persistence, audio files
//! - Adapters: HTTP server and console

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod llm;
pub mod speech;
pub mod storage;
