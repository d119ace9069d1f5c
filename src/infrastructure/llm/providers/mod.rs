//! LLM Providers

pub mod openai;

pub use openai::OpenAIProvider;
