//! LLM integration - OpenAI-compatible chat completions

pub mod traits;
pub mod config;
pub mod providers;


pub use traits::{LLM, LLMMessage, LLMResponse, LLMError, LLMResult, LLMUsage};
pub use config::LLMConfig;
pub use providers::OpenAIProvider;
