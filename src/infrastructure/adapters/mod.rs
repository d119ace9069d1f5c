//! Adapters - Ways of talking to the assistant

pub mod console;
pub mod http;
