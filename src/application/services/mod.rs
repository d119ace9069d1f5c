//! Application services - Business logic orchestration

pub mod admin_service;
pub mod chat_service;

pub use admin_service::{AdminService, SetKeyOutcome};
pub use chat_service::{ChatService, ChatSettings};
