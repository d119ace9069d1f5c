//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Chat and admin orchestration
//! - Errors: Domain-specific errors
//! - Messaging: Payload parsing, rate limiting

pub mod errors;
pub mod services;
pub mod messaging;
