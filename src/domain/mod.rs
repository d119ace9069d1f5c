//! Domain layer - Core business objects with no external dependencies
//! 
//! This layer contains:
//! - Entities: Incoming messages and outgoing replies
//! - Traits: Abstractions over speech services (Transcriber, Synthesizer)

pub mod entities;
pub mod traits;
