//! Domain traits - Abstractions for infrastructure implementations

pub mod speech;

pub use speech::{Synthesizer, Transcriber};
