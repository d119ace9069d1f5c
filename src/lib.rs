//! Agri AI Assistant - farming advice over text and voice
//!
//! Questions go to an OpenAI-compatible chat model, answers are spoken back
//! through a text-to-speech endpoint and voice questions are transcribed by
//! a HuggingFace speech model.

pub mod application;
pub mod domain;
pub mod infrastructure;
