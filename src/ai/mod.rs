//! Text-generation client for AI-assisted analysis.

pub mod client;

pub use client::{AiError, GenAiClient};
