//! LLM backend implementations.
//!
//! # Available Backends
//!
//! - [`gemini`] - Google Gemini API (text generation and speech synthesis)

pub mod gemini;

pub use gemini::{Gemini, GeminiConfig};
