//! Koe - one-shot Gemini text generation and speech synthesis
//!
//! This crate builds a single generation request from a prompt and an
//! optional system instruction, sends it to Gemini, and unwraps the reply.
//! The speech flow feeds the generated text into a second, audio-modality
//! request and stores the returned PCM as a WAV file.

pub mod audio;
pub mod error;
pub mod llms;
pub mod pipeline;
pub mod prelude;
pub mod provider;
pub mod request;
pub mod response;

pub use error::{AudioError, Error, LlmError, Result};
