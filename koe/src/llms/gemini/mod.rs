//! Google Gemini API client implementation.
//!
//! This module provides a client for the Gemini `generateContent` endpoint,
//! supporting:
//! - Text generation with an optional system instruction
//! - Speech synthesis returning raw PCM as inline data

mod client;
mod config;
mod generate;
mod types;

pub use client::Gemini;
pub use config::GeminiConfig;
