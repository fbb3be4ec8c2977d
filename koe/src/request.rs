//! Generation request types.
//!
//! A [`GenerationRequest`] pairs a prompt and an optional system instruction
//! with the fixed sampling parameters koe always uses: temperature `0` and at
//! most [`MAX_OUTPUT_TOKENS`] output tokens.
//!
//! # Example
//!
//! ```rust,ignore
//! use koe::request::GenerationRequest;
//!
//! let request = GenerationRequest::text("Bohemian Rhapsody")?
//!     .system_instruction("Detail the history of the given song.");
//! assert_eq!(request.temperature, 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{LlmError, Result};

/// Model used for plain text generation.
pub const TEXT_MODEL: &str = "gemini-2.0-flash";

/// Model used for speech synthesis.
pub const SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Prebuilt voice used for speech synthesis.
pub const DEFAULT_VOICE: &str = "Kore";

/// Upper bound on generated tokens.
pub const MAX_OUTPUT_TOKENS: u32 = 1000;

/// Sampling temperature.
pub const TEMPERATURE: f32 = 0.0;

/// What the model is asked to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    /// Plain text.
    #[default]
    Text,
    /// Raw PCM audio returned as inline data.
    Audio,
}

impl Modality {
    /// Get the modality string for API requests.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Audio => "AUDIO",
        }
    }
}

/// A single generation request.
///
/// Built through [`GenerationRequest::text`] or [`GenerationRequest::speech`];
/// both refuse an empty prompt, so every request that reaches a provider
/// carries some input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model identifier (e.g., "gemini-2.0-flash").
    pub model: String,
    /// The user prompt.
    pub prompt: String,
    /// Optional steering instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    /// Maximum number of output tokens.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Requested response modality.
    pub modality: Modality,
    /// Prebuilt voice name, audio requests only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

impl GenerationRequest {
    /// Create a text generation request on [`TEXT_MODEL`].
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::InvalidRequest`] if `prompt` is empty.
    pub fn text(prompt: impl Into<String>) -> Result<Self> {
        Self::build(TEXT_MODEL, prompt.into(), Modality::Text, None)
    }

    /// Create a speech synthesis request on [`SPEECH_MODEL`] using
    /// [`DEFAULT_VOICE`].
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::InvalidRequest`] if `text` is empty.
    pub fn speech(text: impl Into<String>) -> Result<Self> {
        Self::build(
            SPEECH_MODEL,
            text.into(),
            Modality::Audio,
            Some(DEFAULT_VOICE.to_owned()),
        )
    }

    fn build(
        model: &str,
        prompt: String,
        modality: Modality,
        voice: Option<String>,
    ) -> Result<Self> {
        if prompt.is_empty() {
            return Err(LlmError::invalid_request("prompt must not be empty").into());
        }

        Ok(Self {
            model: model.to_owned(),
            prompt,
            system_instruction: None,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
            modality,
            voice,
        })
    }

    /// Set the system instruction. An empty string leaves it unset.
    #[must_use]
    pub fn system_instruction(mut self, instruction: impl Into<String>) -> Self {
        let instruction = instruction.into();
        self.system_instruction = (!instruction.is_empty()).then_some(instruction);
        self
    }

    /// Override the model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the voice. Ignored for text requests.
    #[must_use]
    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        if self.modality == Modality::Audio {
            self.voice = Some(voice.into());
        }
        self
    }
}
