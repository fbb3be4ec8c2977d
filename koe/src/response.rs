//! Generation response types and unwrapping.
//!
//! Providers convert their wire format into a [`GenerationResponse`]; callers
//! then pull out either the text ([`GenerationResponse::text`]) or the inline
//! audio payload ([`GenerationResponse::inline_data`]).

use crate::error::{LlmError, Result};

/// A binary payload embedded directly in the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineData {
    /// MIME type reported by the provider (e.g., `audio/L16;codec=pcm;rate=24000`).
    pub mime_type: String,
    /// Decoded bytes.
    pub data: Vec<u8>,
}

/// One piece of candidate content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Text output.
    Text(String),
    /// Inline binary output.
    InlineData(InlineData),
}

/// A single generated candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    /// Content parts in order.
    pub parts: Vec<Part>,
    /// Why generation stopped (e.g., "STOP", "MAX_TOKENS").
    pub finish_reason: Option<String>,
}

/// Token accounting for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens across all candidates.
    pub candidates_tokens: u32,
    /// Total tokens billed.
    pub total_tokens: u32,
}

/// Reply to a [`GenerationRequest`](crate::request::GenerationRequest).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResponse {
    /// Generated candidates. koe only ever reads the first.
    pub candidates: Vec<Candidate>,
    /// Token usage, when reported.
    pub usage: Option<Usage>,
    /// Model version that served the request.
    pub model: Option<String>,
}

impl GenerationResponse {
    /// Create a response holding one text candidate.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                parts: vec![Part::Text(text.into())],
                finish_reason: Some("STOP".to_owned()),
            }],
            ..Self::default()
        }
    }

    /// Create a response holding one inline data candidate.
    #[must_use]
    pub fn from_inline_data(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            candidates: vec![Candidate {
                parts: vec![Part::InlineData(InlineData {
                    mime_type: mime_type.into(),
                    data,
                })],
                finish_reason: Some("STOP".to_owned()),
            }],
            ..Self::default()
        }
    }

    fn first_candidate(&self) -> Result<&Candidate> {
        self.candidates
            .first()
            .ok_or_else(|| LlmError::response_format("at least one candidate", "none").into())
    }

    /// Text of the first candidate, with all of its text parts joined.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ResponseFormat`] if there is no candidate.
    pub fn text(&self) -> Result<String> {
        let candidate = self.first_candidate()?;
        Ok(candidate
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::Text(text) => Some(text.as_str()),
                Part::InlineData(_) => None,
            })
            .collect())
    }

    /// Inline payload in the first part of the first candidate.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ResponseFormat`] if there is no candidate, the
    /// candidate has no parts, or the first part is not inline data.
    pub fn inline_data(&self) -> Result<&InlineData> {
        let candidate = self.first_candidate()?;
        match candidate.parts.first() {
            Some(Part::InlineData(data)) => Ok(data),
            Some(Part::Text(_)) => {
                Err(LlmError::response_format("inline data part", "text part").into())
            }
            None => Err(LlmError::response_format("at least one part", "none").into()),
        }
    }

    /// Consume the response, returning the first inline payload.
    ///
    /// # Errors
    ///
    /// Same conditions as [`GenerationResponse::inline_data`].
    pub fn into_inline_data(mut self) -> Result<InlineData> {
        self.inline_data()?;
        let candidate = self.candidates.swap_remove(0);
        match candidate.parts.into_iter().next() {
            Some(Part::InlineData(data)) => Ok(data),
            _ => Err(LlmError::internal("inline data vanished").into()),
        }
    }
}
