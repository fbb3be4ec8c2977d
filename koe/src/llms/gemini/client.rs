//! Gemini API client implementation.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;

use crate::error::{LlmError, Result};
use crate::request::{GenerationRequest, Modality};
use crate::response::{Candidate, GenerationResponse, InlineData, Part, Usage};

use super::config::GeminiConfig;
use super::types::{
    GeminiContent, GeminiErrorResponse, GeminiGenerateRequest, GeminiGenerateResponse,
    GeminiGenerationConfig, GeminiPrebuiltVoiceConfig, GeminiSpeechConfig, GeminiVoiceConfig,
};

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct Gemini {
    pub(crate) config: Arc<GeminiConfig>,
    pub(crate) client: Client,
}

impl Gemini {
    /// Create a new Gemini client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Auth`] if the API key is empty, or
    /// [`LlmError::Internal`] if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(LlmError::auth("gemini", "API key is required").into());
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| LlmError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Create a client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Auth`] if `GEMINI_API_KEY` is unset or empty.
    pub fn from_env() -> Result<Self> {
        let config = GeminiConfig::from_env()?;
        Self::new(config)
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Build the `generateContent` URL for a model.
    pub(crate) fn generate_url(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.config.base_url)
    }

    /// Build a JSON POST carrying the API key.
    pub(crate) fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
    }

    /// Build the request body.
    pub(crate) fn build_body(request: &GenerationRequest) -> GeminiGenerateRequest {
        let (response_modalities, speech_config) = match request.modality {
            Modality::Text => (None, None),
            Modality::Audio => (
                Some(vec![Modality::Audio.as_str().to_owned()]),
                request.voice.as_ref().map(|voice| GeminiSpeechConfig {
                    voice_config: GeminiVoiceConfig {
                        prebuilt_voice_config: GeminiPrebuiltVoiceConfig {
                            voice_name: voice.clone(),
                        },
                    },
                }),
            ),
        };

        GeminiGenerateRequest {
            contents: vec![GeminiContent::text(Some("user"), request.prompt.clone())],
            system_instruction: request
                .system_instruction
                .as_ref()
                .map(|instruction| GeminiContent::text(None, instruction.clone())),
            generation_config: GeminiGenerationConfig {
                max_output_tokens: request.max_output_tokens,
                temperature: request.temperature,
                response_modalities,
                speech_config,
            },
        }
    }

    /// Convert the wire response, decoding inline payloads.
    pub(crate) fn parse_response(response: GeminiGenerateResponse) -> Result<GenerationResponse> {
        let candidates = response
            .candidates
            .into_iter()
            .map(|candidate| {
                let parts = candidate
                    .content
                    .map(|content| content.parts)
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|part| match (part.text, part.inline_data) {
                        (_, Some(blob)) => Some(
                            STANDARD
                                .decode(blob.data.as_bytes())
                                .map(|data| {
                                    Part::InlineData(InlineData {
                                        mime_type: blob.mime_type,
                                        data,
                                    })
                                })
                                .map_err(|e| {
                                    LlmError::response_format(
                                        "base64 inline data",
                                        format!("decode error: {e}"),
                                    )
                                }),
                        ),
                        (Some(text), None) => Some(Ok(Part::Text(text))),
                        (None, None) => None,
                    })
                    .collect::<std::result::Result<Vec<_>, LlmError>>()?;

                Ok(Candidate {
                    parts,
                    finish_reason: candidate.finish_reason,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(GenerationResponse {
            candidates,
            usage: response.usage_metadata.map(|usage| Usage {
                prompt_tokens: usage.prompt_token_count,
                candidates_tokens: usage.candidates_token_count,
                total_tokens: usage.total_token_count,
            }),
            model: response.model_version,
        })
    }

    /// Parse an error response from Gemini.
    pub(crate) fn parse_error(status: u16, body: &str) -> LlmError {
        if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(body) {
            let error = error_response.error;
            let code = error
                .status
                .unwrap_or_else(|| error.code.to_string());

            return match status {
                401 | 403 => LlmError::auth("gemini", error.message),
                400 if error.message.contains("API key") => LlmError::auth("gemini", error.message),
                429 => LlmError::rate_limited("gemini"),
                _ => LlmError::provider_code("gemini", code, error.message),
            };
        }

        LlmError::http_status(status, body.to_owned())
    }
}
