//! Gemini GenerationProvider implementation.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{LlmError, Result};
use crate::provider::GenerationProvider;
use crate::request::GenerationRequest;
use crate::response::GenerationResponse;

use super::client::Gemini;
use super::types::GeminiGenerateResponse;

#[async_trait]
impl GenerationProvider for Gemini {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let url = self.generate_url(&request.model);
        let body = Self::build_body(request);

        debug!(url = %url, modality = request.modality.as_str(), "sending generateContent");
        let response = self
            .build_request(&url)
            .json(&body)
            .send()
            .await
            .map_err(LlmError::from)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text).into());
        }

        let response_text = response.text().await.map_err(LlmError::from)?;
        let parsed: GeminiGenerateResponse = serde_json::from_str(&response_text).map_err(|e| {
            LlmError::response_format(
                "valid Gemini response",
                format!("parse error: {e}, response: {response_text}"),
            )
        })?;

        Self::parse_response(parsed)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
