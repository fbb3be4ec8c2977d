//! Provider trait for generation backends.
//!
//! [`GenerationProvider`] is the seam between the flows in
//! [`pipeline`](crate::pipeline) and a concrete backend such as
//! [`Gemini`](crate::llms::gemini::Gemini). [`MockProvider`] replays canned
//! responses for tests.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::{LlmError, Result};
use crate::request::GenerationRequest;
use crate::response::GenerationResponse;

/// A backend that answers one [`GenerationRequest`] per call.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Send a request and wait for the complete reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be delivered or the backend
    /// rejects it.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse>;

    /// Get the name of this provider.
    ///
    /// Used for error messages and logging.
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a boxed provider.
pub type BoxedGenerationProvider = Box<dyn GenerationProvider>;

/// A provider that returns predefined responses in order.
///
/// Every request is recorded so tests can assert on what was sent.
///
/// # Example
///
/// ```rust,ignore
/// let provider = MockProvider::new(vec![GenerationResponse::from_text("hi")]);
/// let text = pipeline::ask(&provider, None, "hello").await?;
/// assert_eq!(provider.requests().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockProvider {
    responses: Mutex<Vec<GenerationResponse>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockProvider {
    /// Create a mock that replays `responses` front to back.
    #[must_use]
    pub fn new(responses: Vec<GenerationResponse>) -> Self {
        let mut responses = responses;
        responses.reverse();
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of calls made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .ok_or_else(|| LlmError::internal("mock provider has no responses left").into())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
