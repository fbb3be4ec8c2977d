//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use koe::prelude::*;
//! ```

pub use crate::audio::{OUTPUT_FILE, WavSpec, encode_wav, write_wav};
pub use crate::error::{AudioError, Error, LlmError, Result};
pub use crate::llms::{Gemini, GeminiConfig};
pub use crate::pipeline::{Speech, ask, speak};
pub use crate::provider::{BoxedGenerationProvider, GenerationProvider, MockProvider};
pub use crate::request::{GenerationRequest, Modality};
pub use crate::response::{Candidate, GenerationResponse, InlineData, Part, Usage};
