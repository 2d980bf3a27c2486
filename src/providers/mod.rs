/*!
 * Provider implementations for the external AI services.
 *
 * This module contains the client seam the analysis and transcription
 * workflows talk through:
 * - Gemini: the real generateContent / File API client
 * - Mock: canned-response provider used in tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A text generation request, provider-agnostic.
///
/// Carries everything both workflows need: the prompt, sampling temperature,
/// whether the response must be JSON, an output-token cap and an optional
/// reference to a previously uploaded media file.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The prompt text
    pub prompt: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Request a JSON-mode response
    pub json_output: bool,

    /// Maximum number of tokens to generate
    pub max_output_tokens: Option<u32>,

    /// Reference to an uploaded media file to attach before the prompt
    pub file: Option<FileReference>,
}

impl GenerationRequest {
    /// Create a plain text-in text-out request
    pub fn new(prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            prompt: prompt.into(),
            temperature,
            json_output: false,
            max_output_tokens: None,
            file: None,
        }
    }

    /// Create a JSON-mode request
    pub fn json(prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            json_output: true,
            ..Self::new(prompt, temperature)
        }
    }

    /// Attach an uploaded file reference
    pub fn with_file(mut self, file: FileReference) -> Self {
        self.file = Some(file);
        self
    }

    /// Cap the number of output tokens
    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }
}

/// Reference to a file the provider already holds
#[derive(Debug, Clone)]
pub struct FileReference {
    /// Provider-side file URI
    pub uri: String,

    /// MIME type of the uploaded file
    pub mime_type: String,
}

/// Common trait for text generation providers.
///
/// The analysis service and the transcriber are generic over this trait so
/// tests can substitute the mock provider.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete a generation request, returning the raw model text
    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError>;
}

pub mod gemini;
pub mod mock;
