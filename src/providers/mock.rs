/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds with a canned analysis response
 * - `MockProvider::failing()` - Always fails with an API error
 * - `MockProvider::raw_text()` - Succeeds with non-JSON prose (fallback path)
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::{GenerationRequest, Provider};

/// Canned well-formed analysis response
const CANNED_ANALYSIS_JSON: &str = r#"{
  "titles": ["タイトル案1", "タイトル案2", "タイトル案3"],
  "thumbnails": [
    { "main": "メイン1", "sub": "サブ1" },
    { "main": "メイン2", "sub": "サブ2" },
    { "main": "メイン3", "sub": "サブ3" }
  ],
  "topics": [
    { "time": "00:00:10", "topic": "オープニング" },
    { "time": "00:05:30", "topic": "リスナーからのメール" }
  ]
}"#;

/// Canned non-JSON prose with recoverable topic lines
const CANNED_RAW_TEXT: &str = "今回の話題は以下の通りです。\n- 00:10 オープニング\n・01:05:30 ゲスト登場\n締めの挨拶";

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a well-formed JSON analysis response
    Working,
    /// Always fails with an API error
    Failing,
    /// Returns prose that is not valid JSON
    RawText,
    /// Returns an empty-response error
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow {
        /// Delay before responding
        delay_ms: u64,
    },
}

/// Mock provider for testing analysis and transcription behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter
    request_count: Arc<AtomicUsize>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&GenerationRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns non-JSON prose
    pub fn raw_text() -> Self {
        Self::new(MockBehavior::RawText)
    }

    /// Create a mock that signals an empty provider response
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&GenerationRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of requests served so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn generate(&self, request: GenerationRequest) -> Result<String, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => {
                if let Some(generator) = self.custom_response {
                    Ok(generator(&request))
                } else {
                    Ok(CANNED_ANALYSIS_JSON.to_string())
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),

            MockBehavior::RawText => Ok(CANNED_RAW_TEXT.to_string()),

            MockBehavior::Empty => Err(ProviderError::EmptyResponse),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(CANNED_ANALYSIS_JSON.to_string())
            }
        }
    }
}
