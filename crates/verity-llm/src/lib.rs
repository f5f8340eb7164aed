//! Verity Research Provider Layer
//!
//! Implementations of the `ResearchProvider` trait from `verity-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `PerplexityProvider`: Perplexity chat-completions API
//!
//! # Examples
//!
//! ```
//! use verity_llm::MockProvider;
//! use verity_domain::ResearchProvider;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = MockProvider::new("{\"name\": \"Dr. Health\"}");
//! let result = provider.complete("test prompt").await.unwrap();
//! assert_eq!(result, "{\"name\": \"Dr. Health\"}");
//! # }
//! ```

#![warn(missing_docs)]

pub mod perplexity;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use verity_domain::ResearchProvider;

pub use perplexity::PerplexityProvider;

/// Errors that can occur while talking to a research provider
#[derive(Error, Debug)]
pub enum LlmError {
    /// API key absent or blank at construction time
    #[error("API key is missing or empty")]
    MissingCredential,

    /// Network failure reaching the provider, including timeouts
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("Provider returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Success status, but the envelope carried no usable message
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Status(u16, String),
}

/// Mock research provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
///
/// # Examples
///
/// ```
/// use verity_llm::MockProvider;
/// use verity_domain::ResearchProvider;
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// assert_eq!(provider.complete("prompt1").await.unwrap(), "response1");
/// assert_eq!(provider.call_count(), 1);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: MockReply,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    call_count: Arc<Mutex<usize>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_default(MockReply::Text(response.into()))
    }

    /// Create a MockProvider that fails every prompt with the given status
    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self::with_default(MockReply::Status(status, body.into()))
    }

    fn with_default(default_reply: MockReply) -> Self {
        Self {
            default_reply,
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), MockReply::Text(response.into()));
    }

    /// Configure a status failure for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>, status: u16) {
        lock(&self.responses).insert(prompt.into(), MockReply::Status(status, "Mock error".to_string()));
    }

    /// Number of times `complete` was called
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl ResearchProvider for MockProvider {
    type Error = LlmError;

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        *lock(&self.call_count) += 1;
        lock(&self.prompts).push(prompt.to_string());

        let reply = lock(&self.responses)
            .get(prompt)
            .cloned()
            .unwrap_or_else(|| self.default_reply.clone());

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Status(status, body) => Err(LlmError::Status { status, body }),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

// A poisoned mock is still usable; tests that panicked already failed.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.complete("any prompt").await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.complete("hello").await.unwrap(), "world");
        assert_eq!(provider.complete("foo").await.unwrap(), "bar");
        assert_eq!(provider.complete("unknown").await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_mock_provider_records_calls() {
        let provider = MockProvider::new("ok");
        assert_eq!(provider.call_count(), 0);

        provider.complete("prompt1").await.unwrap();
        provider.complete("prompt2").await.unwrap();

        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.prompts(), vec!["prompt1", "prompt2"]);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt", 503);

        let result = provider.complete("bad prompt").await;
        assert!(matches!(result, Err(LlmError::Status { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_mock_provider_failing() {
        let provider = MockProvider::failing(429, "rate limited");
        match provider.complete("anything").await {
            Err(LlmError::Status { status, body }) => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("Expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete("test").await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
