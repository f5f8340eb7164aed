//! Perplexity Provider Implementation
//!
//! Talks to Perplexity's chat-completions endpoint, whose online models search
//! the web before answering. That makes it the research step of the pipeline.
//!
//! # Features
//!
//! - Async HTTP communication with a bearer-authenticated endpoint
//! - Configurable endpoint, model and per-request timeout
//! - Credential validated at construction, not at call time
//! - No retries; callers own retry policy
//!
//! # Examples
//!
//! ```no_run
//! use verity_llm::PerplexityProvider;
//!
//! let provider = PerplexityProvider::new("pplx-...", "llama-3.1-sonar-small-128k-online").unwrap();
//! ```

use crate::LlmError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;
use verity_domain::ResearchProvider;

/// Default chat-completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.perplexity.ai/chat/completions";

/// Default online model
pub const DEFAULT_MODEL: &str = "llama-3.1-sonar-small-128k-online";

/// Default timeout for a single research request (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Perplexity API provider
pub struct PerplexityProvider {
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
    client: reqwest::Client,
}

/// Request body for the chat-completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the chat-completions API; only the first choice is read
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl PerplexityProvider {
    /// Create a new provider
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingCredential`] if `api_key` is empty or blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use verity_llm::{LlmError, PerplexityProvider};
    ///
    /// assert!(matches!(
    ///     PerplexityProvider::new("  ", "sonar"),
    ///     Err(LlmError::MissingCredential)
    /// ));
    /// ```
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingCredential);
        }

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            client: reqwest::Client::new(),
        })
    }

    /// Create a provider with the default model
    pub fn default_model(api_key: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(api_key, DEFAULT_MODEL)
    }

    /// Point the provider at a different chat-completions URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send a prompt and return `choices[0].message.content`
    ///
    /// # Errors
    ///
    /// - [`LlmError::Transport`] if the request cannot be sent or times out
    /// - [`LlmError::Status`] for any non-2xx answer, with the raw body
    /// - [`LlmError::InvalidResponse`] if a 2xx body has no message content
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "sending research request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&raw)
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("response contained no message content".to_string()))?;

        debug!(response_len = content.len(), "research response received");
        Ok(content)
    }
}

impl fmt::Debug for PerplexityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerplexityProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ResearchProvider for PerplexityProvider {
    type Error = LlmError;

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        self.generate(prompt).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
