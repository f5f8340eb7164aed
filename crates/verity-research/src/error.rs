//! Error types for the research pipeline

use serde::Serialize;
use thiserror::Error;
use verity_llm::LlmError;

/// Errors that can occur while researching an influencer
///
/// Everything except [`ResearchError::InvalidInput`] originates past the
/// point where a request was sent. None of these are retried here.
#[derive(Error, Debug)]
pub enum ResearchError {
    /// Bad caller input: empty query, missing credential, invalid config
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network failure or timeout reaching the provider
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Provider answered with a non-success status
    #[error("Provider error: HTTP {status}: {body}")]
    Provider {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// No JSON span found in the provider's answer
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// A JSON span was found but did not parse after repair
    #[error("JSON parse error: {source}")]
    Parse {
        /// Underlying syntax error
        #[source]
        source: serde_json::Error,
        /// The repaired text that failed to parse
        text: String,
    },

    /// Well-formed JSON that violates the record schema
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A schema violation naming the first offending field
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("invalid {entity}: field `{field}` {reason}")]
pub struct ValidationError {
    /// Record kind being validated ("influencer", "claim", "discovery")
    pub entity: &'static str,
    /// Offending field; `$` when the value itself has the wrong shape
    pub field: &'static str,
    /// What was wrong with it
    pub reason: String,
}

impl ValidationError {
    /// Create a validation error
    pub fn new(entity: &'static str, field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            entity,
            field,
            reason: reason.into(),
        }
    }
}

impl From<LlmError> for ResearchError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingCredential => {
                ResearchError::InvalidInput("API key is missing or empty".to_string())
            }
            LlmError::Transport(err) => ResearchError::Transport(Box::new(err)),
            LlmError::Status { status, body } => ResearchError::Provider { status, body },
            LlmError::InvalidResponse(msg) => ResearchError::Extraction(msg),
        }
    }
}

impl From<tokio::time::error::Elapsed> for ResearchError {
    fn from(e: tokio::time::error::Elapsed) -> Self {
        ResearchError::Transport(Box::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message_names_field() {
        let err = ValidationError::new("influencer", "handle", "is missing");
        assert_eq!(err.to_string(), "invalid influencer: field `handle` is missing");
    }

    #[test]
    fn test_llm_status_maps_to_provider_error() {
        let err: ResearchError = LlmError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        }
        .into();
        assert!(matches!(err, ResearchError::Provider { status: 502, .. }));
    }

    #[test]
    fn test_missing_credential_is_invalid_input() {
        let err: ResearchError = LlmError::MissingCredential.into();
        assert!(matches!(err, ResearchError::InvalidInput(_)));
    }
}
