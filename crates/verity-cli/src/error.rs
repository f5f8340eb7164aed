//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Research pipeline error
    #[error(transparent)]
    Research(#[from] verity_research::ResearchError),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(#[from] verity_store::StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No record matched
    #[error("Not found: {0}")]
    NotFound(String),

    /// No API key configured
    #[error("No API key configured. Use 'verity config set-key <KEY>' or set VERITY_API_KEY.")]
    MissingApiKey,
}

impl From<verity_llm::LlmError> for CliError {
    fn from(e: verity_llm::LlmError) -> Self {
        match e {
            verity_llm::LlmError::MissingCredential => CliError::MissingApiKey,
            other => CliError::Research(other.into()),
        }
    }
}
