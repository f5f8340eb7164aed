//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use verity_llm::perplexity::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use verity_research::{KnownInfluencer, ResearchConfig, TrustedSource};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Research provider settings
    #[serde(default)]
    pub api: ApiSettings,

    /// Research pipeline settings
    #[serde(default)]
    pub research: ResearchSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Research provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Perplexity API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model to query
    #[serde(default = "default_model")]
    pub model: String,

    /// Chat-completions endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// HTTP timeout per request (seconds)
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

/// Research pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchSettings {
    /// Maximum claims requested per influencer
    #[serde(default = "default_max_claims")]
    pub max_claims: usize,

    /// Sources to prioritize, in order
    #[serde(default)]
    pub sources: Vec<TrustedSource>,

    /// Overall bound on a research call (seconds)
    #[serde(default = "default_research_timeout")]
    pub timeout_secs: u64,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Database path; defaults to `~/.verity/verity.db`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding the config file and the default database.
    pub fn dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".verity"))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Load configuration from a file, or the default if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Database path, from settings or the default location.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.settings.database {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::dir()?.join("verity.db")),
        }
    }

    /// Add a trusted source, replacing any source with the same id.
    ///
    /// Returns `true` if an existing source was replaced.
    pub fn add_source(&mut self, source: TrustedSource) -> bool {
        match self.research.sources.iter_mut().find(|s| s.id == source.id) {
            Some(existing) => {
                *existing = source;
                true
            }
            None => {
                self.research.sources.push(source);
                false
            }
        }
    }

    /// Remove a trusted source by id. Returns `false` if it was not configured.
    pub fn remove_source(&mut self, id: &str) -> bool {
        let before = self.research.sources.len();
        self.research.sources.retain(|s| s.id != id);
        self.research.sources.len() != before
    }

    /// Build the pipeline configuration, with the given discovery exclusions.
    pub fn research_config(&self, exclude: Vec<KnownInfluencer>) -> ResearchConfig {
        ResearchConfig {
            max_claims: self.research.max_claims,
            trusted_sources: self.research.sources.clone(),
            exclude,
            research_timeout_secs: self.research.timeout_secs,
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for ResearchSettings {
    fn default() -> Self {
        let defaults = ResearchConfig::default();
        Self {
            max_claims: defaults.max_claims,
            sources: defaults.trusted_sources,
            timeout_secs: defaults.research_timeout_secs,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            database: None,
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_claims() -> usize {
    ResearchConfig::default().max_claims
}

fn default_research_timeout() -> u64 {
    ResearchConfig::default().research_timeout_secs
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
