//! Configuration for the research pipeline

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of influencers requested per discovery call
pub const DISCOVERY_BATCH_SIZE: usize = 3;

/// A source the provider should prefer when gathering evidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedSource {
    /// Short identifier, e.g. "pubmed"
    pub id: String,
    /// Human-readable name, e.g. "PubMed Central"
    pub name: String,
}

/// An influencer already on record, used to avoid rediscovering them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownInfluencer {
    /// Display name
    pub name: String,
    /// Social handle
    pub handle: String,
}

/// Configuration for the Researcher
///
/// Immutable once handed to a `Researcher`; build a new one to change settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Maximum claims requested per influencer
    #[serde(default = "default_max_claims")]
    pub max_claims: usize,

    /// Sources to prioritize, in priority order
    #[serde(default)]
    pub trusted_sources: Vec<TrustedSource>,

    /// Influencers discovery should not propose again
    #[serde(default)]
    pub exclude: Vec<KnownInfluencer>,

    /// Maximum time for a single provider call (seconds)
    #[serde(default = "default_research_timeout")]
    pub research_timeout_secs: u64,
}

impl ResearchConfig {
    /// Get the research timeout as a Duration
    pub fn research_timeout(&self) -> Duration {
        Duration::from_secs(self.research_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_claims == 0 {
            return Err("max_claims must be greater than 0".to_string());
        }
        if self.research_timeout_secs == 0 {
            return Err("research_timeout_secs must be greater than 0".to_string());
        }
        if let Some(source) = self.trusted_sources.iter().find(|s| s.name.trim().is_empty()) {
            return Err(format!("trusted source '{}' has an empty name", source.id));
        }
        Ok(())
    }

    /// Replace the trusted source list
    pub fn with_trusted_sources(mut self, sources: Vec<TrustedSource>) -> Self {
        self.trusted_sources = sources;
        self
    }

    /// Replace the discovery exclude list
    pub fn with_exclude(mut self, exclude: Vec<KnownInfluencer>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_claims: default_max_claims(),
            trusted_sources: Vec::new(),
            exclude: Vec::new(),
            research_timeout_secs: default_research_timeout(),
        }
    }
}

fn default_max_claims() -> usize {
    10
}

fn default_research_timeout() -> u64 {
    120
}
