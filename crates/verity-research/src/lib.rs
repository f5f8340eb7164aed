//! Verity Research Pipeline
//!
//! Turns a free-text research request into validated, storable influencer and
//! claim records.
//!
//! # Overview
//!
//! A research provider (an online language model) is asked about a health
//! influencer and answers in prose with a JSON payload somewhere inside it.
//! This crate builds the prompt, makes the call, recovers and repairs the
//! JSON, validates it into domain records and derives verification stats.
//!
//! # Architecture
//!
//! ```text
//! PromptBuilder → ResearchProvider → extract → validate → aggregate → InfluencerReport
//! ```
//!
//! # Failure policy
//!
//! - **Top-level payload**: all-or-nothing. A transport, provider, extraction,
//!   parse or influencer validation failure aborts the operation.
//! - **List elements**: best-effort. An invalid claim (or an invalid influencer
//!   within a discovery batch) is dropped, logged and reported back in the
//!   result, never counted in stats.
//!
//! # Example Usage
//!
//! ```
//! use verity_llm::MockProvider;
//! use verity_research::{ResearchConfig, Researcher};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockProvider::new(r#"Here is the profile:
//! {"name": "Dr. Health", "handle": "@drhealth", "description": "",
//!  "followers": "1.2 million", "mainCategory": "Medicine",
//!  "claims": [{"claim": "Sleep matters", "trustScore": 92,
//!              "analysis": "Well supported", "sources": []}]}"#);
//!
//! let researcher = Researcher::new(provider, ResearchConfig::default())?;
//! let report = researcher.find_influencer("Dr. Health").await?;
//!
//! assert_eq!(report.influencer.followers, 1_200_000);
//! assert_eq!(report.influencer.stats.verified, 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extract;
mod pipeline;
mod prompt;
mod types;
mod validate;

#[cfg(test)]
mod tests;

pub use config::{KnownInfluencer, ResearchConfig, TrustedSource, DISCOVERY_BATCH_SIZE};
pub use error::{ResearchError, ValidationError};
pub use extract::extract;
pub use pipeline::Researcher;
pub use prompt::PromptBuilder;
pub use types::{Discovery, InfluencerReport, Rejected};
pub use validate::{
    claim_entries, collect_valid, discovery_entries, validate_claim, validate_influencer, Untrusted,
};
