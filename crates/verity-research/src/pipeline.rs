//! The research pipeline: prompt, provider, extraction, validation, aggregation

use crate::config::ResearchConfig;
use crate::error::{ResearchError, ValidationError};
use crate::extract::extract;
use crate::prompt::PromptBuilder;
use crate::types::{Discovery, InfluencerReport};
use crate::validate::{claim_entries, collect_valid, discovery_entries, validate_claim, validate_influencer, Untrusted};
use chrono::{DateTime, Utc};
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use verity_domain::{aggregate, ResearchProvider};

/// Researches influencers through a [`ResearchProvider`]
///
/// Holds an immutable configuration; nothing is persisted and nothing is
/// retried. Concurrent calls on one `Researcher` are independent.
pub struct Researcher<P> {
    provider: P,
    config: ResearchConfig,
    clock: fn() -> DateTime<Utc>,
}

impl<P> Researcher<P>
where
    P: ResearchProvider,
    P::Error: Into<ResearchError>,
{
    /// Create a new Researcher
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::InvalidInput`] if the configuration is invalid.
    pub fn new(provider: P, config: ResearchConfig) -> Result<Self, ResearchError> {
        config.validate().map_err(ResearchError::InvalidInput)?;
        Ok(Self {
            provider,
            config,
            clock: Utc::now,
        })
    }

    /// Replace the time source used for `lastUpdated` and claim dates
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// The configuration this researcher was built with
    pub fn config(&self) -> &ResearchConfig {
        &self.config
    }

    /// Model used by the underlying provider
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Research a single influencer by name or handle
    ///
    /// Claims that fail validation are dropped and listed in
    /// [`InfluencerReport::rejected_claims`]. Valid claims beyond `max_claims`
    /// are cut and counted in [`InfluencerReport::truncated_claims`]. Any
    /// failure of the influencer itself aborts the whole lookup.
    ///
    /// # Errors
    ///
    /// - [`ResearchError::InvalidInput`] for an empty query; the provider is
    ///   not called
    /// - [`ResearchError::Transport`] or [`ResearchError::Provider`] if the call fails
    /// - [`ResearchError::Extraction`] or [`ResearchError::Parse`] if no JSON
    ///   could be recovered
    /// - [`ResearchError::Validation`] if the influencer payload is invalid
    pub async fn find_influencer(&self, query: &str) -> Result<InfluencerReport, ResearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResearchError::InvalidInput("query must not be empty".to_string()));
        }

        info!(query, "researching influencer");

        let prompt = PromptBuilder::lookup(query, &self.config).build();
        let raw = self.research(&prompt).await?;
        let report = self.build_report(&raw, (self.clock)())?;

        info!(
            handle = %report.influencer.handle,
            claims = report.claims.len(),
            dropped = report.rejected_claims.len(),
            truncated = report.truncated_claims,
            verified = report.influencer.stats.verified,
            "research complete"
        );

        Ok(report)
    }

    /// Ask the provider to propose a batch of influencers with their claims
    ///
    /// Each entry is validated on its own, so one malformed influencer only
    /// removes itself from the batch. The provider is called once.
    ///
    /// # Errors
    ///
    /// Same as [`Researcher::find_influencer`], except that validation errors
    /// only surface when the payload is not a list of influencers at all.
    pub async fn discover_influencers(&self) -> Result<Discovery, ResearchError> {
        info!(excluded = self.config.exclude.len(), "discovering influencers");

        let prompt = PromptBuilder::discovery(&self.config).build();
        let raw = self.research(&prompt).await?;
        let entries = discovery_entries(&raw)?;

        let now = (self.clock)();
        let (reports, rejected) = collect_valid("influencer", entries, |entry| self.build_report(entry, now));

        info!(found = reports.len(), dropped = rejected.len(), "discovery complete");

        Ok(Discovery { reports, rejected })
    }

    /// Send a prompt and recover its JSON payload
    async fn research(&self, prompt: &str) -> Result<Untrusted, ResearchError> {
        let start = Instant::now();

        let text = timeout(self.config.research_timeout(), self.provider.complete(prompt))
            .await?
            .map_err(Into::into)?;

        debug!(
            model = self.provider.model_name(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            response_len = text.len(),
            "provider answered"
        );

        extract(&text)
    }

    /// Validate one influencer payload and its nested claims
    fn build_report(&self, raw: &Untrusted, now: DateTime<Utc>) -> Result<InfluencerReport, ValidationError> {
        let mut influencer = validate_influencer(raw, now)?;
        let entries = claim_entries(raw)?;

        let (mut claims, rejected_claims) = collect_valid("claim", entries, |entry| validate_claim(entry, now));

        let truncated_claims = claims.len().saturating_sub(self.config.max_claims);
        if truncated_claims > 0 {
            warn!(
                handle = %influencer.handle,
                max_claims = self.config.max_claims,
                truncated = truncated_claims,
                "provider returned more claims than requested; extra claims dropped"
            );
            claims.truncate(self.config.max_claims);
        }
        influencer.stats = aggregate(&claims);

        Ok(InfluencerReport {
            influencer,
            claims,
            rejected_claims,
            truncated_claims,
        })
    }
}
