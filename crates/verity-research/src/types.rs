//! Result types for research operations

use crate::error::ValidationError;
use serde::Serialize;
use verity_domain::{Claim, Influencer};

/// A validated influencer and the claims that survived validation
///
/// `influencer.stats` always equals the aggregate of `claims`. Invalid claims
/// are listed in `rejected_claims`; valid claims past the configured maximum
/// are counted in `truncated_claims`. Neither is counted in the stats.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerReport {
    /// The influencer record, ready for persistence
    pub influencer: Influencer,

    /// Valid claims, in provider order
    pub claims: Vec<Claim>,

    /// Claims dropped during validation
    pub rejected_claims: Vec<Rejected>,

    /// Valid claims cut because they exceeded `max_claims`
    pub truncated_claims: usize,
}

impl InfluencerReport {
    /// Number of claims the provider returned, valid or not
    pub fn claims_attempted(&self) -> usize {
        self.claims.len() + self.rejected_claims.len() + self.truncated_claims
    }
}

/// Outcome of a discovery batch
#[derive(Debug, Clone, Default, Serialize)]
pub struct Discovery {
    /// One report per valid influencer entry, in provider order
    pub reports: Vec<InfluencerReport>,

    /// Influencer entries dropped during validation
    pub rejected: Vec<Rejected>,
}

/// An entry dropped from a list during validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejected {
    /// Position of the entry in the provider's list
    pub index: usize,

    /// Why it was dropped
    pub error: ValidationError,
}
