//! Verification statistics and the claim aggregator

use crate::Claim;
use serde::{Deserialize, Serialize};

/// Verified/debunked tallies for one influencer
///
/// Never supplied by the provider; always derived with [`aggregate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationStats {
    /// Claims with trust score >= 70
    pub verified: u32,
    /// Claims below the threshold
    pub debunked: u32,
}

impl VerificationStats {
    /// Number of claims the stats were computed from
    pub fn total(&self) -> u32 {
        self.verified + self.debunked
    }

    /// Share of verified claims as a rounded percentage; 0 with no claims
    ///
    /// # Examples
    ///
    /// ```
    /// use verity_domain::VerificationStats;
    ///
    /// let stats = VerificationStats { verified: 2, debunked: 1 };
    /// assert_eq!(stats.trust_score(), 67);
    /// assert_eq!(VerificationStats::default().trust_score(), 0);
    /// ```
    pub fn trust_score(&self) -> u8 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        ((self.verified as f64 / total as f64) * 100.0).round() as u8
    }
}

/// Tally claims into verified/debunked counts in a single pass
///
/// Input order does not matter; an empty input yields zeroed stats.
pub fn aggregate<'a, I>(claims: I) -> VerificationStats
where
    I: IntoIterator<Item = &'a Claim>,
{
    claims
        .into_iter()
        .fold(VerificationStats::default(), |mut stats, claim| {
            if claim.verified() {
                stats.verified += 1;
            } else {
                stats.debunked += 1;
            }
            stats
        })
}
