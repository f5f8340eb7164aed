//! Claim module - a single assertion attributed to an influencer

use crate::TrustScore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A researched claim, post-validation
///
/// `verified` is not stored; it is always derived from `trust_score`
/// (see [`Claim::verified`]). The serialized form carries a `verified` field
/// for readers of the document store, and any incoming `verified` value is
/// ignored on deserialization.
///
/// The owning influencer's id is not part of the claim: it only exists once
/// the influencer has been persisted, and the store attaches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ClaimDocument", into = "ClaimDocument")]
pub struct Claim {
    /// Claim text as attributed to the influencer
    pub statement: String,

    /// Provider confidence in [0, 100]
    pub trust_score: TrustScore,

    /// Explanation of the score
    pub analysis: String,

    /// URLs or citations supporting the analysis, in provider order
    pub sources: Vec<String>,

    /// When the claim was validated
    pub date: DateTime<Utc>,
}

impl Claim {
    /// Create a new claim
    pub fn new(
        statement: impl Into<String>,
        trust_score: TrustScore,
        analysis: impl Into<String>,
        sources: Vec<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            statement: statement.into(),
            trust_score,
            analysis: analysis.into(),
            sources,
            date,
        }
    }

    /// Whether the claim counts as verified (trust score >= 70)
    pub fn verified(&self) -> bool {
        self.trust_score.is_verified()
    }
}

/// Wire shape of a claim in the document store
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClaimDocument {
    claim: String,
    trust_score: TrustScore,
    #[serde(default)]
    verified: bool,
    analysis: String,
    #[serde(default)]
    sources: Vec<String>,
    date: DateTime<Utc>,
}

impl From<ClaimDocument> for Claim {
    fn from(doc: ClaimDocument) -> Self {
        Claim {
            statement: doc.claim,
            trust_score: doc.trust_score,
            analysis: doc.analysis,
            sources: doc.sources,
            date: doc.date,
        }
    }
}

impl From<Claim> for ClaimDocument {
    fn from(claim: Claim) -> Self {
        ClaimDocument {
            verified: claim.verified(),
            claim: claim.statement,
            trust_score: claim.trust_score,
            analysis: claim.analysis,
            sources: claim.sources,
            date: claim.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(score: f64) -> Claim {
        Claim::new(
            "Cold plunges boost immunity",
            TrustScore::new(score).unwrap(),
            "Limited evidence from small trials",
            vec!["https://pubmed.ncbi.nlm.nih.gov/1".to_string()],
            Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_verified_is_derived() {
        assert!(sample(70.0).verified());
        assert!(!sample(69.0).verified());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(sample(82.0)).unwrap();
        assert_eq!(json["claim"], "Cold plunges boost immunity");
        assert_eq!(json["trustScore"], 82.0);
        assert_eq!(json["verified"], true);
        assert_eq!(json["sources"][0], "https://pubmed.ncbi.nlm.nih.gov/1");
        assert_eq!(json["date"], "2025-01-10T12:00:00Z");
    }

    #[test]
    fn test_incoming_verified_flag_is_ignored() {
        let json = serde_json::json!({
            "claim": "Sugar causes hyperactivity",
            "trustScore": 12,
            "verified": true,
            "analysis": "Debunked by controlled studies",
            "sources": [],
            "date": "2025-01-10T12:00:00Z"
        });
        let claim: Claim = serde_json::from_value(json).unwrap();
        assert!(!claim.verified());
    }
}
