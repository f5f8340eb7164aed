//! Influencer module - a researched public figure

use crate::VerificationStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A researched influencer, post-validation and pre-identity-assignment
///
/// `stats` starts at zero when the record is validated and is overwritten by
/// the aggregate of the influencer's validated claims before persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Influencer {
    /// Display name
    pub name: String,

    /// Social handle; not guaranteed unique across platforms
    pub handle: String,

    /// Short bio, possibly empty
    pub description: String,

    /// Follower count across platforms
    pub followers: u64,

    /// Short topical tag, e.g. "Nutrition"
    pub main_category: String,

    /// Verified/debunked tallies over the influencer's claims
    pub stats: VerificationStats,

    /// When the record was last validated
    pub last_updated: DateTime<Utc>,
}

impl Influencer {
    /// Create an influencer with zeroed stats
    pub fn new(
        name: impl Into<String>,
        handle: impl Into<String>,
        description: impl Into<String>,
        followers: u64,
        main_category: impl Into<String>,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            handle: handle.into(),
            description: description.into(),
            followers,
            main_category: main_category.into(),
            stats: VerificationStats::default(),
            last_updated,
        }
    }

    /// Handle normalized for comparison: trimmed, lowercased, leading `@` removed
    pub fn handle_key(&self) -> String {
        normalize_handle(&self.handle)
    }
}

/// Normalize a social handle so `@DrHealth` and `drhealth` compare equal
pub fn normalize_handle(handle: &str) -> String {
    handle.trim().trim_start_matches('@').to_lowercase()
}
