//! Typed record helpers over any [`DocumentStore`]
//!
//! Research results are written here; the leaderboard and detail views read
//! from here. Influencers are keyed by normalized handle, so researching the
//! same person twice refreshes one record instead of creating two.

use crate::StoreError;
use serde::Serialize;
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, info};
use verity_domain::{aggregate, normalize_handle, Claim, Collection, Document, DocumentStore, Influencer, RecordId};

const INFLUENCER_ID: &str = "influencerId";

/// A persisted influencer with its assigned id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredInfluencer {
    /// Store-assigned id
    pub id: RecordId,
    /// The record as stored
    #[serde(flatten)]
    pub influencer: Influencer,
}

/// A persisted claim with its id and owner
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredClaim {
    /// Store-assigned id
    pub id: RecordId,
    /// Id of the owning influencer
    pub influencer_id: RecordId,
    /// The record as stored
    #[serde(flatten)]
    pub claim: Claim,
}

/// Leaderboard ordering, always descending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaderboardSort {
    /// Share of verified claims
    #[default]
    TrustScore,
    /// Follower count
    Followers,
    /// Number of verified claims
    Verified,
}

/// Persist a researched influencer and its claims
///
/// An existing influencer with the same normalized handle is updated in
/// place; otherwise a new record is inserted. A claim whose statement matches
/// one already on record for the influencer (trimmed, case-insensitive)
/// replaces it; other claims are appended with `influencerId` set. The stored
/// stats are then recomputed from every claim on record for that influencer.
pub fn save_report<S>(store: &mut S, influencer: &Influencer, claims: &[Claim]) -> Result<StoredInfluencer, StoreError>
where
    S: DocumentStore<Error = StoreError>,
{
    let body = serde_json::to_value(influencer)?;

    let id = match find_by_handle(store, &influencer.handle)? {
        Some(existing) => {
            debug!(id = %existing.id, handle = %influencer.handle, "refreshing existing influencer");
            store.update(Collection::Influencers, existing.id, body)?;
            existing.id
        }
        None => store.insert(Collection::Influencers, body)?,
    };

    let mut on_record: HashMap<String, RecordId> = load_claims(store, id)?
        .into_iter()
        .map(|stored| (statement_key(&stored.claim.statement), stored.id))
        .collect();

    let mut replaced = 0;
    for claim in claims {
        let mut body = serde_json::to_value(claim)?;
        if let Value::Object(fields) = &mut body {
            fields.insert(INFLUENCER_ID.to_string(), Value::String(id.to_string()));
        }

        let key = statement_key(&claim.statement);
        match on_record.get(&key) {
            Some(&claim_id) => {
                store.update(Collection::Claims, claim_id, body)?;
                replaced += 1;
            }
            None => {
                let claim_id = store.insert(Collection::Claims, body)?;
                on_record.insert(key, claim_id);
            }
        }
    }

    let stored_claims = load_claims(store, id)?;
    let stats = aggregate(stored_claims.iter().map(|c| &c.claim));
    store.update(Collection::Influencers, id, json!({ "stats": stats }))?;

    info!(
        %id,
        handle = %influencer.handle,
        new_claims = claims.len() - replaced,
        replaced_claims = replaced,
        total_claims = stats.total(),
        "saved influencer"
    );

    Ok(StoredInfluencer {
        id,
        influencer: Influencer {
            stats,
            ..influencer.clone()
        },
    })
}

fn statement_key(statement: &str) -> String {
    statement.trim().to_lowercase()
}

/// All stored influencers, oldest first
pub fn load_influencers<S>(store: &S) -> Result<Vec<StoredInfluencer>, StoreError>
where
    S: DocumentStore<Error = StoreError>,
{
    store
        .list_all(Collection::Influencers)?
        .into_iter()
        .map(to_influencer)
        .collect()
}

/// Claims belonging to one influencer, oldest first
pub fn load_claims<S>(store: &S, influencer_id: RecordId) -> Result<Vec<StoredClaim>, StoreError>
where
    S: DocumentStore<Error = StoreError>,
{
    let owner = influencer_id.to_string();
    store
        .list_all(Collection::Claims)?
        .into_iter()
        .filter(|doc| doc.body.get(INFLUENCER_ID).and_then(Value::as_str) == Some(owner.as_str()))
        .map(|doc| {
            Ok(StoredClaim {
                id: doc.id,
                influencer_id,
                claim: serde_json::from_value(doc.body)?,
            })
        })
        .collect()
}

/// `(name, handle)` of every stored influencer, for discovery exclusions
pub fn known_influencers<S>(store: &S) -> Result<Vec<(String, String)>, StoreError>
where
    S: DocumentStore<Error = StoreError>,
{
    Ok(load_influencers(store)?
        .into_iter()
        .map(|stored| (stored.influencer.name, stored.influencer.handle))
        .collect())
}

/// Look up an influencer by record id or by handle
pub fn find_influencer<S>(store: &S, key: &str) -> Result<Option<StoredInfluencer>, StoreError>
where
    S: DocumentStore<Error = StoreError>,
{
    if let Ok(id) = RecordId::parse(key) {
        if let Some(doc) = store.get(Collection::Influencers, id)? {
            return to_influencer(doc).map(Some);
        }
    }
    find_by_handle(store, key)
}

/// Stored influencers ranked by the given key, highest first
///
/// Ties are broken by name so the order is stable across runs.
pub fn leaderboard<S>(store: &S, sort: LeaderboardSort) -> Result<Vec<StoredInfluencer>, StoreError>
where
    S: DocumentStore<Error = StoreError>,
{
    let mut entries = load_influencers(store)?;
    entries.sort_by(|a, b| {
        rank(sort, &b.influencer, &a.influencer)
            .then_with(|| a.influencer.name.cmp(&b.influencer.name))
    });
    Ok(entries)
}

fn rank(sort: LeaderboardSort, a: &Influencer, b: &Influencer) -> Ordering {
    match sort {
        LeaderboardSort::TrustScore => a
            .stats
            .trust_score()
            .cmp(&b.stats.trust_score())
            .then_with(|| a.stats.total().cmp(&b.stats.total())),
        LeaderboardSort::Followers => a.followers.cmp(&b.followers),
        LeaderboardSort::Verified => a.stats.verified.cmp(&b.stats.verified),
    }
}

fn find_by_handle<S>(store: &S, handle: &str) -> Result<Option<StoredInfluencer>, StoreError>
where
    S: DocumentStore<Error = StoreError>,
{
    let key = normalize_handle(handle);
    Ok(load_influencers(store)?
        .into_iter()
        .find(|stored| stored.influencer.handle_key() == key))
}

fn to_influencer(doc: Document) -> Result<StoredInfluencer, StoreError> {
    Ok(StoredInfluencer {
        id: doc.id,
        influencer: serde_json::from_value(doc.body)?,
    })
}
