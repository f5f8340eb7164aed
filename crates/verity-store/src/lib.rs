//! Verity Storage Layer
//!
//! Implements the `DocumentStore` trait from `verity-domain` and the record
//! helpers built on top of it.
//!
//! # Architecture
//!
//! - Two collections, `influencers` and `claims`, each holding JSON documents
//! - Claims carry an `influencerId` set when they are saved
//! - `SqliteStore` for persistence, `MemoryStore` for tests and dry runs
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use verity_domain::{Collection, DocumentStore};
//! use verity_store::SqliteStore;
//!
//! let mut store = SqliteStore::new(":memory:").unwrap();
//! let id = store.insert(Collection::Influencers, json!({"name": "Dr. Health"})).unwrap();
//! assert!(store.get(Collection::Influencers, id).unwrap().is_some());
//! ```

#![warn(missing_docs)]

mod memory;
mod records;
mod sqlite;

use thiserror::Error;

pub use memory::MemoryStore;
pub use records::{
    find_influencer, known_influencers, leaderboard, load_claims, load_influencers, save_report,
    LeaderboardSort, StoredClaim, StoredInfluencer,
};
pub use sqlite::SqliteStore;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A stored body could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Shallow-merge `partial` into `target`; both must be JSON objects
pub(crate) fn merge_shallow(
    target: &mut serde_json::Value,
    partial: serde_json::Value,
) -> Result<(), StoreError> {
    let serde_json::Value::Object(fields) = partial else {
        return Err(StoreError::InvalidData("update must be a JSON object".to_string()));
    };
    let target = target
        .as_object_mut()
        .ok_or_else(|| StoreError::InvalidData("stored record is not a JSON object".to_string()))?;

    for (key, value) in fields {
        target.insert(key, value);
    }
    Ok(())
}
