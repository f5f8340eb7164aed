//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::RecordId;
use serde_json::Value;
use std::future::Future;

/// Trait for the AI search provider that researches influencers
///
/// Implemented by the infrastructure layer (verity-llm)
pub trait ResearchProvider: Send + Sync {
    /// Error type for provider operations
    type Error;

    /// Send a prompt and return the provider's free-text answer
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Name of the model answering prompts
    fn model_name(&self) -> &str;
}

/// Logical collections in the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Influencer records
    Influencers,
    /// Claim records, each carrying an `influencerId`
    Claims,
}

impl Collection {
    /// Collection name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Influencers => "influencers",
            Collection::Claims => "claims",
        }
    }
}

/// A stored record together with its assigned id
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Id assigned at insert time
    pub id: RecordId,
    /// Record body as a JSON object
    pub body: Value,
}

/// Trait for the document store the pipeline hands records to
///
/// Implemented by the infrastructure layer (verity-store)
pub trait DocumentStore {
    /// Error type for store operations
    type Error;

    /// Insert a record and return its generated id
    fn insert(&mut self, collection: Collection, record: Value) -> Result<RecordId, Self::Error>;

    /// List every record in a collection, oldest first
    fn list_all(&self, collection: Collection) -> Result<Vec<Document>, Self::Error>;

    /// Fetch a single record
    fn get(&self, collection: Collection, id: RecordId) -> Result<Option<Document>, Self::Error>;

    /// Shallow-merge the top-level keys of `partial` into an existing record
    fn update(&mut self, collection: Collection, id: RecordId, partial: Value) -> Result<(), Self::Error>;
}
