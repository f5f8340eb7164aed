//! In-memory document store

use crate::{merge_shallow, StoreError};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use verity_domain::{Collection, Document, DocumentStore, RecordId};

/// Document store held entirely in memory
///
/// Used for `--dry-run` and tests. Records are kept ordered by id, which is
/// insertion order.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    collections: HashMap<Collection, BTreeMap<RecordId, Value>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in a collection
    pub fn len(&self, collection: Collection) -> usize {
        self.collections.get(&collection).map_or(0, BTreeMap::len)
    }

    /// Whether a collection holds no records
    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }
}

impl DocumentStore for MemoryStore {
    type Error = StoreError;

    fn insert(&mut self, collection: Collection, record: Value) -> Result<RecordId, Self::Error> {
        if !record.is_object() {
            return Err(StoreError::InvalidData("record must be a JSON object".to_string()));
        }
        let id = RecordId::new();
        self.collections.entry(collection).or_default().insert(id, record);
        Ok(id)
    }

    fn list_all(&self, collection: Collection) -> Result<Vec<Document>, Self::Error> {
        Ok(self
            .collections
            .get(&collection)
            .map(|records| {
                records
                    .iter()
                    .map(|(id, body)| Document {
                        id: *id,
                        body: body.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get(&self, collection: Collection, id: RecordId) -> Result<Option<Document>, Self::Error> {
        Ok(self
            .collections
            .get(&collection)
            .and_then(|records| records.get(&id))
            .map(|body| Document { id, body: body.clone() }))
    }

    fn update(&mut self, collection: Collection, id: RecordId, partial: Value) -> Result<(), Self::Error> {
        let body = self
            .collections
            .get_mut(&collection)
            .and_then(|records| records.get_mut(&id))
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", collection.as_str(), id)))?;
        merge_shallow(body, partial)
    }
}
