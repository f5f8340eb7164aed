//! SQLite-backed document store

use crate::{merge_shallow, StoreError};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use tracing::debug;
use verity_domain::{Collection, Document, DocumentStore, RecordId};

/// SQLite-based implementation of DocumentStore
///
/// Bodies are stored as JSON text in a single `documents` table.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use verity_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("verity.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    fn id_to_bytes(id: RecordId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    fn bytes_to_id(bytes: &[u8]) -> Result<RecordId, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!("Expected 16 bytes for RecordId, got {}", bytes.len()))
        })?;
        Ok(RecordId::from_value(u128::from_be_bytes(arr)))
    }

    fn row_to_document(id_bytes: Vec<u8>, body: String) -> Result<Document, StoreError> {
        Ok(Document {
            id: Self::bytes_to_id(&id_bytes)?,
            body: serde_json::from_str(&body)?,
        })
    }
}

impl DocumentStore for SqliteStore {
    type Error = StoreError;

    fn insert(&mut self, collection: Collection, record: Value) -> Result<RecordId, Self::Error> {
        if !record.is_object() {
            return Err(StoreError::InvalidData("record must be a JSON object".to_string()));
        }

        let id = RecordId::new();
        self.conn.execute(
            "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)",
            params![collection.as_str(), Self::id_to_bytes(id), record.to_string()],
        )?;

        debug!(collection = collection.as_str(), %id, "inserted document");
        Ok(id)
    }

    fn list_all(&self, collection: Collection) -> Result<Vec<Document>, Self::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, body FROM documents WHERE collection = ?1 ORDER BY id")?;

        let rows = stmt
            .query_map(params![collection.as_str()], |row| {
                Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, body)| Self::row_to_document(id, body))
            .collect()
    }

    fn get(&self, collection: Collection, id: RecordId) -> Result<Option<Document>, Self::Error> {
        let row = self
            .conn
            .query_row(
                "SELECT id, body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection.as_str(), Self::id_to_bytes(id)],
                |row| Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        row.map(|(id, body)| Self::row_to_document(id, body)).transpose()
    }

    fn update(&mut self, collection: Collection, id: RecordId, partial: Value) -> Result<(), Self::Error> {
        let mut document = self
            .get(collection, id)?
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", collection.as_str(), id)))?;

        merge_shallow(&mut document.body, partial)?;

        self.conn.execute(
            "UPDATE documents SET body = ?3 WHERE collection = ?1 AND id = ?2",
            params![collection.as_str(), Self::id_to_bytes(id), document.body.to_string()],
        )?;

        debug!(collection = collection.as_str(), %id, "updated document");
        Ok(())
    }
}
