use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::{Document, RecordId, RecordQuery, Result, StoredRecord};

/// Core trait for record store implementations.
///
/// A store holds a single collection of JSON object records. All
/// implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts a new record and returns it with its assigned identifier.
    ///
    /// Identifiers are `max(existing) + 1`, starting at 1. Any `id` key in
    /// the document is ignored.
    async fn insert(&self, fields: Document) -> Result<StoredRecord>;

    /// Retrieves a record by identifier.
    async fn find(&self, id: RecordId) -> Result<Option<StoredRecord>>;

    /// Replaces every field of an existing record.
    ///
    /// Returns None if no record has this identifier.
    async fn replace(&self, id: RecordId, fields: Document) -> Result<Option<StoredRecord>>;

    /// Overwrites the given top-level fields of an existing record, keeping the rest.
    ///
    /// Returns None if no record has this identifier.
    async fn merge(&self, id: RecordId, fields: Document) -> Result<Option<StoredRecord>>;

    /// Removes a record. Returns whether a record was removed.
    async fn remove(&self, id: RecordId) -> Result<bool>;

    /// Lists records in identifier order.
    async fn list(&self, query: RecordQuery) -> Result<Vec<StoredRecord>>;
}

/// Extension trait providing typed access on top of any record store.
#[async_trait]
pub trait RecordStoreExt: RecordStore {
    /// Retrieves a record and deserializes it, `id` included.
    async fn find_as<T: DeserializeOwned + Send>(&self, id: RecordId) -> Result<Option<T>> {
        match self.find(id).await? {
            Some(record) => Ok(Some(serde_json::from_value(record.to_value())?)),
            None => Ok(None),
        }
    }

    /// Lists records and deserializes each of them.
    async fn list_as<T: DeserializeOwned + Send>(&self, query: RecordQuery) -> Result<Vec<T>> {
        self.list(query)
            .await?
            .iter()
            .map(|record| serde_json::from_value(record.to_value()).map_err(Into::into))
            .collect()
    }
}

// Blanket implementation for all RecordStore implementations
impl<T: RecordStore + ?Sized> RecordStoreExt for T {}
