use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::record::ID_FIELD;
use crate::{Document, RecordId, RecordQuery, RecordStore, Result, StoredRecord};

/// The records of one collection, ordered by identifier.
#[derive(Debug, Clone, Default)]
pub(crate) struct Collection {
    records: BTreeMap<RecordId, Document>,
}

impl Collection {
    pub(crate) fn from_records(records: impl IntoIterator<Item = StoredRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.id, r.fields)).collect(),
        }
    }

    pub(crate) fn records(&self) -> impl Iterator<Item = StoredRecord> + '_ {
        self.records
            .iter()
            .map(|(id, fields)| StoredRecord::new(*id, fields.clone()))
    }

    fn next_id(&self) -> RecordId {
        self.records
            .keys()
            .next_back()
            .map(RecordId::next)
            .unwrap_or(RecordId::FIRST)
    }

    pub(crate) fn insert(&mut self, mut fields: Document) -> StoredRecord {
        fields.remove(ID_FIELD);
        let id = self.next_id();
        self.records.insert(id, fields.clone());
        StoredRecord::new(id, fields)
    }

    pub(crate) fn find(&self, id: RecordId) -> Option<StoredRecord> {
        self.records
            .get(&id)
            .map(|fields| StoredRecord::new(id, fields.clone()))
    }

    pub(crate) fn replace(&mut self, id: RecordId, mut fields: Document) -> Option<StoredRecord> {
        let slot = self.records.get_mut(&id)?;
        fields.remove(ID_FIELD);
        *slot = fields;
        Some(StoredRecord::new(id, slot.clone()))
    }

    pub(crate) fn merge(&mut self, id: RecordId, fields: Document) -> Option<StoredRecord> {
        let slot = self.records.get_mut(&id)?;
        for (key, value) in fields {
            if key != ID_FIELD {
                slot.insert(key, value);
            }
        }
        Some(StoredRecord::new(id, slot.clone()))
    }

    pub(crate) fn remove(&mut self, id: RecordId) -> bool {
        self.records.remove(&id).is_some()
    }

    pub(crate) fn list(&self, query: &RecordQuery) -> Vec<StoredRecord> {
        let matching = self.records().filter(|record| {
            query
                .filters
                .iter()
                .all(|(field, value)| record.field_matches(field, value))
        });

        let matching = matching.skip(query.offset.unwrap_or(0));
        match query.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }
}

/// In-memory record store.
///
/// Cloning is cheap and clones share the same underlying collection.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    collection: Arc<RwLock<Collection>>,
}

impl InMemoryRecordStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with records, keeping their identifiers.
    pub fn with_records(records: impl IntoIterator<Item = StoredRecord>) -> Self {
        Self {
            collection: Arc::new(RwLock::new(Collection::from_records(records))),
        }
    }

    /// Returns the number of stored records.
    pub async fn record_count(&self) -> usize {
        self.collection.read().await.len()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert(&self, fields: Document) -> Result<StoredRecord> {
        Ok(self.collection.write().await.insert(fields))
    }

    async fn find(&self, id: RecordId) -> Result<Option<StoredRecord>> {
        Ok(self.collection.read().await.find(id))
    }

    async fn replace(&self, id: RecordId, fields: Document) -> Result<Option<StoredRecord>> {
        Ok(self.collection.write().await.replace(id, fields))
    }

    async fn merge(&self, id: RecordId, fields: Document) -> Result<Option<StoredRecord>> {
        Ok(self.collection.write().await.merge(id, fields))
    }

    async fn remove(&self, id: RecordId) -> Result<bool> {
        Ok(self.collection.write().await.remove(id))
    }

    async fn list(&self, query: RecordQuery) -> Result<Vec<StoredRecord>> {
        Ok(self.collection.read().await.list(&query))
    }
}
