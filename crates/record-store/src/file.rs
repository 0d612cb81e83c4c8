use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::memory::Collection;
use crate::{Document, RecordId, RecordQuery, RecordStore, Result, StoreError, StoredRecord};

/// Contents of the backing file: the collection plus whatever other
/// top-level keys the file already held.
#[derive(Debug, Default)]
struct FileState {
    collection: Collection,
    other: Map<String, Value>,
}

/// Record store that mirrors its collection into a JSON file.
///
/// The file holds one top-level object; the collection is stored as an
/// array of records under its name, e.g. `{"shipments": [...]}`. Other
/// top-level keys are preserved on every write. The whole file is
/// rewritten after each mutation while the write lock is held.
#[derive(Clone)]
pub struct JsonFileRecordStore {
    path: Arc<PathBuf>,
    collection_name: Arc<str>,
    state: Arc<RwLock<FileState>>,
}

impl JsonFileRecordStore {
    /// Opens the file at `path`, creating it with an empty collection if absent.
    #[tracing::instrument(skip(path))]
    pub async fn open(path: impl AsRef<Path>, collection_name: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let state = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => FileState::default(),
            Ok(bytes) => parse_file(&bytes, collection_name)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileState::default(),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(records = state.collection.len(), "opened record file");

        let store = Self {
            path: Arc::new(path),
            collection_name: Arc::from(collection_name),
            state: Arc::new(RwLock::new(state)),
        };
        {
            let state = store.state.read().await;
            store.persist(&state.collection, &state.other).await?;
        }
        Ok(store)
    }

    async fn persist(&self, collection: &Collection, other: &Map<String, Value>) -> Result<()> {
        let records: Vec<Value> = collection
            .records()
            .map(|record| record.to_value())
            .collect();

        let mut root = other.clone();
        root.insert(self.collection_name.to_string(), Value::Array(records));

        let bytes = serde_json::to_vec_pretty(&Value::Object(root))?;
        tokio::fs::write(self.path.as_ref(), bytes).await?;
        Ok(())
    }

    /// Applies `change` to a copy of the collection and swaps the copy in
    /// once it has been written.
    ///
    /// `change` reports whether it modified anything; unchanged copies are
    /// dropped without touching the file. A failed write leaves the
    /// in-memory collection as it was.
    async fn commit<T>(&self, change: impl FnOnce(&mut Collection) -> (T, bool)) -> Result<T> {
        let mut state = self.state.write().await;
        let mut staged = state.collection.clone();
        let (output, changed) = change(&mut staged);
        if changed {
            self.persist(&staged, &state.other).await?;
            state.collection = staged;
        }
        Ok(output)
    }
}

fn parse_file(bytes: &[u8], collection_name: &str) -> Result<FileState> {
    let Value::Object(mut root) = serde_json::from_slice::<Value>(bytes)? else {
        return Err(StoreError::InvalidDocument(
            "top-level value must be an object".to_string(),
        ));
    };

    let records = match root.remove(collection_name) {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(serde_json::from_value::<StoredRecord>)
            .collect::<std::result::Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(StoreError::InvalidDocument(format!(
                "`{collection_name}` must be an array"
            )));
        }
    };

    Ok(FileState {
        collection: Collection::from_records(records),
        other: root,
    })
}

#[async_trait]
impl RecordStore for JsonFileRecordStore {
    async fn insert(&self, fields: Document) -> Result<StoredRecord> {
        self.commit(|collection| (collection.insert(fields), true)).await
    }

    async fn find(&self, id: RecordId) -> Result<Option<StoredRecord>> {
        Ok(self.state.read().await.collection.find(id))
    }

    async fn replace(&self, id: RecordId, fields: Document) -> Result<Option<StoredRecord>> {
        self.commit(|collection| {
            let record = collection.replace(id, fields);
            let changed = record.is_some();
            (record, changed)
        })
        .await
    }

    async fn merge(&self, id: RecordId, fields: Document) -> Result<Option<StoredRecord>> {
        self.commit(|collection| {
            let record = collection.merge(id, fields);
            let changed = record.is_some();
            (record, changed)
        })
        .await
    }

    async fn remove(&self, id: RecordId) -> Result<bool> {
        self.commit(|collection| {
            let removed = collection.remove(id);
            (removed, removed)
        })
        .await
    }

    async fn list(&self, query: RecordQuery) -> Result<Vec<StoredRecord>> {
        Ok(self.state.read().await.collection.list(&query))
    }
}
