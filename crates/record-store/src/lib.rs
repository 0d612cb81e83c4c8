//! Generic JSON record storage.
//!
//! Records are JSON objects keyed by a numeric [`RecordId`] that the store
//! assigns on insert. Two implementations are provided: a purely in-memory
//! store and one that mirrors its contents into a JSON file.

pub mod error;
pub mod file;
pub mod memory;
pub mod query;
pub mod record;
pub mod store;

pub use common::RecordId;
pub use error::{Result, StoreError};
pub use file::JsonFileRecordStore;
pub use memory::InMemoryRecordStore;
pub use query::RecordQuery;
pub use record::{Document, StoredRecord};
pub use store::{RecordStore, RecordStoreExt};
