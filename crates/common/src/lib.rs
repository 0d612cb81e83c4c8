//! Shared types used across the shipment tracking crates.

pub mod types;

pub use types::{ParseRecordIdError, RecordId};
