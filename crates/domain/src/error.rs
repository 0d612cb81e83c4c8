//! Domain error types.

use record_store::StoreError;
use serde_json::Value;
use thiserror::Error;

use crate::shipment::ShipmentId;

/// Errors that can occur during shipment operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The requested status is not one of the allowed statuses.
    #[error("Invalid status: {received}")]
    InvalidStatus { received: Value },

    /// No shipment has the given identifier.
    #[error("Shipment not found: {id}")]
    ShipmentNotFound { id: ShipmentId },

    /// An error occurred in the record store.
    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
