//! Domain layer for the shipment tracking service.
//!
//! This crate provides:
//! - the closed set of shipment statuses and how request values map onto it
//! - the append-only status history
//! - the shipment record, request schemas and tracking projection
//! - `ShipmentService`, which runs the shipment lifecycle against a record store

pub mod error;
pub mod shipment;

pub use error::DomainError;
pub use shipment::{
    NewShipment, Shipment, ShipmentId, ShipmentPatch, ShipmentService, ShipmentStatus,
    StatusEvent, StatusHistory, Tracking, UpdateMode,
};
