//! Shipment records, their status history and the lifecycle service.

mod ledger;
mod model;
mod service;
mod status;
mod tracking;

pub use ledger::{StatusEvent, StatusHistory};
pub use model::{NewShipment, Shipment, ShipmentId, ShipmentPatch, UpdateMode};
pub use service::ShipmentService;
pub use status::ShipmentStatus;
pub use tracking::Tracking;

/// Field names of the server-managed part of a shipment record.
pub(crate) mod fields {
    pub const CURRENT_STATUS: &str = "currentStatus";
    pub const STATUS_HISTORY: &str = "statusHistory";
    pub const SENDER: &str = "sender";
    pub const RECEIVER: &str = "receiver";
}
