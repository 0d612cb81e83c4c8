//! HTTP route handlers.

pub mod health;
pub mod metrics;
pub mod shipments;
pub mod track;

use std::sync::Arc;

use domain::{ShipmentId, ShipmentService};
use record_store::RecordStore;

/// Shared application state accessible from all handlers.
pub struct AppState<S: RecordStore> {
    pub shipment_service: ShipmentService<S>,
}

/// Handle to the shared state as extracted by handlers.
pub type SharedState<S> = Arc<AppState<S>>;

/// Parses the `{id}` path segment of single-shipment routes.
pub(crate) fn parse_id(raw: &str) -> Option<ShipmentId> {
    raw.parse().ok()
}
