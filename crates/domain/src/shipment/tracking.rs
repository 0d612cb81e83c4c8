//! Read-only tracking projection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Shipment, ShipmentId, ShipmentStatus, StatusHistory};

/// What a tracking lookup reveals about a shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tracking {
    /// The identifier the lookup was made with.
    pub tracking_id: ShipmentId,
    pub current_status: ShipmentStatus,
    pub status_history: StatusHistory,
    pub sender: Value,
    pub receiver: Value,
}

impl Tracking {
    /// Projects a loaded shipment for the lookup made with `tracking_id`.
    pub fn project(tracking_id: ShipmentId, shipment: Shipment) -> Self {
        Self {
            tracking_id,
            current_status: shipment.current_status,
            status_history: shipment.status_history,
            sender: shipment.sender,
            receiver: shipment.receiver,
        }
    }
}
