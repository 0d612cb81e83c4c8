//! Shipment status policy.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DomainError;

/// The status of a shipment.
///
/// The set is closed and ordered along the usual delivery route:
/// ```text
/// Submitted ──► ReceivedAtSortingFacility ──► OutForDelivery ──► Delivered
/// ```
/// Any status may follow any other; the order is informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShipmentStatus {
    /// Handed over by the sender.
    #[default]
    #[serde(rename = "Nadana")]
    Submitted,

    /// Scanned in at a sorting facility.
    #[serde(rename = "Przyjęta w sortowni")]
    ReceivedAtSortingFacility,

    /// Loaded for the final delivery run.
    #[serde(rename = "Wydana do doręczenia")]
    OutForDelivery,

    /// Handed to the receiver.
    #[serde(rename = "Doręczona")]
    Delivered,
}

impl ShipmentStatus {
    /// Every allowed status, in route order.
    pub const ALL: [ShipmentStatus; 4] = [
        ShipmentStatus::Submitted,
        ShipmentStatus::ReceivedAtSortingFacility,
        ShipmentStatus::OutForDelivery,
        ShipmentStatus::Delivered,
    ];

    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Submitted => "Nadana",
            ShipmentStatus::ReceivedAtSortingFacility => "Przyjęta w sortowni",
            ShipmentStatus::OutForDelivery => "Wydana do doręczenia",
            ShipmentStatus::Delivered => "Doręczona",
        }
    }

    /// Looks up a status by its exact wire name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == name)
    }

    /// Returns true if `name` is one of the allowed statuses.
    pub fn is_valid(name: &str) -> bool {
        Self::parse(name).is_some()
    }

    /// Wire names of every allowed status, in route order.
    pub fn allowed_names() -> Vec<&'static str> {
        Self::ALL.iter().map(ShipmentStatus::as_str).collect()
    }

    /// Interprets the `currentStatus` of an update request.
    ///
    /// Missing and empty values (`null`, `""`, `false`, `0`) mean "no status
    /// change requested". Anything else must name an allowed status.
    pub fn requested(value: Option<&Value>) -> Result<Option<Self>, DomainError> {
        let Some(value) = value.filter(|v| !is_blank(v)) else {
            return Ok(None);
        };
        value
            .as_str()
            .and_then(Self::parse)
            .map(Some)
            .ok_or_else(|| DomainError::InvalidStatus {
                received: value.clone(),
            })
    }

    /// Interprets the `currentStatus` of a creation request.
    ///
    /// Creation never fails on status: anything that does not name an
    /// allowed status falls back to [`ShipmentStatus::Submitted`].
    pub fn initial(value: Option<&Value>) -> Self {
        value
            .and_then(Value::as_str)
            .and_then(Self::parse)
            .unwrap_or_default()
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
