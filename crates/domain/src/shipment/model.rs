//! Shipment record and request schemas.

use record_store::{Document, StoredRecord};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::fields::{RECEIVER, SENDER};
use super::{ShipmentStatus, StatusHistory};
use crate::error::DomainError;

/// Identifier of a shipment, assigned by the record store.
pub type ShipmentId = common::RecordId;

/// A stored shipment.
///
/// `current_status` is a denormalized copy of the last event in
/// `status_history`; the service always writes both together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: ShipmentId,

    #[serde(default)]
    pub sender: Value,

    #[serde(default)]
    pub receiver: Value,

    pub current_status: ShipmentStatus,

    #[serde(default, deserialize_with = "history_or_empty")]
    pub status_history: StatusHistory,

    /// Any other fields supplied by clients, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Shipment {
    /// Decodes a shipment from a stored record.
    pub fn from_record(record: StoredRecord) -> Result<Self, DomainError> {
        Ok(serde_json::from_value(record.to_value())?)
    }

    /// Returns true if `current_status` matches the last history event.
    pub fn is_consistent(&self) -> bool {
        self.status_history
            .latest()
            .is_some_and(|event| event.status == self.current_status)
    }
}

/// Reads a missing or `null` history as empty.
fn history_or_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<StatusHistory, D::Error> {
    Ok(Option::<StatusHistory>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of a shipment creation request.
///
/// `statusHistory` and `id` are accepted but discarded: the history is
/// always seeded by the server and the identifier assigned by the store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShipment {
    #[serde(default)]
    pub sender: Option<Value>,

    #[serde(default)]
    pub receiver: Option<Value>,

    /// Requested initial status; unknown values fall back to the default.
    #[serde(default)]
    pub current_status: Option<Value>,

    #[serde(default, rename = "statusHistory")]
    _status_history: Option<Value>,

    #[serde(default, rename = "id")]
    _id: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewShipment {
    pub fn new(sender: impl Into<Value>, receiver: impl Into<Value>) -> Self {
        Self {
            sender: Some(sender.into()),
            receiver: Some(receiver.into()),
            ..Default::default()
        }
    }

    /// Sets the requested initial status.
    pub fn with_status(mut self, status: impl Into<Value>) -> Self {
        self.current_status = Some(status.into());
        self
    }

    /// Adds an opaque top-level field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    pub(crate) fn into_client_fields(self) -> Document {
        client_fields(self.sender, self.receiver, self.extra)
    }
}

/// Body of a shipment update request (PATCH or PUT).
///
/// A client-supplied `statusHistory` is discarded; history only grows
/// through status changes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentPatch {
    #[serde(default)]
    pub sender: Option<Value>,

    #[serde(default)]
    pub receiver: Option<Value>,

    /// Requested status; must name an allowed status when present.
    #[serde(default)]
    pub current_status: Option<Value>,

    #[serde(default, rename = "statusHistory")]
    _status_history: Option<Value>,

    #[serde(default, rename = "id")]
    _id: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ShipmentPatch {
    /// Creates a patch that only requests a status change.
    pub fn status(status: impl Into<Value>) -> Self {
        Self {
            current_status: Some(status.into()),
            ..Default::default()
        }
    }

    pub fn with_sender(mut self, sender: impl Into<Value>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn with_receiver(mut self, receiver: impl Into<Value>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }

    /// Adds an opaque top-level field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    pub(crate) fn into_client_fields(self) -> Document {
        client_fields(self.sender, self.receiver, self.extra)
    }
}

/// How an update is written to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Overwrite only the supplied fields (PATCH).
    Merge,

    /// Replace all client-owned fields (PUT). Status and history are kept.
    Replace,
}

fn client_fields(
    sender: Option<Value>,
    receiver: Option<Value>,
    extra: Map<String, Value>,
) -> Document {
    let mut fields = extra;
    if let Some(sender) = sender {
        fields.insert(SENDER.to_string(), sender);
    }
    if let Some(receiver) = receiver {
        fields.insert(RECEIVER.to_string(), receiver);
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use record_store::RecordId;
    use serde_json::json;

    #[test]
    fn test_new_shipment_discards_history_and_id() {
        let new: NewShipment = serde_json::from_value(json!({
            "id": 99,
            "sender": "A",
            "receiver": "B",
            "statusHistory": [{"status": "Doręczona", "timestamp": "2020-01-01T00:00:00Z"}],
            "weight": 2.5
        }))
        .unwrap();

        let fields = new.into_client_fields();
        assert_eq!(fields.get("sender"), Some(&json!("A")));
        assert_eq!(fields.get("weight"), Some(&json!(2.5)));
        assert!(fields.get("statusHistory").is_none());
        assert!(fields.get("id").is_none());
        assert!(fields.get("currentStatus").is_none());
    }

    #[test]
    fn test_patch_keeps_only_supplied_fields() {
        let patch: ShipmentPatch = serde_json::from_value(json!({
            "currentStatus": "Doręczona",
            "statusHistory": []
        }))
        .unwrap();

        assert_eq!(patch.current_status, Some(json!("Doręczona")));
        assert!(patch.into_client_fields().is_empty());
    }

    #[test]
    fn test_shipment_decodes_record() {
        let record: StoredRecord = serde_json::from_value(json!({
            "id": 4,
            "sender": {"name": "A"},
            "receiver": {"name": "B"},
            "currentStatus": "Nadana",
            "statusHistory": [{"status": "Nadana", "timestamp": "2026-01-01T10:00:00.000Z"}],
            "note": "fragile"
        }))
        .unwrap();

        let shipment = Shipment::from_record(record).unwrap();
        assert_eq!(shipment.id, RecordId::new(4));
        assert_eq!(shipment.current_status, ShipmentStatus::Submitted);
        assert_eq!(shipment.status_history.len(), 1);
        assert_eq!(shipment.extra.get("note"), Some(&json!("fragile")));
        assert!(shipment.is_consistent());
    }

    #[test]
    fn test_shipment_without_history_defaults_to_empty() {
        let record: StoredRecord = serde_json::from_value(json!({
            "id": 1,
            "currentStatus": "Doręczona"
        }))
        .unwrap();

        let shipment = Shipment::from_record(record).unwrap();
        assert!(shipment.status_history.is_empty());
        assert_eq!(shipment.sender, Value::Null);
        assert!(!shipment.is_consistent());
    }

    #[test]
    fn test_shipment_with_null_history_decodes_as_empty() {
        let record: StoredRecord = serde_json::from_value(json!({
            "id": 2,
            "currentStatus": "Nadana",
            "statusHistory": null
        }))
        .unwrap();

        let shipment = Shipment::from_record(record).unwrap();
        assert!(shipment.status_history.is_empty());
        assert_eq!(shipment.current_status, ShipmentStatus::Submitted);
    }

    #[test]
    fn test_shipment_serializes_camel_case() {
        let record: StoredRecord = serde_json::from_value(json!({
            "id": 1,
            "sender": "A",
            "receiver": "B",
            "currentStatus": "Nadana",
            "statusHistory": []
        }))
        .unwrap();
        let shipment = Shipment::from_record(record).unwrap();

        let json = serde_json::to_value(&shipment).unwrap();
        assert_eq!(json["currentStatus"], "Nadana");
        assert!(json["statusHistory"].is_array());
        assert_eq!(json["id"], 1);
    }
}
