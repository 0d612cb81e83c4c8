//! Append-only status history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ShipmentStatus;

/// One timestamped status value in a shipment's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    /// When the status was recorded, set by the server.
    #[serde(with = "millis_timestamp")]
    pub timestamp: DateTime<Utc>,

    /// The recorded status.
    pub status: ShipmentStatus,
}

impl StatusEvent {
    pub fn new(status: ShipmentStatus, timestamp: DateTime<Utc>) -> Self {
        Self { timestamp, status }
    }
}

/// ISO-8601 UTC timestamps with exactly three fractional digits
/// (`2026-01-01T10:00:00.000Z`), so stored timestamps sort as text.
mod millis_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}

/// Chronological, append-only sequence of [`StatusEvent`]s.
///
/// Operations never reorder or drop events; a changed history is always
/// the previous one plus exactly one new event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusHistory(Vec<StatusEvent>);

impl StatusHistory {
    /// Starts a history with a single event for the initial status.
    pub fn seed(initial: ShipmentStatus, at: DateTime<Utc>) -> Self {
        Self(vec![StatusEvent::new(initial, at)])
    }

    /// Returns the history extended by `requested`, or None when nothing changes.
    ///
    /// Nothing changes when no status was requested or when it equals
    /// `current`. The caller persists the returned history.
    pub fn append_if_changed(
        &self,
        current: ShipmentStatus,
        requested: Option<ShipmentStatus>,
        at: DateTime<Utc>,
    ) -> Option<Self> {
        let requested = requested.filter(|status| *status != current)?;
        let mut events = self.0.clone();
        events.push(StatusEvent::new(requested, at));
        Some(Self(events))
    }

    /// Returns the most recent event.
    pub fn latest(&self) -> Option<&StatusEvent> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEvent> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[StatusEvent] {
        &self.0
    }
}

impl From<Vec<StatusEvent>> for StatusHistory {
    fn from(events: Vec<StatusEvent>) -> Self {
        Self(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_seed_has_single_event() {
        let history = StatusHistory::seed(ShipmentStatus::Submitted, t0());

        assert_eq!(history.len(), 1);
        assert_eq!(
            history.latest(),
            Some(&StatusEvent::new(ShipmentStatus::Submitted, t0()))
        );
    }

    #[test]
    fn test_append_without_request_is_unchanged() {
        let history = StatusHistory::seed(ShipmentStatus::Submitted, t0());
        assert!(
            history
                .append_if_changed(ShipmentStatus::Submitted, None, t0())
                .is_none()
        );
    }

    #[test]
    fn test_append_same_status_is_unchanged() {
        let history = StatusHistory::seed(ShipmentStatus::OutForDelivery, t0());
        let result = history.append_if_changed(
            ShipmentStatus::OutForDelivery,
            Some(ShipmentStatus::OutForDelivery),
            t0() + Duration::seconds(5),
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_append_new_status_adds_one_event() {
        let history = StatusHistory::seed(ShipmentStatus::Submitted, t0());
        let t1 = t0() + Duration::minutes(30);

        let updated = history
            .append_if_changed(
                ShipmentStatus::Submitted,
                Some(ShipmentStatus::Delivered),
                t1,
            )
            .unwrap();

        assert_eq!(updated.len(), 2);
        assert_eq!(updated.as_slice()[0], history.as_slice()[0]);
        assert_eq!(
            updated.latest(),
            Some(&StatusEvent::new(ShipmentStatus::Delivered, t1))
        );
        // Source history is not modified.
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_append_allows_returning_to_earlier_status() {
        let history = StatusHistory::from(vec![
            StatusEvent::new(ShipmentStatus::Submitted, t0()),
            StatusEvent::new(ShipmentStatus::OutForDelivery, t0() + Duration::hours(1)),
        ]);

        let updated = history
            .append_if_changed(
                ShipmentStatus::OutForDelivery,
                Some(ShipmentStatus::ReceivedAtSortingFacility),
                t0() + Duration::hours(2),
            )
            .unwrap();

        let statuses: Vec<_> = updated.iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![
                ShipmentStatus::Submitted,
                ShipmentStatus::OutForDelivery,
                ShipmentStatus::ReceivedAtSortingFacility,
            ]
        );
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let history = StatusHistory::seed(ShipmentStatus::Submitted, t0());
        let json = serde_json::to_value(&history).unwrap();

        assert_eq!(json[0]["status"], "Nadana");
        assert_eq!(json[0]["timestamp"], "2026-01-01T10:00:00.000Z");

        let back: StatusHistory = serde_json::from_value(json).unwrap();
        assert_eq!(back, history);
    }
}
