//! Shipment lifecycle service.

use chrono::{DateTime, SubsecRound, Utc};
use record_store::{Document, RecordQuery, RecordStore, RecordStoreExt, StoredRecord};
use tokio::sync::Mutex;

use super::fields::{CURRENT_STATUS, STATUS_HISTORY};
use super::{
    NewShipment, Shipment, ShipmentId, ShipmentPatch, ShipmentStatus, StatusHistory, Tracking,
    UpdateMode,
};
use crate::error::DomainError;

/// Service for creating, updating, tracking and deleting shipments.
///
/// Mutations are serialized through a write gate, so an update's
/// read-then-write never interleaves with another mutation.
pub struct ShipmentService<S: RecordStore> {
    store: S,
    write_gate: Mutex<()>,
}

impl<S: RecordStore> ShipmentService<S> {
    /// Creates a new shipment service on top of the given record store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_gate: Mutex::new(()),
        }
    }

    /// Returns a reference to the underlying record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a shipment with a freshly seeded status history.
    ///
    /// An absent or unknown initial status falls back to
    /// [`ShipmentStatus::Submitted`]; creation never fails on status.
    #[tracing::instrument(skip(self, new_shipment))]
    pub async fn create(&self, new_shipment: NewShipment) -> Result<Shipment, DomainError> {
        let status = ShipmentStatus::initial(new_shipment.current_status.as_ref());
        let history = StatusHistory::seed(status, now());

        let mut fields = new_shipment.into_client_fields();
        set_status(&mut fields, status, &history)?;

        let _guard = self.write_gate.lock().await;
        let record = self.store.insert(fields).await?;

        metrics::counter!("shipments_created_total").increment(1);
        tracing::info!(id = %record.id, %status, "shipment created");

        Shipment::from_record(record)
    }

    /// Applies an update to a single shipment.
    ///
    /// The requested status is validated before storage is touched. When it
    /// differs from the current one, exactly one history event is appended
    /// and written together with the new current status.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: ShipmentId,
        patch: ShipmentPatch,
        mode: UpdateMode,
    ) -> Result<Shipment, DomainError> {
        let requested =
            ShipmentStatus::requested(patch.current_status.as_ref()).inspect_err(|_| {
                metrics::counter!("shipment_status_rejected_total").increment(1);
                tracing::warn!(%id, received = ?patch.current_status, "rejected invalid status");
            })?;

        let _guard = self.write_gate.lock().await;
        let mut fields = patch.into_client_fields();

        if let Some(existing) = self.get(id).await? {
            let history = existing
                .status_history
                .append_if_changed(existing.current_status, requested, now());

            match (history, requested) {
                (Some(history), Some(status)) => {
                    set_status(&mut fields, status, &history)?;
                    metrics::counter!(
                        "shipment_status_transitions_total",
                        "status" => status.as_str()
                    )
                    .increment(1);
                    tracing::info!(
                        %id,
                        from = %existing.current_status,
                        to = %status,
                        events = history.len(),
                        "shipment status changed"
                    );
                }
                _ if mode == UpdateMode::Replace => {
                    set_status(&mut fields, existing.current_status, &existing.status_history)?;
                }
                _ => {}
            }
        }

        let record = self
            .write(id, fields, mode)
            .await?
            .ok_or(DomainError::ShipmentNotFound { id })?;

        Shipment::from_record(record)
    }

    /// Looks up the tracking view of a shipment.
    #[tracing::instrument(skip(self))]
    pub async fn track(&self, id: ShipmentId) -> Result<Tracking, DomainError> {
        match self.get(id).await? {
            Some(shipment) => {
                metrics::counter!("shipment_tracking_lookups_total", "outcome" => "found")
                    .increment(1);
                Ok(Tracking::project(id, shipment))
            }
            None => {
                metrics::counter!("shipment_tracking_lookups_total", "outcome" => "not_found")
                    .increment(1);
                Err(DomainError::ShipmentNotFound { id })
            }
        }
    }

    /// Deletes a shipment and its history.
    ///
    /// Succeeds whether or not the shipment existed.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: ShipmentId) -> Result<(), DomainError> {
        let _guard = self.write_gate.lock().await;
        let existed = self.store.remove(id).await?;

        if existed {
            metrics::counter!("shipments_deleted_total").increment(1);
        }
        tracing::info!(%id, existed, "shipment deleted");
        Ok(())
    }

    /// Loads a shipment by ID.
    ///
    /// Returns None if the shipment doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: ShipmentId) -> Result<Option<Shipment>, DomainError> {
        Ok(self.store.find_as(id).await?)
    }

    /// Lists shipments in identifier order.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, query: RecordQuery) -> Result<Vec<Shipment>, DomainError> {
        Ok(self.store.list_as(query).await?)
    }

    async fn write(
        &self,
        id: ShipmentId,
        fields: Document,
        mode: UpdateMode,
    ) -> Result<Option<StoredRecord>, DomainError> {
        let record = match mode {
            UpdateMode::Merge => self.store.merge(id, fields).await?,
            UpdateMode::Replace => self.store.replace(id, fields).await?,
        };
        Ok(record)
    }
}

/// Current time at the millisecond precision used in stored timestamps.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn set_status(
    fields: &mut Document,
    status: ShipmentStatus,
    history: &StatusHistory,
) -> Result<(), DomainError> {
    fields.insert(CURRENT_STATUS.to_string(), serde_json::to_value(status)?);
    fields.insert(STATUS_HISTORY.to_string(), serde_json::to_value(history)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use record_store::InMemoryRecordStore;
    use serde_json::json;

    fn create_service() -> ShipmentService<InMemoryRecordStore> {
        ShipmentService::new(InMemoryRecordStore::new())
    }

    #[tokio::test]
    async fn test_create_defaults_to_submitted() {
        let service = create_service();

        let shipment = service.create(NewShipment::new("A", "B")).await.unwrap();

        assert_eq!(shipment.id, ShipmentId::new(1));
        assert_eq!(shipment.current_status, ShipmentStatus::Submitted);
        assert_eq!(shipment.status_history.len(), 1);
        assert!(shipment.is_consistent());
    }

    #[tokio::test]
    async fn test_create_with_initial_status() {
        let service = create_service();

        let shipment = service
            .create(NewShipment::new("A", "B").with_status("Wydana do doręczenia"))
            .await
            .unwrap();

        assert_eq!(shipment.current_status, ShipmentStatus::OutForDelivery);
        assert!(shipment.is_consistent());
    }

    #[tokio::test]
    async fn test_create_with_unknown_status_falls_back() {
        let service = create_service();

        let shipment = service
            .create(NewShipment::new("A", "B").with_status("Zgubiona"))
            .await
            .unwrap();

        assert_eq!(shipment.current_status, ShipmentStatus::Submitted);
    }

    #[tokio::test]
    async fn test_update_appends_on_change() {
        let service = create_service();
        let created = service.create(NewShipment::new("A", "B")).await.unwrap();

        let updated = service
            .update(created.id, ShipmentPatch::status("Doręczona"), UpdateMode::Merge)
            .await
            .unwrap();

        assert_eq!(updated.current_status, ShipmentStatus::Delivered);
        assert_eq!(updated.status_history.len(), 2);
        assert_eq!(
            updated.status_history.as_slice()[0],
            created.status_history.as_slice()[0]
        );
        assert!(updated.is_consistent());
    }

    #[tokio::test]
    async fn test_update_same_status_does_not_append() {
        let service = create_service();
        let created = service.create(NewShipment::new("A", "B")).await.unwrap();

        let updated = service
            .update(created.id, ShipmentPatch::status("Nadana"), UpdateMode::Merge)
            .await
            .unwrap();

        assert_eq!(updated.status_history, created.status_history);
    }

    #[tokio::test]
    async fn test_update_invalid_status_leaves_record_untouched() {
        let service = create_service();
        let created = service.create(NewShipment::new("A", "B")).await.unwrap();

        let result = service
            .update(
                created.id,
                ShipmentPatch::status("Zgubiona").with_sender("X"),
                UpdateMode::Merge,
            )
            .await;

        assert!(matches!(
            result,
            Err(DomainError::InvalidStatus { ref received }) if received == &json!("Zgubiona")
        ));
        let stored = service.get(created.id).await.unwrap().unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn test_update_missing_shipment() {
        let service = create_service();

        let result = service
            .update(
                ShipmentId::new(9),
                ShipmentPatch::status("Doręczona"),
                UpdateMode::Merge,
            )
            .await;

        assert!(matches!(
            result,
            Err(DomainError::ShipmentNotFound { id }) if id == ShipmentId::new(9)
        ));
        assert_eq!(service.store().record_count().await, 0);
    }

    #[tokio::test]
    async fn test_replace_keeps_status_and_history() {
        let service = create_service();
        let created = service
            .create(NewShipment::new("A", "B").with_field("note", "fragile"))
            .await
            .unwrap();

        let replaced = service
            .update(
                created.id,
                ShipmentPatch::default().with_sender("C"),
                UpdateMode::Replace,
            )
            .await
            .unwrap();

        assert_eq!(replaced.sender, json!("C"));
        assert_eq!(replaced.receiver, serde_json::Value::Null);
        assert!(replaced.extra.get("note").is_none());
        assert_eq!(replaced.current_status, created.current_status);
        assert_eq!(replaced.status_history, created.status_history);
    }

    #[tokio::test]
    async fn test_track_projection() {
        let service = create_service();
        let created = service
            .create(NewShipment::new(json!({"name": "A"}), json!({"name": "B"})))
            .await
            .unwrap();

        let tracking = service.track(created.id).await.unwrap();

        assert_eq!(tracking.tracking_id, created.id);
        assert_eq!(tracking.current_status, ShipmentStatus::Submitted);
        assert_eq!(tracking.sender, json!({"name": "A"}));
        assert_eq!(tracking.status_history, created.status_history);
    }

    #[tokio::test]
    async fn test_track_missing() {
        let service = create_service();

        let result = service.track(ShipmentId::new(1)).await;
        assert!(matches!(result, Err(DomainError::ShipmentNotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let service = create_service();
        let created = service.create(NewShipment::new("A", "B")).await.unwrap();

        service.delete(created.id).await.unwrap();
        service.delete(created.id).await.unwrap();
        service.delete(ShipmentId::new(42)).await.unwrap();

        assert!(service.get(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let service = create_service();
        let first = service.create(NewShipment::new("A", "B")).await.unwrap();
        service.create(NewShipment::new("C", "D")).await.unwrap();
        service
            .update(first.id, ShipmentPatch::status("Doręczona"), UpdateMode::Merge)
            .await
            .unwrap();

        let delivered = service
            .list(RecordQuery::new().filter("currentStatus", "Doręczona"))
            .await
            .unwrap();

        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].id, first.id);
    }
}
