//! Public tracking endpoint.

use axum::Json;
use axum::extract::{Path, State};
use domain::{DomainError, Tracking};
use record_store::RecordStore;
use serde_json::Value;

use super::{SharedState, parse_id};
use crate::error::ApiError;

/// GET /track/{id}: current status and full history of a shipment.
///
/// Unknown shipments answer 404 with the `SHIPMENT_NOT_FOUND` code and the
/// requested id echoed back; a non-numeric id is echoed as given.
#[tracing::instrument(skip(state))]
pub async fn track<S: RecordStore + 'static>(
    State(state): State<SharedState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Tracking>, ApiError> {
    let Some(shipment_id) = parse_id(&id) else {
        return Err(ApiError::TrackingNotFound {
            tracking_id: Value::String(id),
        });
    };

    match state.shipment_service.track(shipment_id).await {
        Ok(tracking) => Ok(Json(tracking)),
        Err(DomainError::ShipmentNotFound { id: missing }) => Err(ApiError::TrackingNotFound {
            tracking_id: Value::from(missing.as_u64()),
        }),
        Err(err) => Err(err.into()),
    }
}
