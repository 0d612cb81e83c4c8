//! Shipment CRUD endpoints.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use domain::{NewShipment, Shipment, ShipmentPatch, UpdateMode};
use record_store::{RecordQuery, RecordStore};

use super::{SharedState, parse_id};
use crate::error::ApiError;

/// Page size used when `_page` is given without `_limit`.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// POST /shipments: create a shipment with a seeded status history.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: RecordStore + 'static>(
    State(state): State<SharedState<S>>,
    Json(req): Json<NewShipment>,
) -> Result<(StatusCode, Json<Shipment>), ApiError> {
    let shipment = state.shipment_service.create(req).await?;
    Ok((StatusCode::CREATED, Json(shipment)))
}

/// GET /shipments: list shipments, with optional paging and field filters.
#[tracing::instrument(skip(state))]
pub async fn list<S: RecordStore + 'static>(
    State(state): State<SharedState<S>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Shipment>>, ApiError> {
    let query = list_query(params)?;
    Ok(Json(state.shipment_service.list(query).await?))
}

/// GET /shipments/{id}: load a single shipment.
#[tracing::instrument(skip(state))]
pub async fn get<S: RecordStore + 'static>(
    State(state): State<SharedState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Shipment>, ApiError> {
    let not_found = || ApiError::NotFound(format!("Shipment {id} not found"));
    let shipment_id = parse_id(&id).ok_or_else(not_found)?;

    state
        .shipment_service
        .get(shipment_id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// PATCH /shipments/{id}: update the supplied fields.
#[tracing::instrument(skip(state, req))]
pub async fn patch<S: RecordStore + 'static>(
    state: State<SharedState<S>>,
    id: Path<String>,
    req: Json<ShipmentPatch>,
) -> Result<Json<Shipment>, ApiError> {
    update(state, id, req, UpdateMode::Merge).await
}

/// PUT /shipments/{id}: replace the client-owned fields.
#[tracing::instrument(skip(state, req))]
pub async fn put<S: RecordStore + 'static>(
    state: State<SharedState<S>>,
    id: Path<String>,
    req: Json<ShipmentPatch>,
) -> Result<Json<Shipment>, ApiError> {
    update(state, id, req, UpdateMode::Replace).await
}

async fn update<S: RecordStore + 'static>(
    State(state): State<SharedState<S>>,
    Path(id): Path<String>,
    Json(req): Json<ShipmentPatch>,
    mode: UpdateMode,
) -> Result<Json<Shipment>, ApiError> {
    let shipment_id =
        parse_id(&id).ok_or_else(|| ApiError::NotFound(format!("Shipment {id} not found")))?;

    let shipment = state
        .shipment_service
        .update(shipment_id, req, mode)
        .await?;
    Ok(Json(shipment))
}

/// DELETE /shipments/{id}: remove a shipment.
///
/// Always answers 204 with an empty body, whether or not it existed.
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecordStore + 'static>(
    State(state): State<SharedState<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if let Some(shipment_id) = parse_id(&id) {
        state.shipment_service.delete(shipment_id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Builds a record query from list parameters.
///
/// `_start` skips records, `_limit` caps the result, `_page` selects a
/// 1-based page of `_limit` (or [`DEFAULT_PAGE_SIZE`]) records. Every other
/// parameter filters on the top-level field of the same name.
pub fn list_query(params: HashMap<String, String>) -> Result<RecordQuery, ApiError> {
    let mut query = RecordQuery::new();
    let mut page = None;

    let mut params: Vec<_> = params.into_iter().collect();
    params.sort();

    for (key, value) in params {
        match key.as_str() {
            "_start" => query = query.offset(parse_count(&key, &value)?),
            "_limit" => query = query.limit(parse_count(&key, &value)?),
            "_page" => page = Some(parse_count(&key, &value)?),
            _ => query = query.filter(key, value),
        }
    }

    if let Some(page) = page {
        let per_page = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        query = query.page(page, per_page);
    }
    Ok(query)
}

fn parse_count(key: &str, value: &str) -> Result<usize, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {key}: {value:?}")))
}
