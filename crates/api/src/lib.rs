//! HTTP API server for the shipment tracking service.
//!
//! Provides REST endpoints for creating, updating, tracking and deleting
//! shipments, with structured logging (tracing) and Prometheus metrics.
//! Every route is additionally served under a configurable alias prefix.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use domain::ShipmentService;
use metrics_exporter_prometheus::PrometheusHandle;
use record_store::RecordStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::{AppState, SharedState};

/// Name of the collection shipments are stored under.
pub const SHIPMENTS_COLLECTION: &str = "shipments";

/// Creates the Axum application router with all routes and shared state.
///
/// `api_prefix` mounts the same routes a second time under that prefix
/// (e.g. `/api/track/1`); an empty prefix disables the alias.
pub fn create_app<S: RecordStore + 'static>(
    state: SharedState<S>,
    metrics_handle: PrometheusHandle,
    api_prefix: &str,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    let mut router = shipment_routes::<S>();
    if !api_prefix.is_empty() {
        router = router.nest(api_prefix, shipment_routes::<S>());
    }

    router
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

fn shipment_routes<S: RecordStore + 'static>() -> Router<SharedState<S>> {
    use routes::{health, shipments, track};

    Router::new()
        .route("/health", get(health::check))
        .route(
            "/shipments",
            get(shipments::list::<S>).post(shipments::create::<S>),
        )
        .route(
            "/shipments/{id}",
            get(shipments::get::<S>)
                .patch(shipments::patch::<S>)
                .put(shipments::put::<S>)
                .delete(shipments::delete::<S>),
        )
        .route("/track/{id}", get(track::track::<S>))
}

/// Creates the application state around the given record store.
pub fn create_default_state<S: RecordStore + 'static>(store: S) -> SharedState<S> {
    Arc::new(AppState {
        shipment_service: ShipmentService::new(store),
    })
}
