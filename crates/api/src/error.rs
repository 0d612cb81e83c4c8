//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, ShipmentStatus};
use serde_json::{Value, json};

/// Error code returned when a tracking lookup finds nothing.
pub const SHIPMENT_NOT_FOUND: &str = "SHIPMENT_NOT_FOUND";

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Requested status is not one of the allowed statuses.
    InvalidStatus { received: Value },
    /// Tracking lookup for an unknown shipment; echoes the requested id.
    TrackingNotFound { tracking_id: Value },
    /// Domain logic error.
    Domain(DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::InvalidStatus { received } => invalid_status(received),
            ApiError::TrackingNotFound { tracking_id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "Shipment not found",
                    "code": SHIPMENT_NOT_FOUND,
                    "trackingId": tracking_id,
                }),
            ),
            ApiError::Domain(err) => domain_error_to_response(err),
        };

        (status, axum::Json(body)).into_response()
    }
}

fn invalid_status(received: Value) -> (StatusCode, Value) {
    (
        StatusCode::BAD_REQUEST,
        json!({
            "error": "Invalid status",
            "allowed": ShipmentStatus::allowed_names(),
            "received": received,
        }),
    )
}

fn internal(msg: String) -> (StatusCode, Value) {
    tracing::error!(error = %msg, "internal server error");
    (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, Value) {
    match err {
        DomainError::InvalidStatus { received } => invalid_status(received),
        DomainError::ShipmentNotFound { id } => (
            StatusCode::NOT_FOUND,
            json!({ "error": format!("Shipment {id} not found") }),
        ),
        err @ (DomainError::Store(_) | DomainError::Serialization(_)) => internal(err.to_string()),
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ShipmentId;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_invalid_status_body() {
        let (status, body) = render(ApiError::from(DomainError::InvalidStatus {
            received: json!("Zgubiona"),
        }))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid status");
        assert_eq!(body["received"], "Zgubiona");
        assert_eq!(body["allowed"].as_array().unwrap().len(), 4);
        assert_eq!(body["allowed"][0], "Nadana");
    }

    #[tokio::test]
    async fn test_tracking_not_found_body() {
        let (status, body) = render(ApiError::TrackingNotFound {
            tracking_id: json!(12),
        })
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({
                "error": "Shipment not found",
                "code": "SHIPMENT_NOT_FOUND",
                "trackingId": 12
            })
        );
    }

    #[tokio::test]
    async fn test_shipment_not_found_maps_to_404() {
        let (status, body) = render(ApiError::from(DomainError::ShipmentNotFound {
            id: ShipmentId::new(3),
        }))
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Shipment 3 not found");
    }

    #[tokio::test]
    async fn test_store_error_maps_to_500() {
        let err = DomainError::Store(record_store::StoreError::InvalidDocument(
            "broken".to_string(),
        ));
        let (status, _) = render(ApiError::from(err)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
