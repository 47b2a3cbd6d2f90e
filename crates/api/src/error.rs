//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lifecycle::LifecycleError;
use projections::ProjectionError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client, optionally pinned to one field.
    BadRequest {
        field: Option<&'static str>,
        message: String,
    },
    /// Operation not valid in the resource's current state.
    Conflict(String),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, field, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, None, msg),
            ApiError::BadRequest { field, message } => (StatusCode::BAD_REQUEST, field, message),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, None, msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, None, msg)
            }
        };

        let body = match field {
            Some(field) => serde_json::json!({ "error": message, "field": field }),
            None => serde_json::json!({ "error": message }),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match &err {
            LifecycleError::Validation(validation) => ApiError::BadRequest {
                field: Some(validation.field),
                message: err.to_string(),
            },
            LifecycleError::OrderNotFound(_) => ApiError::NotFound(err.to_string()),
            LifecycleError::AlreadyArrived(_) => ApiError::Conflict(err.to_string()),
            // A failed reserve/restock against a missing item is the
            // caller's dangling reference, not a server fault.
            LifecycleError::InventoryAdjustment { source, .. } if source.is_not_found() => {
                ApiError::NotFound(err.to_string())
            }
            LifecycleError::InventoryAdjustment { .. } | LifecycleError::Store(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<ProjectionError> for ApiError {
    fn from(err: ProjectionError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<orders::ValidationError> for ApiError {
    fn from(err: orders::ValidationError) -> Self {
        ApiError::BadRequest {
            field: Some(err.field),
            message: err.to_string(),
        }
    }
}
