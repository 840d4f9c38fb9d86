//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use dryplug_domain::error::DryPlugError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`DryPlugError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(DryPlugError);

impl From<DryPlugError> for ApiError {
    fn from(err: DryPlugError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DryPlugError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            DryPlugError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            DryPlugError::Reading(err) => (StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
            DryPlugError::Actuation(err) => {
                tracing::error!(error = %err, "actuation error");
                (StatusCode::BAD_GATEWAY, "switch command failed".to_string())
            }
            DryPlugError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
