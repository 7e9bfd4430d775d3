//! Mapping of application errors to HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use parley_core::error::ParleyError;
use serde_json::json;

/// Error returned by route handlers.
///
/// Renders as `{"success": false, "error": "<detail>"}` with the status
/// matching the error kind.
#[derive(Debug)]
pub struct ApiError(pub ParleyError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        status_for(&self.0)
    }
}

/// Status code for an application error.
pub fn status_for(err: &ParleyError) -> StatusCode {
    match err {
        ParleyError::NotFound { .. } => StatusCode::NOT_FOUND,
        ParleyError::Forbidden(_) => StatusCode::FORBIDDEN,
        ParleyError::InvalidRequest(_) | ParleyError::ProviderUnavailable(_) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ParleyError> for ApiError {
    fn from(err: ParleyError) -> Self {
        Self(err)
    }
}

/// Malformed or mistyped request bodies become `InvalidRequest`.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ParleyError::invalid_request(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("[Api] {}", self.0);
        } else {
            tracing::debug!("[Api] {}: {}", status, self.0);
        }

        (
            status,
            Json(json!({
                "success": false,
                "error": self.0.to_string(),
            })),
        )
            .into_response()
    }
}
