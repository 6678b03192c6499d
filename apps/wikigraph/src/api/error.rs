//! # API Error Mapping
//!
//! Converts [`WikiGraphError`] into an HTTP status plus a JSON body of the
//! form `{error, message, detail}`.
//!
//! | Error | Status |
//! |-------|--------|
//! | `Validation` | 400 |
//! | `NotFound` | 404 |
//! | `Connection` | 503 |
//! | anything else | 500 |
//!
//! Engine diagnostics only appear in `detail` when debug mode is on.

use super::types::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use wikigraph_core::WikiGraphError;

#[derive(Debug)]
pub struct ApiError {
    error: WikiGraphError,
    debug: bool,
}

impl ApiError {
    #[must_use]
    pub fn new(error: WikiGraphError, debug: bool) -> Self {
        Self { error, debug }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.error {
            WikiGraphError::Validation(_) => StatusCode::BAD_REQUEST,
            WikiGraphError::NotFound(_) => StatusCode::NOT_FOUND,
            WikiGraphError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        let detail = self.debug.then(|| self.error.to_string());
        let (error, message) = match &self.error {
            WikiGraphError::Validation(message) => ("ValidationError", message.clone()),
            WikiGraphError::NotFound(message) => ("NotFound", message.clone()),
            WikiGraphError::Connection(_) => (
                "ServiceUnavailable",
                "Graph database unavailable".to_string(),
            ),
            WikiGraphError::Query(_) => ("DatabaseError", "Database operation failed".to_string()),
            _ => (
                "InternalServerError",
                "An unexpected error occurred".to_string(),
            ),
        };
        ErrorResponse {
            error: error.to_string(),
            message,
            detail,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.error.is_client_error() {
            tracing::debug!(status = status.as_u16(), error = %self.error, "Request rejected");
        } else {
            tracing::error!(status = status.as_u16(), error = %self.error, "Request failed");
        }
        (status, Json(self.body())).into_response()
    }
}
