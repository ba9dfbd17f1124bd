use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::error::DomainError;

/// Stable error code constants. Clients match on `code` from
/// `{"code": "...", "message": "..."}`; messages may be reworded.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const INVALID_SORT_DIRECTION: &str = "INVALID_SORT_DIRECTION";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
}

/// JSON transport wrapper for [`DomainError`].
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn error_code(&self) -> &'static str {
        match &self.0 {
            DomainError::NotFound(_) => error_code::NOT_FOUND,
            DomainError::Validation(_) => error_code::VALIDATION_FAILED,
            DomainError::InvalidSortDirection(_) => error_code::INVALID_SORT_DIRECTION,
            DomainError::Storage(_) => error_code::STORAGE_ERROR,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::InvalidSortDirection(_) => StatusCode::BAD_REQUEST,
            DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self { Self(e) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = serde_json::json!({
            "code": self.error_code(),
            "message": self.0.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
