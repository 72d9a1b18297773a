use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::registration::{Field, FieldErrors};

pub const MSG_RELAY_FAILED: &str = "Failed to connect to registration system";
pub const MSG_INTERNAL: &str = "Internal server error";

/// API error type with HTTP status code and per-field messages
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub errors: FieldErrors,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, errors: FieldErrors) -> Self {
        Self { status, errors }
    }

    /// Creates an error carrying one message under the `general` key
    pub fn general(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, FieldErrors::single(Field::General, message))
    }

    /// Creates a 400 Bad Request error from validation failures
    pub fn validation(errors: FieldErrors) -> Self {
        Self::new(StatusCode::BAD_REQUEST, errors)
    }

    /// Creates the 500 returned when the spreadsheet relay fails
    pub fn relay_failed() -> Self {
        Self::general(StatusCode::INTERNAL_SERVER_ERROR, MSG_RELAY_FAILED)
    }

    /// Creates a 500 Internal Server Error that hides the cause
    pub fn internal() -> Self {
        Self::general(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "errors": self.errors
        }));

        (self.status, body).into_response()
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self::validation(errors)
    }
}
