//! Mapping of service failures onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use core_library::LibraryError;
use core_service::{FieldError, ServiceError, ValidationErrors};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

const VALIDATION_FAILED: &str = "Validation failed";
const INVALID_ID: &str = "Validation failed (numeric string is expected)";
const INTERNAL: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum ApiError {
    /// One or more query parameters were rejected.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// A path id that is not an integer.
    #[error("Invalid id '{0}'")]
    InvalidId(String),

    #[error("Internal error: {0}")]
    Internal(#[from] LibraryError),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => ApiError::Validation(errors),
            ServiceError::Library(err) => ApiError::Internal(err),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message: VALIDATION_FAILED,
                    errors: Some(errors.into_errors()),
                },
            ),
            ApiError::InvalidId(_) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message: INVALID_ID,
                    errors: None,
                },
            ),
            ApiError::Internal(err) => {
                error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        message: INTERNAL,
                        errors: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Parse a path id, rejecting anything but an optionally signed integer.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::InvalidId(raw.to_string()))
}
