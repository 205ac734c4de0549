//! Request handlers, one module per resource.
//!
//! Handlers read the raw query string into a map and let the service
//! criteria parser validate it, so every violation of a request is reported
//! at once.

pub mod albums;
pub mod songs;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// 200 with the value as JSON, or 204 with an empty body when absent.
pub(crate) fn json_or_no_content<T: Serialize>(value: Option<T>) -> Response {
    match value {
        Some(value) => (StatusCode::OK, Json(value)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
