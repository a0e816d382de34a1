//! Error handlers
//!
//! Maps registry errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use serde_json::json;

use crate::error::types::{RegistryError, StorageError};

/// Log a registry error once, at the severity its status code implies
pub fn handle_error(err: &RegistryError) {
    if error_to_status_code(err).is_server_error() {
        error!("Registry error: {err}");
    } else {
        warn!("Request rejected: {err}");
    }
}

/// Convert error to HTTP status code
pub fn error_to_status_code(err: &RegistryError) -> StatusCode {
    match err {
        RegistryError::Conflict => StatusCode::BAD_REQUEST,
        RegistryError::NotFound => StatusCode::NOT_FOUND,
        RegistryError::InvalidForm(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RegistryError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        RegistryError::Storage(StorageError::FileTooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
        RegistryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        RegistryError::Credential(_) => StatusCode::INTERNAL_SERVER_ERROR,
        RegistryError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Client-facing message; server-side failures are not described in detail
fn error_detail(err: &RegistryError, status: StatusCode) -> String {
    if status.is_server_error() {
        "Internal server error".to_string()
    } else {
        err.to_string()
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        handle_error(&self);
        let status = error_to_status_code(&self);
        let body = Json(json!({ "detail": error_detail(&self, status) }));
        (status, body).into_response()
    }
}
