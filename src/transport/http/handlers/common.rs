use crate::domain::errors::RegistryError;
use crate::transport::http::types::{ApiResponse, AppState, RelayError};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

pub type HandlerError = (StatusCode, Json<ApiResponse>);

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse>) {
    match serde_json::to_value(data) {
        Ok(value) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(value),
                error: None,
            }),
        ),
        Err(e) => fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to serialize response: {}", e),
        ),
    }
}

pub fn fail(status: StatusCode, error: impl Into<String>) -> (StatusCode, Json<ApiResponse>) {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(error.into()),
        }),
    )
}

pub fn registry_error_status(e: &RegistryError) -> StatusCode {
    match e {
        RegistryError::Validation { .. } | RegistryError::WalletNotConnected => {
            StatusCode::BAD_REQUEST
        }
        RegistryError::DuplicateBatch { .. } => StatusCode::CONFLICT,
        RegistryError::NotFound { .. } => StatusCode::NOT_FOUND,
        RegistryError::Forbidden => StatusCode::FORBIDDEN,
        RegistryError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        RegistryError::Publish(_) | RegistryError::Persist(_) => StatusCode::BAD_GATEWAY,
    }
}

pub fn registry_error(e: RegistryError) -> HandlerError {
    fail(registry_error_status(&e), e.to_string())
}

/// Rejects the request unless the session is an authenticated admin.
pub async fn require_admin(state: &AppState) -> Result<(), HandlerError> {
    state.store.require_admin().await.map_err(registry_error)
}

pub fn json_400(err: JsonRejection, expected: &str) -> HandlerError {
    fail(
        StatusCode::BAD_REQUEST,
        format!("Invalid JSON body: {} (expected: {})", err, expected),
    )
}

pub fn relay_error(
    status: StatusCode,
    error: &str,
    details: Option<String>,
) -> (StatusCode, Json<RelayError>) {
    (
        status,
        Json(RelayError {
            error: error.to_string(),
            details,
        }),
    )
}
