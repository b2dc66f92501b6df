use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fueltrack_core::{AuthError, StoreError};
use serde::Serialize;
use thiserror::Error;

/// Failures a handler reports to the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Auth(AuthError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, "invalid_credentials")
            }
            AppError::Auth(AuthError::DuplicateUser(_)) => (StatusCode::CONFLICT, "duplicate_user"),
            AppError::Auth(AuthError::InvalidUsername) => {
                (StatusCode::BAD_REQUEST, "invalid_username")
            }
            AppError::Auth(AuthError::Store(_)) | AppError::Storage(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_code();

        // Store errors name file paths; keep them in the log only.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self);
            "Could not save your changes, please try again".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error, message })).into_response()
    }
}
