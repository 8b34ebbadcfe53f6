use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use marketplace_auth::AuthError;
use marketplace_core::{DomainError, ValidationErrors, messages};
use marketplace_infra::StoreError;

pub const NOT_AUTHENTICATED: &str = "Not authenticated";
pub const NOT_FOUND: &str = "Not found";
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const INTERNAL: &str = "Internal server error";

/// Every failure a controller can return, with its JSON envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("not authenticated")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("store failure: {0}")]
    Store(StoreError),

    #[error("internal failure: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidCredentials => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(errors) => json!({ "errors": errors }),
            ApiError::Unauthorized => json!({ "errors": NOT_AUTHENTICATED }),
            ApiError::NotFound => json!({ "errors": NOT_FOUND }),
            ApiError::MethodNotAllowed => json!({ "errors": METHOD_NOT_ALLOWED }),
            ApiError::InvalidCredentials => json!({ "errors": INVALID_CREDENTIALS }),
            ApiError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                json!({ "errors": INTERNAL })
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                json!({ "errors": INTERNAL })
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated => ApiError::Unauthorized,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation("email") => {
                ApiError::Validation(ValidationErrors::single("email", messages::TAKEN))
            }
            StoreError::MissingReference("product_ids") => {
                ApiError::Validation(ValidationErrors::single("product_ids", messages::INVALID))
            }
            StoreError::NotFound => ApiError::NotFound,
            other => ApiError::Store(other),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => ApiError::Validation(errors),
            DomainError::InvalidId(_) | DomainError::NotFound => ApiError::NotFound,
            DomainError::Unauthorized => ApiError::Unauthorized,
        }
    }
}
