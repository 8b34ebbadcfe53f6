use axum::http::StatusCode;

use crate::app::errors::ApiError;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
