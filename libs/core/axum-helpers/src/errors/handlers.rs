use axum::response::{IntoResponse, Response};

use super::AppError;

/// Router fallback: JSON 404 instead of axum's empty body
pub async fn not_found() -> Response {
    AppError::NotFound("The requested resource was not found".to_string()).into_response()
}
