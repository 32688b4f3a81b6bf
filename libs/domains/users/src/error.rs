use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use validator::ValidationErrors;

use crate::models::UserLookup;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    Conflict(String),

    #[error("User with identifier {0} is incorrect or does not exist")]
    NotFound(UserLookup),

    /// Catch-all returned by `create_user`; the cause is only logged
    #[error("The request could not be completed")]
    Unknown,

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Verification email failed: {0}")]
    Notification(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Validation(errors) => AppError::Validation(errors),
            UserError::Conflict(msg) => AppError::Conflict(msg),
            e @ UserError::NotFound(_) => AppError::NotFound(e.to_string()),
            // 400, not 500
            e @ UserError::Unknown => AppError::BadRequest(e.to_string()),
            UserError::Database(e) => AppError::Database(e),
            UserError::Notification(msg) => AppError::BadGateway(msg),
            UserError::PasswordHash(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: UserError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(UserError::Validation(ValidationErrors::new())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(UserError::Conflict("email already registered".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(UserError::NotFound(UserLookup::Id(7))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of(UserError::Unknown), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(UserError::Database(sea_orm::DbErr::Custom("down".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(UserError::Notification("smtp".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(UserError::PasswordHash("salt".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message_names_identifier() {
        let err = UserError::NotFound(UserLookup::Username("alice".into()));
        assert_eq!(
            err.to_string(),
            "User with identifier alice is incorrect or does not exist"
        );
    }
}
