use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    /// Caller supplied something that is not a 24-hex-character ObjectId.
    ///
    /// Answered with 400 `INVALID_ID` on every route, reads included.
    #[error("Invalid user id: {0:?}")]
    InvalidIdentifier(String),

    /// Only raised by the handlers, the service reports absence as `None`
    #[error("{0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Password hashing error: {0}")]
    Hashing(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Store(err.to_string())
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidIdentifier(raw) => AppError::InvalidId(raw),
            UserError::NotFound(msg) => AppError::NotFound(msg),
            UserError::Store(detail) => AppError::Database(detail),
            UserError::Hashing(detail) => AppError::InternalServerError(detail),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
