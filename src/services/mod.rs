pub mod articles;
pub mod comments;
pub mod favorites;
pub mod mailer;
pub mod profiles;
pub mod ratings;
pub mod reading;
pub mod share;
pub mod users;

use thiserror::Error;

use crate::auth::TokenError;
use crate::database::manager::DatabaseError;
use crate::error::ApiError;

/// Errors raised by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Database(DatabaseError::Sqlx(err))
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => ApiError::unprocessable_entity(msg),
            ServiceError::Forbidden(msg) => ApiError::forbidden(msg),
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::Conflict(msg) => ApiError::conflict(msg),
            ServiceError::Database(db) => db.into(),
            ServiceError::Token(tok) => tok.into(),
        }
    }
}
