pub mod articles;
pub mod auth;
pub mod comments;
pub mod favorites;
pub mod profiles;
pub mod ratings;
pub mod reactions;
pub mod reading;

use sqlx::PgPool;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;

/// Shared pool accessor for handlers.
pub(crate) async fn pool() -> Result<PgPool, ApiError> {
    Ok(DatabaseManager::pool().await?)
}
