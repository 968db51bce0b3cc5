use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::services::ServiceError;

/// Profile joined with its owning user's username, the shape every
/// profile endpoint responds with.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProfileView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub bio: String,
    pub image_url: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub location: String,
}

const VIEW_COLUMNS: &str = "p.id, p.user_id, u.username, p.bio, p.image_url, \
                            p.first_name, p.last_name, p.company, p.location";

pub async fn find_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<ProfileView, ServiceError> {
    sqlx::query_as::<_, ProfileView>(&format!(
        "SELECT {VIEW_COLUMNS} FROM profiles p
         JOIN users u ON u.id = p.user_id
         WHERE u.username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::NotFound(format!("Profile '{username}' does not exist")))
}

pub async fn find_by_user_id(pool: &PgPool, user_id: Uuid) -> Result<ProfileView, ServiceError> {
    sqlx::query_as::<_, ProfileView>(&format!(
        "SELECT {VIEW_COLUMNS} FROM profiles p
         JOIN users u ON u.id = p.user_id
         WHERE p.user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::NotFound("Profile does not exist".into()))
}

/// All profiles except the requester's own.
pub async fn list_others(
    pool: &PgPool,
    excluding_user_id: Uuid,
) -> Result<Vec<ProfileView>, ServiceError> {
    let profiles = sqlx::query_as::<_, ProfileView>(&format!(
        "SELECT {VIEW_COLUMNS} FROM profiles p
         JOIN users u ON u.id = p.user_id
         WHERE p.user_id <> $1
         ORDER BY u.username"
    ))
    .bind(excluding_user_id)
    .fetch_all(pool)
    .await?;
    Ok(profiles)
}

/// Fetch profiles for a set of profile ids, preserving no particular order.
pub async fn find_by_ids(
    pool: &PgPool,
    profile_ids: &[Uuid],
) -> Result<Vec<ProfileView>, ServiceError> {
    if profile_ids.is_empty() {
        return Ok(vec![]);
    }
    let profiles = sqlx::query_as::<_, ProfileView>(&format!(
        "SELECT {VIEW_COLUMNS} FROM profiles p
         JOIN users u ON u.id = p.user_id
         WHERE p.id = ANY($1)
         ORDER BY u.username"
    ))
    .bind(profile_ids)
    .fetch_all(pool)
    .await?;
    Ok(profiles)
}

#[derive(Debug, Default, Clone, serde::Deserialize)]
pub struct ProfileChanges {
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
}

/// Partial profile update. Only the owner may edit their profile; the
/// handler has already matched the authenticated user to `username`.
pub async fn update(
    pool: &PgPool,
    user_id: Uuid,
    changes: &ProfileChanges,
) -> Result<ProfileView, ServiceError> {
    let current = find_by_user_id(pool, user_id).await?;

    sqlx::query(
        "UPDATE profiles
         SET bio = $2, image_url = $3, first_name = $4, last_name = $5,
             company = $6, location = $7, updated_at = now()
         WHERE user_id = $1",
    )
    .bind(user_id)
    .bind(changes.bio.as_deref().unwrap_or(&current.bio))
    .bind(changes.image_url.as_deref().unwrap_or(&current.image_url))
    .bind(changes.first_name.as_deref().unwrap_or(&current.first_name))
    .bind(changes.last_name.as_deref().unwrap_or(&current.last_name))
    .bind(changes.company.as_deref().unwrap_or(&current.company))
    .bind(changes.location.as_deref().unwrap_or(&current.location))
    .execute(pool)
    .await?;

    find_by_user_id(pool, user_id).await
}
