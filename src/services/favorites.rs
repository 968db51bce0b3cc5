use sqlx::PgPool;
use url::Url;
use uuid::Uuid;

use crate::config;
use crate::database::models::article::Article;
use crate::database::models::favorite::Favorite;
use crate::services::ServiceError;

/// Public link to an article, stored on the favorite as a snapshot.
pub fn article_url(slug: &str) -> Result<String, ServiceError> {
    let base = &config::config().server.public_url;
    let url = Url::parse(base)
        .and_then(|u| u.join(&format!("/api/v1/articles/{slug}")))
        .map_err(|e| ServiceError::Validation(format!("Invalid public URL: {e}")))?;
    Ok(url.to_string())
}

pub async fn favorite(
    pool: &PgPool,
    user_id: Uuid,
    article: &Article,
) -> Result<Favorite, ServiceError> {
    let already: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM favorites WHERE user_id = $1 AND article_id = $2)",
    )
    .bind(user_id)
    .bind(article.id)
    .fetch_one(pool)
    .await?;
    if already {
        return Err(ServiceError::Conflict(
            "Article is already in your favorites".into(),
        ));
    }

    let url = article_url(&article.slug)?;
    let favorite = sqlx::query_as::<_, Favorite>(
        "INSERT INTO favorites (user_id, article_id, article_slug, article_title, article_url)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (user_id, article_id) DO NOTHING
         RETURNING *",
    )
    .bind(user_id)
    .bind(article.id)
    .bind(&article.slug)
    .bind(&article.title)
    .bind(&url)
    .fetch_optional(pool)
    .await?;

    // A concurrent favorite can win the insert; report it the same way.
    favorite.ok_or_else(|| {
        ServiceError::Conflict("Article is already in your favorites".into())
    })
}

pub async fn unfavorite(
    pool: &PgPool,
    user_id: Uuid,
    article_id: Uuid,
) -> Result<(), ServiceError> {
    let deleted = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND article_id = $2")
        .bind(user_id)
        .bind(article_id)
        .execute(pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(ServiceError::NotFound(
            "Article is not in your favorites".into(),
        ));
    }
    Ok(())
}

pub async fn list_own(pool: &PgPool, user_id: Uuid) -> Result<Vec<Favorite>, ServiceError> {
    let favorites = sqlx::query_as::<_, Favorite>(
        "SELECT * FROM favorites WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(favorites)
}
