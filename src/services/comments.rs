use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::models::comment::Comment;
use crate::services::ServiceError;

/// Comment joined with its author's username.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommentView {
    pub id: Uuid,
    pub article_id: Uuid,
    pub author: String,
    pub body: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

const VIEW_COLUMNS: &str = "c.id, c.article_id, u.username AS author, c.body, \
                            c.created_at, c.updated_at";

pub async fn create(
    pool: &PgPool,
    article_id: Uuid,
    author_profile_id: Uuid,
    body: &str,
) -> Result<Comment, ServiceError> {
    if body.trim().is_empty() {
        return Err(ServiceError::Validation("Comment body may not be empty".into()));
    }

    let comment = sqlx::query_as::<_, Comment>(
        "INSERT INTO comments (article_id, author_profile_id, body)
         VALUES ($1, $2, $3)
         RETURNING *",
    )
    .bind(article_id)
    .bind(author_profile_id)
    .bind(body)
    .fetch_one(pool)
    .await?;
    Ok(comment)
}

pub async fn list_for_article(
    pool: &PgPool,
    article_id: Uuid,
) -> Result<Vec<CommentView>, ServiceError> {
    let comments = sqlx::query_as::<_, CommentView>(&format!(
        "SELECT {VIEW_COLUMNS} FROM comments c
         JOIN profiles p ON p.id = c.author_profile_id
         JOIN users u ON u.id = p.user_id
         WHERE c.article_id = $1
         ORDER BY c.created_at"
    ))
    .bind(article_id)
    .fetch_all(pool)
    .await?;
    Ok(comments)
}

/// Fetch one comment, checking it belongs to the given article.
pub async fn get(
    pool: &PgPool,
    article_id: Uuid,
    comment_id: Uuid,
) -> Result<Comment, ServiceError> {
    sqlx::query_as::<_, Comment>(
        "SELECT * FROM comments WHERE id = $1 AND article_id = $2",
    )
    .bind(comment_id)
    .bind(article_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::NotFound("Comment does not exist".into()))
}

pub async fn update(
    pool: &PgPool,
    article_id: Uuid,
    comment_id: Uuid,
    actor_profile_id: Uuid,
    body: &str,
) -> Result<Comment, ServiceError> {
    let comment = get(pool, article_id, comment_id).await?;
    if comment.author_profile_id != actor_profile_id {
        return Err(ServiceError::Forbidden(
            "Only the author may edit this comment".into(),
        ));
    }
    if body.trim().is_empty() {
        return Err(ServiceError::Validation("Comment body may not be empty".into()));
    }

    let comment = sqlx::query_as::<_, Comment>(
        "UPDATE comments SET body = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(comment_id)
    .bind(body)
    .fetch_one(pool)
    .await?;
    Ok(comment)
}

pub async fn delete(
    pool: &PgPool,
    article_id: Uuid,
    comment_id: Uuid,
    actor_profile_id: Uuid,
) -> Result<(), ServiceError> {
    let comment = get(pool, article_id, comment_id).await?;
    if comment.author_profile_id != actor_profile_id {
        return Err(ServiceError::Forbidden(
            "Only the author may delete this comment".into(),
        ));
    }

    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;
    Ok(())
}
