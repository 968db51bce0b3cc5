use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::read_stat::ReadStat;
use crate::services::ServiceError;

#[derive(Debug, Serialize)]
pub struct ReadSummary {
    pub articles_read: i64,
}

/// Record that a user has read an article. Re-reads are idempotent.
pub async fn mark_read(
    pool: &PgPool,
    user_id: Uuid,
    article_id: Uuid,
) -> Result<ReadStat, ServiceError> {
    let stat = sqlx::query_as::<_, ReadStat>(
        "INSERT INTO read_stats (user_id, article_id, article_read)
         VALUES ($1, $2, TRUE)
         ON CONFLICT (user_id, article_id)
         DO UPDATE SET article_read = TRUE, updated_at = now()
         RETURNING *",
    )
    .bind(user_id)
    .bind(article_id)
    .fetch_one(pool)
    .await?;
    Ok(stat)
}

pub async fn summary(pool: &PgPool, user_id: Uuid) -> Result<ReadSummary, ServiceError> {
    let articles_read: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM read_stats WHERE user_id = $1 AND article_read",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(ReadSummary { articles_read })
}
