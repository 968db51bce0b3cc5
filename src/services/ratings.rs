use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::rating::Rating;
use crate::services::ServiceError;

/// What a rating fetch reports: the caller's own rating when they have one,
/// otherwise the aggregate for the article.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RatingReport {
    Own { your_rating: f64 },
    Aggregate { average_rating: f64, rate_count: i64 },
}

fn validate_value(value: f64) -> Result<(), ServiceError> {
    if !(1.0..=5.0).contains(&value) {
        return Err(ServiceError::Validation(
            "Rating must be between 1 and 5".into(),
        ));
    }
    Ok(())
}

/// Create or replace the caller's rating for an article. Authors may not
/// rate their own work.
pub async fn rate(
    pool: &PgPool,
    user_id: Uuid,
    article_id: Uuid,
    article_author_id: Uuid,
    value: f64,
) -> Result<Rating, ServiceError> {
    validate_value(value)?;
    if user_id == article_author_id {
        return Err(ServiceError::Forbidden(
            "You may not rate your own article".into(),
        ));
    }

    let rating = sqlx::query_as::<_, Rating>(
        "INSERT INTO ratings (user_id, article_id, value)
         VALUES ($1, $2, $3)
         ON CONFLICT (user_id, article_id)
         DO UPDATE SET value = EXCLUDED.value, updated_at = now()
         RETURNING *",
    )
    .bind(user_id)
    .bind(article_id)
    .bind(value)
    .fetch_one(pool)
    .await?;
    Ok(rating)
}

pub async fn report(
    pool: &PgPool,
    viewer: Option<Uuid>,
    article_id: Uuid,
) -> Result<RatingReport, ServiceError> {
    if let Some(user_id) = viewer {
        let own: Option<f64> = sqlx::query_scalar(
            "SELECT value FROM ratings WHERE user_id = $1 AND article_id = $2",
        )
        .bind(user_id)
        .bind(article_id)
        .fetch_optional(pool)
        .await?;
        if let Some(value) = own {
            return Ok(RatingReport::Own { your_rating: value });
        }
    }

    let (average, count): (Option<f64>, i64) = sqlx::query_as(
        "SELECT AVG(value), COUNT(*) FROM ratings WHERE article_id = $1",
    )
    .bind(article_id)
    .fetch_one(pool)
    .await?;

    Ok(RatingReport::Aggregate {
        average_rating: average.unwrap_or(0.0),
        rate_count: count,
    })
}

pub async fn delete(
    pool: &PgPool,
    user_id: Uuid,
    article_id: Uuid,
) -> Result<(), ServiceError> {
    let deleted = sqlx::query("DELETE FROM ratings WHERE user_id = $1 AND article_id = $2")
        .bind(user_id)
        .bind(article_id)
        .execute(pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(ServiceError::NotFound(
            "You have not rated this article".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(validate_value(1.0).is_ok());
        assert!(validate_value(5.0).is_ok());
        assert!(validate_value(3.5).is_ok());
        assert!(validate_value(0.9).is_err());
        assert!(validate_value(5.1).is_err());
        assert!(validate_value(f64::NAN).is_err());
    }
}
