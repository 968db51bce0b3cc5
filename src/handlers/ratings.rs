use axum::extract::Path;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::handlers::pool;
use crate::middleware::{identity_from_headers, ApiResponse, ApiResult, AuthUser};
use crate::services::{articles, ratings};

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: f64,
}

/// POST /api/v1/articles/:slug/rate - Rate an article (creates or replaces)
pub async fn rate(
    auth: AuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<RateRequest>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    let article = articles::get_by_slug(&pool, &slug).await?;

    let rating = ratings::rate(
        &pool,
        auth.user_id,
        article.id,
        article.author_id,
        payload.rating,
    )
    .await?;
    Ok(ApiResponse::created(json!({ "rating": rating })))
}

/// GET /api/v1/articles/:slug/rate - The caller's rating, or the aggregate
/// when unauthenticated or not yet rated (public)
pub async fn get(headers: HeaderMap, Path(slug): Path<String>) -> ApiResult<Value> {
    let pool = pool().await?;
    let viewer = identity_from_headers(&headers).map(|a| a.user_id);
    let article = articles::get_by_slug(&pool, &slug).await?;

    let report = ratings::report(&pool, viewer, article.id).await?;
    Ok(ApiResponse::success(json!({
        "article": article.slug,
        "rating": report
    })))
}

/// DELETE /api/v1/articles/:slug/rate - Remove the caller's rating
pub async fn delete(
    auth: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    let article = articles::get_by_slug(&pool, &slug).await?;

    ratings::delete(&pool, auth.user_id, article.id).await?;
    Ok(ApiResponse::success(json!({ "message": "Rating deleted" })))
}
