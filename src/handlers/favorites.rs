use axum::extract::Path;
use serde_json::{json, Value};

use crate::handlers::pool;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{articles, favorites};

/// POST /api/v1/articles/:slug/favorite - Add to the caller's favorites
pub async fn favorite(
    auth: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    let article = articles::get_by_slug(&pool, &slug).await?;

    let favorite = favorites::favorite(&pool, auth.user_id, &article).await?;
    Ok(ApiResponse::created(json!({ "favorite": favorite })))
}

/// POST /api/v1/articles/:slug/unfavorite - Remove from the caller's favorites
pub async fn unfavorite(
    auth: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    let article = articles::get_by_slug(&pool, &slug).await?;

    favorites::unfavorite(&pool, auth.user_id, article.id).await?;
    Ok(ApiResponse::success(json!({ "message": "Favorite removed" })))
}

/// GET /api/v1/favorites - The caller's favorites
pub async fn list(auth: AuthUser) -> ApiResult<Value> {
    let pool = pool().await?;
    let favorites = favorites::list_own(&pool, auth.user_id).await?;
    Ok(ApiResponse::success(json!({ "favorites": favorites })))
}
