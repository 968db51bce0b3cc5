use axum::extract::Path;
use serde_json::{json, Value};

use crate::handlers::pool;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{articles, reading};

/// POST /api/v1/read/:slug - Mark an article as read
pub async fn mark_read(
    auth: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    let article = articles::get_by_slug(&pool, &slug).await?;

    let stat = reading::mark_read(&pool, auth.user_id, article.id).await?;
    Ok(ApiResponse::created(json!({ "read": stat })))
}

/// GET /api/v1/read-stats - The caller's reading summary
pub async fn stats(auth: AuthUser) -> ApiResult<Value> {
    let pool = pool().await?;
    let summary = reading::summary(&pool, auth.user_id).await?;
    Ok(ApiResponse::success(json!({ "stats": summary })))
}
