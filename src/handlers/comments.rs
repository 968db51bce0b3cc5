use axum::extract::Path;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::handlers::pool;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{articles, comments, profiles};

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub body: String,
}

/// POST /api/v1/articles/:slug/comments - Comment on an article
pub async fn create(
    auth: AuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<CommentRequest>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    let article = articles::get_by_slug(&pool, &slug).await?;
    let profile = profiles::find_by_user_id(&pool, auth.user_id).await?;

    let comment = comments::create(&pool, article.id, profile.id, &payload.body).await?;
    Ok(ApiResponse::created(json!({ "comment": comment })))
}

/// GET /api/v1/articles/:slug/comments - All comments on an article
pub async fn list(Path(slug): Path<String>) -> ApiResult<Value> {
    let pool = pool().await?;
    let article = articles::get_by_slug(&pool, &slug).await?;
    let comments = comments::list_for_article(&pool, article.id).await?;
    Ok(ApiResponse::success(json!({ "comments": comments })))
}

/// GET /api/v1/articles/:slug/comments/:id - One comment
pub async fn get(Path((slug, id)): Path<(String, Uuid)>) -> ApiResult<Value> {
    let pool = pool().await?;
    let article = articles::get_by_slug(&pool, &slug).await?;
    let comment = comments::get(&pool, article.id, id).await?;
    Ok(ApiResponse::success(json!({ "comment": comment })))
}

/// PUT /api/v1/articles/:slug/comments/:id - Author-only edit
pub async fn update(
    auth: AuthUser,
    Path((slug, id)): Path<(String, Uuid)>,
    Json(payload): Json<CommentRequest>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    let article = articles::get_by_slug(&pool, &slug).await?;
    let profile = profiles::find_by_user_id(&pool, auth.user_id).await?;

    let comment = comments::update(&pool, article.id, id, profile.id, &payload.body).await?;
    Ok(ApiResponse::success(json!({ "comment": comment })))
}

/// DELETE /api/v1/articles/:slug/comments/:id - Author-only delete
pub async fn delete(
    auth: AuthUser,
    Path((slug, id)): Path<(String, Uuid)>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    let article = articles::get_by_slug(&pool, &slug).await?;
    let profile = profiles::find_by_user_id(&pool, auth.user_id).await?;

    comments::delete(&pool, article.id, id, profile.id).await?;
    Ok(ApiResponse::success(json!({ "message": "Comment deleted" })))
}
