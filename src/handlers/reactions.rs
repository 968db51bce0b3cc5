use axum::extract::Path;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::preference::{Reaction, Subject};
use crate::handlers::pool;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::reactions::{PgPreferenceStore, ReactionEngine};
use crate::services::{articles, comments};

/// Run the reaction state machine for the authenticated user on an already
/// resolved subject. Repeating a reaction clears it; the opposite reaction
/// flips it in one step.
async fn react_on(
    subject: Subject,
    user_id: Uuid,
    desired: Reaction,
) -> Result<ApiResponse<Value>, crate::error::ApiError> {
    let pool = pool().await?;
    let engine = ReactionEngine::new(PgPreferenceStore::new(pool));
    let outcome = engine.react(subject, user_id, desired).await?;

    Ok(ApiResponse::created(json!({
        "state": outcome.state,
        "like_count": outcome.like_count,
        "dislike_count": outcome.dislike_count
    })))
}

/// POST /api/v1/articles/:slug/like
pub async fn like_article(
    auth: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    let article = articles::get_by_slug(&pool, &slug).await?;
    react_on(Subject::article(article.id), auth.user_id, Reaction::Like).await
}

/// POST /api/v1/articles/:slug/dislike
pub async fn dislike_article(
    auth: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    let article = articles::get_by_slug(&pool, &slug).await?;
    react_on(Subject::article(article.id), auth.user_id, Reaction::Dislike).await
}

/// POST /api/v1/articles/:slug/comments/:id/like
pub async fn like_comment(
    auth: AuthUser,
    Path((slug, id)): Path<(String, Uuid)>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    let article = articles::get_by_slug(&pool, &slug).await?;
    let comment = comments::get(&pool, article.id, id).await?;
    react_on(Subject::comment(comment.id), auth.user_id, Reaction::Like).await
}

/// POST /api/v1/articles/:slug/comments/:id/dislike
pub async fn dislike_comment(
    auth: AuthUser,
    Path((slug, id)): Path<(String, Uuid)>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    let article = articles::get_by_slug(&pool, &slug).await?;
    let comment = comments::get(&pool, article.id, id).await?;
    react_on(Subject::comment(comment.id), auth.user_id, Reaction::Dislike).await
}
