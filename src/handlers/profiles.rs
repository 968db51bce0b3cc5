use axum::extract::Path;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::follows::{FollowEngine, PgSocialGraphStore};
use crate::handlers::pool;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::profiles;

/// GET /api/v1/profiles - All profiles except the requester's
pub async fn list(auth: AuthUser) -> ApiResult<Value> {
    let pool = pool().await?;
    let profiles = profiles::list_others(&pool, auth.user_id).await?;
    Ok(ApiResponse::success(json!({ "profiles": profiles })))
}

/// GET /api/v1/profiles/:username - One profile, with the viewer's follow flag
pub async fn get(
    auth: AuthUser,
    Path(username): Path<String>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    let profile = profiles::find_by_username(&pool, &username).await?;
    let viewer = profiles::find_by_user_id(&pool, auth.user_id).await?;

    let engine = FollowEngine::new(PgSocialGraphStore::new(pool));
    let following = engine.is_following(viewer.id, profile.id).await?;

    Ok(ApiResponse::success(json!({
        "profile": profile,
        "following": following
    })))
}

/// PATCH /api/v1/profiles/:username - Owner-only partial update
pub async fn update(
    auth: AuthUser,
    Path(username): Path<String>,
    Json(changes): Json<profiles::ProfileChanges>,
) -> ApiResult<Value> {
    if auth.username != username {
        return Err(ApiError::forbidden("You may only update your own profile"));
    }

    let pool = pool().await?;
    let profile = profiles::update(&pool, auth.user_id, &changes).await?;
    Ok(ApiResponse::success(json!({ "profile": profile })))
}

/// POST /api/v1/profiles/:username/follow - Toggle following the profile
///
/// The self-follow check happens here, where the acting identity is known;
/// the follow engine keeps its own backstop.
pub async fn toggle_follow(
    auth: AuthUser,
    Path(username): Path<String>,
) -> ApiResult<Value> {
    if auth.username == username {
        return Err(ApiError::bad_request("You cannot follow yourself"));
    }

    let pool = pool().await?;
    let target = profiles::find_by_username(&pool, &username).await?;
    let actor = profiles::find_by_user_id(&pool, auth.user_id).await?;

    let engine = FollowEngine::new(PgSocialGraphStore::new(pool));
    let state = engine.toggle_follow(actor.id, target.id).await?;

    Ok(ApiResponse::created(json!({
        "profile": target,
        "state": state
    })))
}

/// GET /api/v1/profiles/:username/followers - Who follows this profile
pub async fn followers(Path(username): Path<String>) -> ApiResult<Value> {
    let pool = pool().await?;
    let profile = profiles::find_by_username(&pool, &username).await?;

    let engine = FollowEngine::new(PgSocialGraphStore::new(pool.clone()));
    let ids = engine.list_followers(profile.id).await?;
    let followers = profiles::find_by_ids(&pool, &ids).await?;

    Ok(ApiResponse::success(json!({ "followers": followers })))
}

/// GET /api/v1/profiles/:username/following - Who this profile follows
pub async fn following(Path(username): Path<String>) -> ApiResult<Value> {
    let pool = pool().await?;
    let profile = profiles::find_by_username(&pool, &username).await?;

    let engine = FollowEngine::new(PgSocialGraphStore::new(pool.clone()));
    let ids = engine.list_following(profile.id).await?;
    let following = profiles::find_by_ids(&pool, &ids).await?;

    Ok(ApiResponse::success(json!({ "following": following })))
}
