use axum::extract::Path;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_token, Claims};
use crate::handlers::pool;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::users;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordRequestBody {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetBody {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UserUpdateRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/v1/users - Register a new account
///
/// Creates the user and its default profile in one transaction and queues a
/// verification mail. Responds with the user and a fresh access token.
pub async fn register(Json(payload): Json<RegisterRequest>) -> ApiResult<Value> {
    let pool = pool().await?;
    let (user, _profile) =
        users::register(&pool, &payload.email, &payload.username, &payload.password).await?;

    let token = generate_token(&Claims::access(
        user.id,
        user.username.clone(),
        user.email.clone(),
    ))?;

    Ok(ApiResponse::created(json!({ "user": user, "token": token })))
}

/// POST /api/v1/users/login - Authenticate and receive an access token
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<Value> {
    let pool = pool().await?;
    let user = users::login(&pool, &payload.email, &payload.password).await?;

    let token = generate_token(&Claims::access(
        user.id,
        user.username.clone(),
        user.email.clone(),
    ))?;

    Ok(ApiResponse::success(json!({ "user": user, "token": token })))
}

/// GET /api/v1/users/verify/:token - Redeem an email-verification token
pub async fn verify(Path(token): Path<String>) -> ApiResult<Value> {
    let pool = pool().await?;
    let user = users::verify_email(&pool, &token).await?;
    Ok(ApiResponse::success(json!({
        "user": user,
        "message": "Email verified"
    })))
}

/// POST /api/v1/users/password_request - Request a password-reset mail
pub async fn password_request(Json(payload): Json<PasswordRequestBody>) -> ApiResult<Value> {
    let pool = pool().await?;
    users::request_password_reset(&pool, &payload.email).await?;
    Ok(ApiResponse::success(json!({
        "message": "If the address is registered, a reset mail is on its way"
    })))
}

/// PUT /api/v1/users/password_reset/:token - Set a new password
pub async fn password_reset(
    Path(token): Path<String>,
    Json(payload): Json<PasswordResetBody>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    let user = users::reset_password(&pool, &token, &payload.password).await?;
    Ok(ApiResponse::success(json!({
        "user": user,
        "message": "Password updated"
    })))
}

/// GET /api/v1/user - Current account
pub async fn current_user(auth: AuthUser) -> ApiResult<Value> {
    let pool = pool().await?;
    let user = users::get(&pool, auth.user_id).await?;
    Ok(ApiResponse::success(json!({ "user": user })))
}

/// PUT /api/v1/user - Update the current account
pub async fn update_user(
    auth: AuthUser,
    Json(payload): Json<UserUpdateRequest>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    let user = users::update(
        &pool,
        auth.user_id,
        payload.email.as_deref(),
        payload.username.as_deref(),
        payload.password.as_deref(),
    )
    .await?;
    Ok(ApiResponse::success(json!({ "user": user })))
}
