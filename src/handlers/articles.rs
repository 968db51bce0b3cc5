use axum::extract::{Path, Query};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::handlers::pool;
use crate::middleware::{identity_from_headers, ApiResponse, ApiResult, AuthUser};
use crate::pagination::{PageQuery, Paginated};
use crate::services::{articles, reading, share};

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub body: String,
    pub image_path: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub image_path: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Listing query: filters plus pagination in one query string.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    pub recipient: Option<String>,
}

/// GET /api/v1/articles - Filtered, paginated listing (public)
pub async fn list(headers: HeaderMap, Query(query): Query<ListQuery>) -> ApiResult<Value> {
    let pool = pool().await?;
    let viewer = identity_from_headers(&headers).map(|a| a.user_id);

    let filter = articles::ArticleFilter {
        title: query.title,
        author: query.author,
        tag: query.tag,
        search: query.search,
    };
    let page = PageQuery { page: query.page, page_size: query.page_size }.resolve();

    let (count, views) = articles::list(&pool, &filter, page, viewer).await?;
    Ok(ApiResponse::success(json!({
        "articles": Paginated::new(count, page, views)
    })))
}

/// POST /api/v1/articles - Create an article
pub async fn create(
    auth: AuthUser,
    Json(payload): Json<CreateArticleRequest>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    let article = articles::create(
        &pool,
        auth.user_id,
        &payload.title,
        &payload.body,
        payload.image_path.as_deref(),
        &payload.tags,
    )
    .await?;

    let view = articles::view(&pool, article, Some(auth.user_id)).await?;
    Ok(ApiResponse::created(json!({ "article": view })))
}

/// GET /api/v1/articles/:slug - One article (public)
///
/// An authenticated fetch also records the article as read for the viewer.
pub async fn get(headers: HeaderMap, Path(slug): Path<String>) -> ApiResult<Value> {
    let pool = pool().await?;
    let viewer = identity_from_headers(&headers).map(|a| a.user_id);

    let article = articles::get_by_slug(&pool, &slug).await?;
    if let Some(user_id) = viewer {
        reading::mark_read(&pool, user_id, article.id).await?;
    }

    let view = articles::view(&pool, article, viewer).await?;
    Ok(ApiResponse::success(json!({ "article": view })))
}

/// PUT /api/v1/articles/:slug - Owner-only update
pub async fn update(
    auth: AuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateArticleRequest>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    let article = articles::update(
        &pool,
        auth.user_id,
        &slug,
        payload.title.as_deref(),
        payload.body.as_deref(),
        payload.image_path.as_deref(),
        payload.tags.as_deref(),
    )
    .await?;

    let view = articles::view(&pool, article, Some(auth.user_id)).await?;
    Ok(ApiResponse::success(json!({ "article": view })))
}

/// DELETE /api/v1/articles/:slug - Owner-only delete
pub async fn delete(
    auth: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    articles::delete(&pool, auth.user_id, &slug).await?;
    Ok(ApiResponse::success(json!({ "message": "Article deleted" })))
}

/// GET /api/v1/tags - All tags (public)
pub async fn tags() -> ApiResult<Value> {
    let pool = pool().await?;
    let tags = articles::list_tags(&pool).await?;
    Ok(ApiResponse::success(json!({ "tags": tags })))
}

/// POST /api/v1/articles/:slug/share/:channel - Build a share link
pub async fn share(
    auth: AuthUser,
    Path((slug, channel)): Path<(String, String)>,
    payload: Option<Json<ShareRequest>>,
) -> ApiResult<Value> {
    let pool = pool().await?;
    // The article must exist before anything is shared.
    let article = articles::get_by_slug(&pool, &slug).await?;

    let recipient = payload.as_ref().and_then(|p| p.recipient.clone());
    let channel = share::ShareChannel::parse(&channel)?;
    let link = share::share_article(
        channel,
        &article.slug,
        &auth.username,
        recipient.as_deref(),
    )?;

    Ok(ApiResponse::success(json!({ "share": link })))
}
