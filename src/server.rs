use axum::{
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{articles, auth, comments, favorites, profiles, ratings, reactions, reading};

pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Accounts
        .route("/api/v1/users", post(auth::register))
        .route("/api/v1/users/login", post(auth::login))
        .route("/api/v1/users/verify/:token", get(auth::verify))
        .route("/api/v1/users/password_request", post(auth::password_request))
        .route("/api/v1/users/password_reset/:token", put(auth::password_reset))
        .route("/api/v1/user", get(auth::current_user).put(auth::update_user))
        // Profiles and the social graph
        .route("/api/v1/profiles", get(profiles::list))
        .route(
            "/api/v1/profiles/:username",
            get(profiles::get).patch(profiles::update),
        )
        .route("/api/v1/profiles/:username/follow", post(profiles::toggle_follow))
        .route("/api/v1/profiles/:username/followers", get(profiles::followers))
        .route("/api/v1/profiles/:username/following", get(profiles::following))
        // Articles and tags
        .route("/api/v1/articles", get(articles::list).post(articles::create))
        .route(
            "/api/v1/articles/:slug",
            get(articles::get)
                .put(articles::update)
                .delete(articles::delete),
        )
        .route("/api/v1/tags", get(articles::tags))
        .route("/api/v1/articles/:slug/share/:channel", post(articles::share))
        // Comments
        .route(
            "/api/v1/articles/:slug/comments",
            get(comments::list).post(comments::create),
        )
        .route(
            "/api/v1/articles/:slug/comments/:id",
            get(comments::get)
                .put(comments::update)
                .delete(comments::delete),
        )
        // Reactions
        .route("/api/v1/articles/:slug/like", post(reactions::like_article))
        .route("/api/v1/articles/:slug/dislike", post(reactions::dislike_article))
        .route(
            "/api/v1/articles/:slug/comments/:id/like",
            post(reactions::like_comment),
        )
        .route(
            "/api/v1/articles/:slug/comments/:id/dislike",
            post(reactions::dislike_comment),
        )
        // Ratings
        .route(
            "/api/v1/articles/:slug/rate",
            get(ratings::get).post(ratings::rate).delete(ratings::delete),
        )
        // Favorites
        .route("/api/v1/articles/:slug/favorite", post(favorites::favorite))
        .route("/api/v1/articles/:slug/unfavorite", post(favorites::unfavorite))
        .route("/api/v1/favorites", get(favorites::list))
        // Reading stats
        .route("/api/v1/read/:slug", post(reading::mark_read))
        .route("/api/v1/read-stats", get(reading::stats))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped.
pub async fn serve(port: u16) -> anyhow::Result<()> {
    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Listening on http://{}", bind_addr);
    axum::serve(listener, app()).await?;
    Ok(())
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Inkwell API",
            "version": version,
            "description": "Blogging platform backend API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "accounts": "/api/v1/users, /api/v1/users/login, /api/v1/user",
                "profiles": "/api/v1/profiles[/:username[/follow|/followers|/following]]",
                "articles": "/api/v1/articles[/:slug], /api/v1/tags",
                "comments": "/api/v1/articles/:slug/comments[/:id]",
                "reactions": "/api/v1/articles/:slug[/comments/:id]/like|dislike",
                "ratings": "/api/v1/articles/:slug/rate",
                "favorites": "/api/v1/articles/:slug/favorite|unfavorite, /api/v1/favorites",
                "reading": "/api/v1/read/:slug, /api/v1/read-stats",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
