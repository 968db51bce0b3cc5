use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub article_id: Uuid,
    pub article_slug: String,
    pub article_title: String,
    pub article_url: String,
    pub created_at: DateTime<Utc>,
}
