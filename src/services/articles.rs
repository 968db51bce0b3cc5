use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::article::{Article, Tag};
use crate::database::models::preference::{Reaction, Subject};
use crate::pagination::Page;
use crate::reactions::{PgPreferenceStore, PreferenceStore};
use crate::services::ServiceError;

/// Article joined with everything a client renders: author, tags, reaction
/// counts and the viewer's favorite flag.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleView {
    #[serde(flatten)]
    pub article: Article,
    pub author: String,
    pub tags: Vec<String>,
    pub like_count: i64,
    pub dislike_count: i64,
    pub favorited: bool,
}

/// Optional listing filters, all combined with AND.
#[derive(Debug, Default, Clone, serde::Deserialize)]
pub struct ArticleFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

impl ArticleFilter {
    fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.tag.is_none() && self.search.is_none()
    }
}

/// Derive a URL-safe slug from a title: lowercase, alphanumeric runs joined
/// by single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Slug uniqueness: take the plain slug if free, otherwise append the first
/// counter that is.
async fn unique_slug(pool: &PgPool, title: &str) -> Result<String, ServiceError> {
    let base = slugify(title);
    let base = if base.is_empty() { "article".to_string() } else { base };

    let mut candidate = base.clone();
    let mut counter = 1;
    loop {
        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM articles WHERE slug = $1)")
                .bind(&candidate)
                .fetch_one(pool)
                .await?;
        if !taken {
            return Ok(candidate);
        }
        candidate = format!("{base}-{counter}");
        counter += 1;
    }
}

pub async fn create(
    pool: &PgPool,
    author_id: Uuid,
    title: &str,
    body: &str,
    image_path: Option<&str>,
    tags: &[String],
) -> Result<Article, ServiceError> {
    if title.trim().is_empty() {
        return Err(ServiceError::Validation("Title may not be empty".into()));
    }
    if body.trim().is_empty() {
        return Err(ServiceError::Validation("Body may not be empty".into()));
    }

    let slug = unique_slug(pool, title).await?;

    let mut tx = pool.begin().await?;
    let article = sqlx::query_as::<_, Article>(
        "INSERT INTO articles (slug, title, body, image_path, author_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(&slug)
    .bind(title)
    .bind(body)
    .bind(image_path)
    .bind(author_id)
    .fetch_one(&mut *tx)
    .await?;

    attach_tags(&mut tx, article.id, tags).await?;
    tx.commit().await?;

    Ok(article)
}

pub async fn get_by_slug(pool: &PgPool, slug: &str) -> Result<Article, ServiceError> {
    sqlx::query_as::<_, Article>("SELECT * FROM articles WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Article '{slug}' does not exist")))
}

/// Owner-only partial update. The slug stays stable across edits.
pub async fn update(
    pool: &PgPool,
    actor_id: Uuid,
    slug: &str,
    title: Option<&str>,
    body: Option<&str>,
    image_path: Option<&str>,
    tags: Option<&[String]>,
) -> Result<Article, ServiceError> {
    let article = get_by_slug(pool, slug).await?;
    if article.author_id != actor_id {
        return Err(ServiceError::Forbidden(
            "Only the author may edit this article".into(),
        ));
    }

    let mut tx = pool.begin().await?;
    let article = sqlx::query_as::<_, Article>(
        "UPDATE articles
         SET title = $2, body = $3, image_path = $4, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(article.id)
    .bind(title.unwrap_or(&article.title))
    .bind(body.unwrap_or(&article.body))
    .bind(image_path.or(article.image_path.as_deref()))
    .fetch_one(&mut *tx)
    .await?;

    if let Some(tags) = tags {
        sqlx::query("DELETE FROM article_tags WHERE article_id = $1")
            .bind(article.id)
            .execute(&mut *tx)
            .await?;
        attach_tags(&mut tx, article.id, tags).await?;
    }
    tx.commit().await?;

    Ok(article)
}

pub async fn delete(pool: &PgPool, actor_id: Uuid, slug: &str) -> Result<(), ServiceError> {
    let article = get_by_slug(pool, slug).await?;
    if article.author_id != actor_id {
        return Err(ServiceError::Forbidden(
            "Only the author may delete this article".into(),
        ));
    }

    sqlx::query("DELETE FROM articles WHERE id = $1")
        .bind(article.id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Paginated, filtered listing returning fully composed views.
pub async fn list(
    pool: &PgPool,
    filter: &ArticleFilter,
    page: Page,
    viewer: Option<Uuid>,
) -> Result<(i64, Vec<ArticleView>), ServiceError> {
    let (where_clause, binds) = build_filter(filter);

    let count_sql = format!(
        "SELECT COUNT(DISTINCT a.id) FROM articles a
         JOIN users u ON u.id = a.author_id
         LEFT JOIN article_tags atg ON atg.article_id = a.id
         LEFT JOIN tags t ON t.id = atg.tag_id
         {where_clause}"
    );
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for bind in &binds {
        count_query = count_query.bind(bind.clone());
    }
    let count = count_query.fetch_one(pool).await?;

    let list_sql = format!(
        "SELECT DISTINCT a.* FROM articles a
         JOIN users u ON u.id = a.author_id
         LEFT JOIN article_tags atg ON atg.article_id = a.id
         LEFT JOIN tags t ON t.id = atg.tag_id
         {where_clause}
         ORDER BY a.created_at DESC
         LIMIT ${} OFFSET ${}",
        binds.len() + 1,
        binds.len() + 2
    );
    let mut list_query = sqlx::query_as::<_, Article>(&list_sql);
    for bind in &binds {
        list_query = list_query.bind(bind.clone());
    }
    let articles = list_query
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    let mut views = Vec::with_capacity(articles.len());
    for article in articles {
        views.push(view(pool, article, viewer).await?);
    }
    Ok((count, views))
}

fn build_filter(filter: &ArticleFilter) -> (String, Vec<String>) {
    if filter.is_empty() {
        return (String::new(), vec![]);
    }

    let mut conditions = Vec::new();
    let mut binds: Vec<String> = Vec::new();

    if let Some(title) = &filter.title {
        binds.push(format!("%{title}%"));
        conditions.push(format!("a.title ILIKE ${}", binds.len()));
    }
    if let Some(author) = &filter.author {
        binds.push(format!("%{author}%"));
        conditions.push(format!("u.username ILIKE ${}", binds.len()));
    }
    if let Some(tag) = &filter.tag {
        binds.push(format!("%{tag}%"));
        conditions.push(format!("t.tag ILIKE ${}", binds.len()));
    }
    if let Some(search) = &filter.search {
        binds.push(format!("%{search}%"));
        let n = binds.len();
        conditions.push(format!("(a.title ILIKE ${n} OR a.body ILIKE ${n})"));
    }

    (format!("WHERE {}", conditions.join(" AND ")), binds)
}

/// Compose the response view for one article.
pub async fn view(
    pool: &PgPool,
    article: Article,
    viewer: Option<Uuid>,
) -> Result<ArticleView, ServiceError> {
    let author: String = sqlx::query_scalar("SELECT username FROM users WHERE id = $1")
        .bind(article.author_id)
        .fetch_one(pool)
        .await?;

    let tags = tags_of(pool, article.id).await?;

    let store = PgPreferenceStore::new(pool.clone());
    let subject = Subject::article(article.id);
    let like_count = store.count(subject, Reaction::Like).await.map_err(store_err)?;
    let dislike_count = store.count(subject, Reaction::Dislike).await.map_err(store_err)?;

    let favorited = match viewer {
        Some(user_id) => {
            sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM favorites WHERE user_id = $1 AND article_id = $2)",
            )
            .bind(user_id)
            .bind(article.id)
            .fetch_one(pool)
            .await?
        }
        None => false,
    };

    Ok(ArticleView {
        article,
        author,
        tags,
        like_count,
        dislike_count,
        favorited,
    })
}

fn store_err(err: crate::reactions::PreferenceError) -> ServiceError {
    match err {
        crate::reactions::PreferenceError::Store(db) => ServiceError::Database(db),
        other => ServiceError::Conflict(other.to_string()),
    }
}

pub async fn tags_of(pool: &PgPool, article_id: Uuid) -> Result<Vec<String>, ServiceError> {
    let tags: Vec<String> = sqlx::query_scalar(
        "SELECT t.tag FROM tags t
         JOIN article_tags at ON at.tag_id = t.id
         WHERE at.article_id = $1
         ORDER BY t.tag",
    )
    .bind(article_id)
    .fetch_all(pool)
    .await?;
    Ok(tags)
}

pub async fn list_tags(pool: &PgPool) -> Result<Vec<Tag>, ServiceError> {
    let tags = sqlx::query_as::<_, Tag>("SELECT id, tag FROM tags ORDER BY tag")
        .fetch_all(pool)
        .await?;
    Ok(tags)
}

/// Upsert tags by name and link them to the article.
async fn attach_tags(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    article_id: Uuid,
    tags: &[String],
) -> Result<(), ServiceError> {
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        let tag_id: Uuid = sqlx::query_scalar(
            "INSERT INTO tags (tag) VALUES ($1)
             ON CONFLICT (tag) DO UPDATE SET tag = EXCLUDED.tag
             RETURNING id",
        )
        .bind(tag)
        .fetch_one(&mut **tx)
        .await?;

        sqlx::query(
            "INSERT INTO article_tags (article_id, tag_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(article_id)
        .bind(tag_id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_joins_alphanumeric_runs() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust &   Axum 101 "), "rust-axum-101");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn filter_builds_numbered_conditions() {
        let filter = ArticleFilter {
            title: Some("rust".into()),
            author: None,
            tag: Some("web".into()),
            search: None,
        };
        let (clause, binds) = build_filter(&filter);
        assert_eq!(clause, "WHERE a.title ILIKE $1 AND t.tag ILIKE $2");
        assert_eq!(binds, vec!["%rust%".to_string(), "%web%".to_string()]);
    }

    #[test]
    fn empty_filter_builds_no_clause() {
        let (clause, binds) = build_filter(&ArticleFilter::default());
        assert!(clause.is_empty());
        assert!(binds.is_empty());
    }
}
