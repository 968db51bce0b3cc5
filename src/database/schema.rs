use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;

/// Idempotent DDL for the application schema, executed statement by
/// statement (prepared statements cannot carry multiple commands).
const STATEMENTS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        email           TEXT NOT NULL UNIQUE,
        username        TEXT NOT NULL UNIQUE,
        password_hash   TEXT NOT NULL,
        password_salt   TEXT NOT NULL,
        is_verified     BOOLEAN NOT NULL DEFAULT FALSE,
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at      TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS profiles (
        id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id         UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
        bio             TEXT NOT NULL DEFAULT '',
        image_url       TEXT NOT NULL DEFAULT '',
        first_name      TEXT NOT NULL DEFAULT '',
        last_name       TEXT NOT NULL DEFAULT '',
        company         TEXT NOT NULL DEFAULT '',
        location        TEXT NOT NULL DEFAULT '',
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at      TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    // Directed follow edges. One row per ordered pair; a profile can never
    // follow itself, enforced here as well as at the engine boundary.
    r#"CREATE TABLE IF NOT EXISTS follows (
        follower_id     UUID NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
        followed_id     UUID NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (follower_id, followed_id),
        CHECK (follower_id <> followed_id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS articles (
        id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        slug            TEXT NOT NULL UNIQUE,
        title           TEXT NOT NULL,
        body            TEXT NOT NULL,
        image_path      TEXT,
        author_id       UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at      TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS tags (
        id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        tag             TEXT NOT NULL UNIQUE
    )"#,
    r#"CREATE TABLE IF NOT EXISTS article_tags (
        article_id      UUID NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
        tag_id          UUID NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
        PRIMARY KEY (article_id, tag_id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS comments (
        id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        article_id      UUID NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
        author_profile_id UUID NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
        body            TEXT NOT NULL,
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at      TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    // Like/dislike rows, polymorphic over articles and comments through the
    // (subject_kind, subject_id) pair. The unique constraint on the triple is
    // what keeps concurrent first reactions down to one surviving row.
    r#"CREATE TABLE IF NOT EXISTS preferences (
        id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        subject_kind    TEXT NOT NULL CHECK (subject_kind IN ('article', 'comment')),
        subject_id      UUID NOT NULL,
        user_id         UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        value           SMALLINT NOT NULL CHECK (value IN (1, -1)),
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (subject_kind, subject_id, user_id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS ratings (
        id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id         UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        article_id      UUID NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
        value           DOUBLE PRECISION NOT NULL CHECK (value >= 1.0 AND value <= 5.0),
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (user_id, article_id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS favorites (
        id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id         UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        article_id      UUID NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
        article_slug    TEXT NOT NULL,
        article_title   TEXT NOT NULL,
        article_url     TEXT NOT NULL,
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (user_id, article_id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS read_stats (
        id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id         UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        article_id      UUID NOT NULL REFERENCES articles(id) ON DELETE CASCADE,
        article_read    BOOLEAN NOT NULL DEFAULT TRUE,
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (user_id, article_id)
    )"#,
    r#"CREATE INDEX IF NOT EXISTS idx_preferences_subject
        ON preferences (subject_kind, subject_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_follows_followed
        ON follows (followed_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_articles_author
        ON articles (author_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_comments_article
        ON comments (article_id)"#,
];

/// Apply the schema to the given pool. Safe to run repeatedly.
pub async fn apply(pool: &PgPool) -> Result<(), DatabaseError> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Applied schema ({} statements)", STATEMENTS.len());
    Ok(())
}
