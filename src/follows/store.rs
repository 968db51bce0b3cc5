use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// Directed follow edges between profiles. At most one edge per ordered
/// pair, guaranteed by the table's composite primary key.
#[async_trait]
pub trait SocialGraphStore: Send + Sync {
    async fn exists(&self, follower_id: Uuid, followed_id: Uuid)
        -> Result<bool, DatabaseError>;

    async fn add(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), DatabaseError>;

    async fn remove(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), DatabaseError>;

    /// Profiles that follow the given profile.
    async fn followers_of(&self, profile_id: Uuid) -> Result<Vec<Uuid>, DatabaseError>;

    /// Profiles the given profile follows.
    async fn following_of(&self, profile_id: Uuid) -> Result<Vec<Uuid>, DatabaseError>;
}

/// Postgres-backed social graph store.
pub struct PgSocialGraphStore {
    pool: PgPool,
}

impl PgSocialGraphStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SocialGraphStore for PgSocialGraphStore {
    async fn exists(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM follows WHERE follower_id = $1 AND followed_id = $2)",
        )
        .bind(follower_id)
        .bind(followed_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn add(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), DatabaseError> {
        // A concurrent add for the same pair leaves one edge either way.
        sqlx::query(
            "INSERT INTO follows (follower_id, followed_id) VALUES ($1, $2)
             ON CONFLICT (follower_id, followed_id) DO NOTHING",
        )
        .bind(follower_id)
        .bind(followed_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2")
            .bind(follower_id)
            .bind(followed_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn followers_of(&self, profile_id: Uuid) -> Result<Vec<Uuid>, DatabaseError> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT follower_id FROM follows WHERE followed_id = $1 ORDER BY created_at",
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn following_of(&self, profile_id: Uuid) -> Result<Vec<Uuid>, DatabaseError> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT followed_id FROM follows WHERE follower_id = $1 ORDER BY created_at",
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory store used by engine tests.

    use super::*;
    use std::collections::BTreeSet;
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub struct MemorySocialGraphStore {
        edges: Mutex<BTreeSet<(Uuid, Uuid)>>,
    }

    impl MemorySocialGraphStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn edge_count(&self) -> usize {
            self.edges.lock().await.len()
        }
    }

    #[async_trait]
    impl SocialGraphStore for MemorySocialGraphStore {
        async fn exists(
            &self,
            follower_id: Uuid,
            followed_id: Uuid,
        ) -> Result<bool, DatabaseError> {
            Ok(self.edges.lock().await.contains(&(follower_id, followed_id)))
        }

        async fn add(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), DatabaseError> {
            self.edges.lock().await.insert((follower_id, followed_id));
            Ok(())
        }

        async fn remove(
            &self,
            follower_id: Uuid,
            followed_id: Uuid,
        ) -> Result<(), DatabaseError> {
            self.edges.lock().await.remove(&(follower_id, followed_id));
            Ok(())
        }

        async fn followers_of(&self, profile_id: Uuid) -> Result<Vec<Uuid>, DatabaseError> {
            Ok(self
                .edges
                .lock()
                .await
                .iter()
                .filter(|(_, followed)| *followed == profile_id)
                .map(|(follower, _)| *follower)
                .collect())
        }

        async fn following_of(&self, profile_id: Uuid) -> Result<Vec<Uuid>, DatabaseError> {
            Ok(self
                .edges
                .lock()
                .await
                .iter()
                .filter(|(follower, _)| *follower == profile_id)
                .map(|(_, followed)| *followed)
                .collect())
        }
    }
}
