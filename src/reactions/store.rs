use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::preference::{Preference, Reaction, Subject, SubjectKind};

/// Errors from preference storage and the reaction engine built on it.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// More than one row matched a (subject_kind, subject_id, user_id) key.
    /// The unique constraint makes this unreachable; if it is ever observed
    /// the store surfaces it instead of picking a row silently.
    #[error("duplicate preference rows for {kind} {subject_id} by user {user_id}")]
    Duplicate {
        kind: SubjectKind,
        subject_id: Uuid,
        user_id: Uuid,
    },

    #[error(transparent)]
    Store(#[from] DatabaseError),
}

impl From<sqlx::Error> for PreferenceError {
    fn from(err: sqlx::Error) -> Self {
        PreferenceError::Store(DatabaseError::Sqlx(err))
    }
}

/// Row store for like/dislike preferences. One row per (subject, user) pair;
/// absence of a row means "no preference expressed".
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn find(&self, subject: Subject, user_id: Uuid)
        -> Result<Option<Preference>, PreferenceError>;

    /// Create a preference row. A concurrent create for the same key must
    /// resolve to exactly one surviving row; the loser of the race is
    /// converted into an update of the surviving row.
    async fn create(
        &self,
        subject: Subject,
        user_id: Uuid,
        value: Reaction,
    ) -> Result<Preference, PreferenceError>;

    async fn update_value(&self, id: Uuid, value: Reaction)
        -> Result<Preference, PreferenceError>;

    async fn delete(&self, id: Uuid) -> Result<(), PreferenceError>;

    /// Count rows with the given value, scoped to the subject.
    async fn count(&self, subject: Subject, value: Reaction) -> Result<i64, PreferenceError>;
}

/// Postgres-backed preference store.
pub struct PgPreferenceStore {
    pool: PgPool,
}

impl PgPreferenceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const COLUMNS: &str = "id, subject_kind, subject_id, user_id, value, created_at";

#[async_trait]
impl PreferenceStore for PgPreferenceStore {
    async fn find(
        &self,
        subject: Subject,
        user_id: Uuid,
    ) -> Result<Option<Preference>, PreferenceError> {
        let mut rows = sqlx::query_as::<_, Preference>(&format!(
            "SELECT {COLUMNS} FROM preferences
             WHERE subject_kind = $1 AND subject_id = $2 AND user_id = $3"
        ))
        .bind(subject.kind)
        .bind(subject.id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        if rows.len() > 1 {
            return Err(PreferenceError::Duplicate {
                kind: subject.kind,
                subject_id: subject.id,
                user_id,
            });
        }
        Ok(rows.pop())
    }

    async fn create(
        &self,
        subject: Subject,
        user_id: Uuid,
        value: Reaction,
    ) -> Result<Preference, PreferenceError> {
        // The upsert makes the read-decide-write race benign: two concurrent
        // first reactions both reach this statement, one inserts, the other
        // updates the surviving row in place of retrying.
        let row = sqlx::query_as::<_, Preference>(&format!(
            "INSERT INTO preferences (subject_kind, subject_id, user_id, value)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (subject_kind, subject_id, user_id)
             DO UPDATE SET value = EXCLUDED.value
             RETURNING {COLUMNS}"
        ))
        .bind(subject.kind)
        .bind(subject.id)
        .bind(user_id)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_value(
        &self,
        id: Uuid,
        value: Reaction,
    ) -> Result<Preference, PreferenceError> {
        let row = sqlx::query_as::<_, Preference>(&format!(
            "UPDATE preferences SET value = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| {
            PreferenceError::Store(DatabaseError::NotFound(format!("preference {id}")))
        })
    }

    async fn delete(&self, id: Uuid) -> Result<(), PreferenceError> {
        sqlx::query("DELETE FROM preferences WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count(&self, subject: Subject, value: Reaction) -> Result<i64, PreferenceError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM preferences
             WHERE subject_kind = $1 AND subject_id = $2 AND value = $3",
        )
        .bind(subject.kind)
        .bind(subject.id)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory store used by engine tests.

    use super::*;
    use chrono::Utc;
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryPreferenceStore {
        rows: Mutex<Vec<Preference>>,
    }

    impl MemoryPreferenceStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn rows_for(&self, subject: Subject, user_id: Uuid) -> usize {
            self.rows
                .lock()
                .await
                .iter()
                .filter(|p| p.subject() == subject && p.user_id == user_id)
                .count()
        }
    }

    #[async_trait]
    impl PreferenceStore for MemoryPreferenceStore {
        async fn find(
            &self,
            subject: Subject,
            user_id: Uuid,
        ) -> Result<Option<Preference>, PreferenceError> {
            let rows = self.rows.lock().await;
            let mut matched = rows
                .iter()
                .filter(|p| p.subject() == subject && p.user_id == user_id);
            match (matched.next(), matched.next()) {
                (row, None) => Ok(row.cloned()),
                _ => Err(PreferenceError::Duplicate {
                    kind: subject.kind,
                    subject_id: subject.id,
                    user_id,
                }),
            }
        }

        async fn create(
            &self,
            subject: Subject,
            user_id: Uuid,
            value: Reaction,
        ) -> Result<Preference, PreferenceError> {
            let mut rows = self.rows.lock().await;
            // Mirror the upsert: an existing row for the key is updated.
            if let Some(existing) = rows
                .iter_mut()
                .find(|p| p.subject() == subject && p.user_id == user_id)
            {
                existing.value = value;
                return Ok(existing.clone());
            }
            let row = Preference {
                id: Uuid::new_v4(),
                subject_kind: subject.kind,
                subject_id: subject.id,
                user_id,
                value,
                created_at: Utc::now(),
            };
            rows.push(row.clone());
            Ok(row)
        }

        async fn update_value(
            &self,
            id: Uuid,
            value: Reaction,
        ) -> Result<Preference, PreferenceError> {
            let mut rows = self.rows.lock().await;
            let row = rows.iter_mut().find(|p| p.id == id).ok_or_else(|| {
                PreferenceError::Store(DatabaseError::NotFound(format!("preference {id}")))
            })?;
            row.value = value;
            Ok(row.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<(), PreferenceError> {
            self.rows.lock().await.retain(|p| p.id != id);
            Ok(())
        }

        async fn count(&self, subject: Subject, value: Reaction) -> Result<i64, PreferenceError> {
            let rows = self.rows.lock().await;
            Ok(rows
                .iter()
                .filter(|p| p.subject() == subject && p.value == value)
                .count() as i64)
        }
    }
}
