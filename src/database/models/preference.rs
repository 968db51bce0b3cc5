use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Which entity collection a preference's subject_id points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
    Article,
    Comment,
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectKind::Article => write!(f, "article"),
            SubjectKind::Comment => write!(f, "comment"),
        }
    }
}

/// A user's expressed preference, stored as +1 / -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i16)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Like = 1,
    Dislike = -1,
}

/// Tagged reference to the entity a preference is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subject {
    pub kind: SubjectKind,
    pub id: Uuid,
}

impl Subject {
    pub fn article(id: Uuid) -> Self {
        Self { kind: SubjectKind::Article, id }
    }

    pub fn comment(id: Uuid) -> Self {
        Self { kind: SubjectKind::Comment, id }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Preference {
    pub id: Uuid,
    pub subject_kind: SubjectKind,
    pub subject_id: Uuid,
    pub user_id: Uuid,
    pub value: Reaction,
    pub created_at: DateTime<Utc>,
}

impl Preference {
    pub fn subject(&self) -> Subject {
        Subject { kind: self.subject_kind, id: self.subject_id }
    }
}
