use serde::Serialize;
use uuid::Uuid;

use crate::database::models::preference::{Reaction, Subject};
use crate::reactions::store::{PreferenceError, PreferenceStore};

/// Resulting preference state for one (subject, user) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionState {
    Liked,
    Disliked,
    NoPreference,
}

impl From<Reaction> for ReactionState {
    fn from(value: Reaction) -> Self {
        match value {
            Reaction::Like => ReactionState::Liked,
            Reaction::Dislike => ReactionState::Disliked,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReactionOutcome {
    pub state: ReactionState,
    pub like_count: i64,
    pub dislike_count: i64,
}

/// React/toggle/undo state machine over a [`PreferenceStore`].
///
/// Each (subject, user) pair moves between NoPreference, Liked and Disliked:
/// a first reaction creates the row, the opposite reaction flips it in one
/// step, and repeating the current reaction deletes it (undo). Subject
/// existence is the caller's concern; by the time `react` runs the subject
/// has already been resolved.
pub struct ReactionEngine<S> {
    store: S,
}

impl<S: PreferenceStore> ReactionEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn react(
        &self,
        subject: Subject,
        user_id: Uuid,
        desired: Reaction,
    ) -> Result<ReactionOutcome, PreferenceError> {
        let state = match self.store.find(subject, user_id).await? {
            None => {
                self.store.create(subject, user_id, desired).await?;
                ReactionState::from(desired)
            }
            Some(existing) if existing.value != desired => {
                self.store.update_value(existing.id, desired).await?;
                ReactionState::from(desired)
            }
            Some(existing) => {
                // Repeating the same reaction is an undo.
                self.store.delete(existing.id).await?;
                ReactionState::NoPreference
            }
        };

        let like_count = self.store.count(subject, Reaction::Like).await?;
        let dislike_count = self.store.count(subject, Reaction::Dislike).await?;

        Ok(ReactionOutcome { state, like_count, dislike_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactions::store::memory::MemoryPreferenceStore;

    fn subjects() -> (Subject, Subject) {
        (Subject::article(Uuid::new_v4()), Subject::comment(Uuid::new_v4()))
    }

    #[tokio::test]
    async fn first_reaction_creates_preference() {
        let engine = ReactionEngine::new(MemoryPreferenceStore::new());
        let (article, _) = subjects();
        let user = Uuid::new_v4();

        let out = engine.react(article, user, Reaction::Like).await.unwrap();
        assert_eq!(out.state, ReactionState::Liked);
        assert_eq!(out.like_count, 1);
        assert_eq!(out.dislike_count, 0);
    }

    #[tokio::test]
    async fn repeating_reaction_is_undo_and_third_reapplies() {
        let engine = ReactionEngine::new(MemoryPreferenceStore::new());
        let (article, _) = subjects();
        let user = Uuid::new_v4();

        engine.react(article, user, Reaction::Like).await.unwrap();
        let undo = engine.react(article, user, Reaction::Like).await.unwrap();
        assert_eq!(undo.state, ReactionState::NoPreference);
        assert_eq!(undo.like_count, 0);

        let again = engine.react(article, user, Reaction::Like).await.unwrap();
        assert_eq!(again.state, ReactionState::Liked);
        assert_eq!(again.like_count, 1);
    }

    #[tokio::test]
    async fn opposite_reaction_flips_in_one_step() {
        let engine = ReactionEngine::new(MemoryPreferenceStore::new());
        let (article, _) = subjects();
        let user = Uuid::new_v4();

        engine.react(article, user, Reaction::Like).await.unwrap();
        let out = engine.react(article, user, Reaction::Dislike).await.unwrap();
        assert_eq!(out.state, ReactionState::Disliked);
        assert_eq!(out.like_count, 0);
        assert_eq!(out.dislike_count, 1);
    }

    #[tokio::test]
    async fn at_most_one_row_survives_any_sequence() {
        let engine = ReactionEngine::new(MemoryPreferenceStore::new());
        let (article, _) = subjects();
        let user = Uuid::new_v4();

        // Like, Dislike (flip), Dislike (undo), Like, Like (undo), Dislike
        for desired in [
            Reaction::Like,
            Reaction::Dislike,
            Reaction::Dislike,
            Reaction::Like,
            Reaction::Like,
            Reaction::Dislike,
        ] {
            engine.react(article, user, desired).await.unwrap();
            assert!(engine.store().rows_for(article, user).await <= 1);
        }
        assert_eq!(engine.store().rows_for(article, user).await, 1);
    }

    #[tokio::test]
    async fn counts_are_scoped_per_subject_and_user() {
        let engine = ReactionEngine::new(MemoryPreferenceStore::new());
        let (article, comment) = subjects();
        let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());

        let out = engine.react(article, u1, Reaction::Like).await.unwrap();
        assert_eq!(out.state, ReactionState::Liked);
        assert_eq!((out.like_count, out.dislike_count), (1, 0));

        let out = engine.react(article, u2, Reaction::Dislike).await.unwrap();
        assert_eq!(out.state, ReactionState::Disliked);
        assert_eq!((out.like_count, out.dislike_count), (1, 1));

        // U1 likes again: undo. U2's dislike remains.
        let out = engine.react(article, u1, Reaction::Like).await.unwrap();
        assert_eq!(out.state, ReactionState::NoPreference);
        assert_eq!((out.like_count, out.dislike_count), (0, 1));

        // A comment subject has its own counts.
        let out = engine.react(comment, u1, Reaction::Like).await.unwrap();
        assert_eq!((out.like_count, out.dislike_count), (1, 0));
    }
}
