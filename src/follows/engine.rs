use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::follows::store::SocialGraphStore;

#[derive(Debug, Error)]
pub enum FollowError {
    /// The caller is expected to reject self-follows before invoking the
    /// engine; this is the engine's own backstop so the edge can never land.
    #[error("a profile cannot follow itself")]
    SelfFollow,

    #[error(transparent)]
    Store(#[from] DatabaseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowState {
    Following,
    NotFollowing,
}

/// Toggle-follow logic and follower/following projections over a
/// [`SocialGraphStore`].
pub struct FollowEngine<S> {
    store: S,
}

impl<S: SocialGraphStore> FollowEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Flip the (actor, target) edge: absent becomes present, present is
    /// removed.
    pub async fn toggle_follow(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<FollowState, FollowError> {
        if actor_id == target_id {
            return Err(FollowError::SelfFollow);
        }

        if self.store.exists(actor_id, target_id).await? {
            self.store.remove(actor_id, target_id).await?;
            Ok(FollowState::NotFollowing)
        } else {
            self.store.add(actor_id, target_id).await?;
            Ok(FollowState::Following)
        }
    }

    pub async fn list_followers(&self, profile_id: Uuid) -> Result<Vec<Uuid>, FollowError> {
        Ok(self.store.followers_of(profile_id).await?)
    }

    pub async fn list_following(&self, profile_id: Uuid) -> Result<Vec<Uuid>, FollowError> {
        Ok(self.store.following_of(profile_id).await?)
    }

    pub async fn is_following(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<bool, FollowError> {
        Ok(self.store.exists(actor_id, target_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::follows::store::memory::MemorySocialGraphStore;

    #[tokio::test]
    async fn toggle_follows_then_unfollows() {
        let engine = FollowEngine::new(MemorySocialGraphStore::new());
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());

        let state = engine.toggle_follow(p1, p2).await.unwrap();
        assert_eq!(state, FollowState::Following);
        assert_eq!(engine.list_following(p1).await.unwrap(), vec![p2]);
        assert_eq!(engine.list_followers(p2).await.unwrap(), vec![p1]);

        let state = engine.toggle_follow(p1, p2).await.unwrap();
        assert_eq!(state, FollowState::NotFollowing);
        assert!(!engine.is_following(p1, p2).await.unwrap());
        assert!(engine.list_following(p1).await.unwrap().is_empty());
        assert!(engine.list_followers(p2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn edges_are_directed() {
        let engine = FollowEngine::new(MemorySocialGraphStore::new());
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());

        engine.toggle_follow(p1, p2).await.unwrap();
        assert!(engine.is_following(p1, p2).await.unwrap());
        assert!(!engine.is_following(p2, p1).await.unwrap());
    }

    #[tokio::test]
    async fn self_follow_is_rejected_without_creating_an_edge() {
        let engine = FollowEngine::new(MemorySocialGraphStore::new());
        let p = Uuid::new_v4();

        let err = engine.toggle_follow(p, p).await.unwrap_err();
        assert!(matches!(err, FollowError::SelfFollow));
        assert_eq!(engine.store().edge_count().await, 0);
    }

    #[tokio::test]
    async fn repeated_toggles_alternate() {
        let engine = FollowEngine::new(MemorySocialGraphStore::new());
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());

        for round in 0..4 {
            let state = engine.toggle_follow(p1, p2).await.unwrap();
            if round % 2 == 0 {
                assert_eq!(state, FollowState::Following);
            } else {
                assert_eq!(state, FollowState::NotFollowing);
            }
        }
        assert_eq!(engine.store().edge_count().await, 0);
    }
}
