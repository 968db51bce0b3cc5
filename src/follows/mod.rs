pub mod engine;
pub mod store;

pub use engine::{FollowEngine, FollowError, FollowState};
pub use store::{PgSocialGraphStore, SocialGraphStore};
