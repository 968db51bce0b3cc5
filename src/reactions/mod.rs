pub mod engine;
pub mod store;

pub use engine::{ReactionEngine, ReactionOutcome, ReactionState};
pub use store::{PgPreferenceStore, PreferenceError, PreferenceStore};
