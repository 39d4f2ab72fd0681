use serde::{Deserialize, Serialize};

use crate::user::User;

pub mod disk;
#[cfg(test)]
pub mod mock;

/// Cumulative per-user progress, persisted keyed by user id.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Progress {
    pub score: u32,
    pub completed_count: u32,
}

/// Local key-value persistence for user progress and the signed-in session
/// marker. All writes are best-effort: implementations log failures and
/// carry on, they never propagate them. Last writer wins; single-process
/// assumption.
pub trait ProgressStore {
    /// Returns the persisted progress for a user, or zeroed defaults if no
    /// record exists (or the record cannot be read).
    fn load_progress(&self, user_id: &str) -> Progress;

    fn save_progress(&self, user_id: &str, progress: Progress);

    /// The session marker: the currently signed-in user's full profile,
    /// read at startup to restore a session.
    fn load_session(&self) -> Option<User>;

    fn save_session(&self, user: &User);

    fn clear_session(&self);
}
