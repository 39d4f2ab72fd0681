use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::session::Attempt;
use crate::store::Progress;

pub const POINTS_PER_CORRECT_ANSWER: u32 = 10;

/// The signed-in user's profile. Score and completion count only ever grow.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub score: u32,
    pub quizzes_completed: u32,
}

impl User {
    /// Hydrates a profile at login from the allow-list entry and whatever
    /// progress was previously persisted for that id.
    pub fn from_login(auth_user: &AuthUser, progress: Progress) -> User {
        User {
            id: auth_user.id.clone(),
            name: auth_user.name.clone(),
            email: auth_user.email.clone(),
            score: progress.score,
            quizzes_completed: progress.completed_count,
        }
    }

    pub fn record_attempt(&mut self, attempt: &Attempt) {
        self.score += POINTS_PER_CORRECT_ANSWER * attempt.correct_count as u32;
        self.quizzes_completed += 1;
    }

    pub fn progress(&self) -> Progress {
        Progress {
            score: self.score,
            completed_count: self.quizzes_completed,
        }
    }
}
