use anyhow::*;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::auth;
use crate::catalog::{Catalog, Quiz};
use crate::room::{Room, RoomSettings};
use crate::session::{Attempt, SessionEngine};
use crate::store::ProgressStore;
use crate::user::User;

#[cfg(test)]
mod tests;

const ROOM_CODE_LENGTH: usize = 6;
const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// The application context: one explicit object owning the catalog, the
/// session engine, the signed-in user, the optional mock room, and the
/// persistence handle. Handlers receive it by reference; there is no ambient
/// global state.
pub struct App<S: ProgressStore> {
    catalog: Catalog,
    store: S,
    session: SessionEngine,
    user: Option<User>,
    room: Option<Room<StdRng>>,
}

impl<S: ProgressStore> App<S> {
    /// Builds the context and restores any persisted signed-in session.
    pub fn new(catalog: Catalog, store: S) -> App<S> {
        let user = store.load_session();
        if let Some(user) = &user {
            info!("Restored session for {}", user.name);
        }
        App {
            catalog,
            store,
            session: SessionEngine::new(),
            user,
            room: None,
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// A credential mismatch is a negative result, not an error. On success,
    /// the user's persisted progress is rehydrated and the session marker
    /// written.
    pub fn login(&mut self, email: &str, password: &str) -> Option<&User> {
        let auth_user = auth::validate_credentials(email, password)?;
        let progress = self.store.load_progress(&auth_user.id);
        let user = User::from_login(auth_user, progress);
        info!("{} logged in", user.name);
        self.store.save_session(&user);
        self.user = Some(user);
        self.user.as_ref()
    }

    /// Drops the signed-in user, the session marker, any in-progress quiz
    /// (ungraded) and any room.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!("{} logged out", user.name);
        }
        self.session.abandon();
        self.room = None;
        self.store.clear_session();
    }

    pub fn quizzes(&self) -> &[Quiz] {
        self.catalog.quizzes()
    }

    pub fn categories(&self) -> Vec<&str> {
        self.catalog.categories()
    }

    pub fn start_quiz(&mut self, quiz_id: &str) -> Result<&Quiz> {
        let quiz = self
            .catalog
            .get(quiz_id)
            .with_context(|| format!("No quiz with id {}", quiz_id))?
            .clone();
        self.session.start(quiz);
        Ok(self.session.active_quiz().context("No active quiz")?)
    }

    /// Starts an ad-hoc quiz that is not part of the catalog (a room's custom
    /// quiz, for instance).
    pub fn start_custom_quiz(&mut self, quiz: Quiz) {
        self.session.start(quiz);
    }

    pub fn active_quiz(&self) -> Option<&Quiz> {
        self.session.active_quiz()
    }

    pub fn record_answer(&mut self, question_id: &str, value: &str) -> Result<()> {
        self.session.record_answer(question_id, value)
    }

    pub fn recorded_answer(&self, question_id: &str) -> Option<&str> {
        self.session.recorded_answer(question_id)
    }

    pub fn submit_quiz(&mut self) -> Result<Attempt> {
        let attempt = self.session.submit()?;
        self.apply_attempt(&attempt);
        Ok(attempt)
    }

    /// Leaves the quiz view without grading.
    pub fn abandon_quiz(&mut self) {
        self.session.abandon();
    }

    pub fn remaining_time(&self) -> Option<Duration> {
        self.session.remaining_time()
    }

    pub fn last_attempt(&self) -> Option<&Attempt> {
        self.session.last_attempt()
    }

    /// Drives the countdowns. A quiz timing out grades through the same path
    /// as a manual submit; a room countdown completing launches the quiz for
    /// the room's configured topic.
    pub fn tick(&mut self, dt: Duration) {
        if let Some(attempt) = self.session.tick(dt) {
            self.apply_attempt(&attempt);
        }

        let begin_room_quiz = match &mut self.room {
            Some(room) => {
                room.tick(dt);
                room.take_ready_to_begin()
            }
            None => false,
        };
        if begin_room_quiz {
            let topic = self.room.as_ref().map(|r| r.settings().topic.clone());
            let quiz = topic.and_then(|topic| {
                self.catalog
                    .quizzes()
                    .iter()
                    .find(|q| q.title == topic)
                    .cloned()
            });
            self.room = None;
            match quiz {
                Some(quiz) => self.session.start(quiz),
                None => info!("Room countdown finished but no quiz matches its topic"),
            }
        }
    }

    pub fn create_room(&mut self, settings: RoomSettings) -> Result<&Room<StdRng>> {
        let host_name = self
            .user
            .as_ref()
            .map(|u| u.name.clone())
            .context("Log in before creating a room")?;
        let mut rng = StdRng::from_entropy();
        let code: String = (0..ROOM_CODE_LENGTH)
            .map(|_| ROOM_CODE_ALPHABET[rng.gen_range(0, ROOM_CODE_ALPHABET.len())] as char)
            .collect();
        self.room = Some(Room::new(&code, &host_name, settings, rng));
        Ok(self.room.as_ref().context("No room")?)
    }

    pub fn room(&self) -> Option<&Room<StdRng>> {
        self.room.as_ref()
    }

    pub fn room_mut(&mut self) -> Option<&mut Room<StdRng>> {
        self.room.as_mut()
    }

    pub fn leave_room(&mut self) {
        self.room = None;
    }

    fn apply_attempt(&mut self, attempt: &Attempt) {
        if let Some(user) = &mut self.user {
            user.record_attempt(attempt);
            self.store.save_progress(&user.id, user.progress());
            self.store.save_session(user);
        }
    }
}
