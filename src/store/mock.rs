use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::{Progress, ProgressStore};
use crate::user::User;

#[derive(Default)]
struct Inner {
    progress: HashMap<String, Progress>,
    session: Option<User>,
}

/// In-memory stand-in for the disk store. Clones share state so a test can
/// hand one to the application and inspect writes through another.
#[derive(Clone, Default)]
pub struct MockStore {
    inner: Arc<RwLock<Inner>>,
}

impl MockStore {
    pub fn new() -> MockStore {
        Default::default()
    }

    pub fn saved_progress(&self, user_id: &str) -> Option<Progress> {
        self.inner.read().progress.get(user_id).copied()
    }

    pub fn saved_session(&self) -> Option<User> {
        self.inner.read().session.clone()
    }
}

impl ProgressStore for MockStore {
    fn load_progress(&self, user_id: &str) -> Progress {
        self.inner
            .read()
            .progress
            .get(user_id)
            .copied()
            .unwrap_or_default()
    }

    fn save_progress(&self, user_id: &str, progress: Progress) {
        self.inner
            .write()
            .progress
            .insert(user_id.to_owned(), progress);
    }

    fn load_session(&self) -> Option<User> {
        self.inner.read().session.clone()
    }

    fn save_session(&self, user: &User) {
        self.inner.write().session = Some(user.clone());
    }

    fn clear_session(&self) {
        self.inner.write().session = None;
    }
}
