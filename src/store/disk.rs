use anyhow::{Context, Error, Result};
use directories_next::ProjectDirs;
use log::{debug, error, warn};
use std::fs;
use std::path::{Path, PathBuf};

use super::{Progress, ProgressStore};
use crate::user::User;

const USERS_DIRECTORY: &str = "users";
const SESSION_FILE: &str = "session.json";

/// JSON-file-backed store rooted in a local data directory.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: PathBuf) -> Result<DiskStore> {
        fs::create_dir_all(root.join(USERS_DIRECTORY))?;
        Ok(DiskStore { root })
    }

    /// Roots the store in the platform user-data directory.
    pub fn in_user_data_dir() -> Result<DiskStore> {
        let project_dirs = ProjectDirs::from("", "", "quizdeck")
            .context("Could not locate a data directory for this platform")?;
        DiskStore::new(project_dirs.data_dir().to_path_buf())
    }

    fn progress_path(&self, user_id: &str) -> PathBuf {
        self.root
            .join(USERS_DIRECTORY)
            .join(format!("{}.json", user_id))
    }

    fn session_path(&self) -> PathBuf {
        self.root.join(SESSION_FILE)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring unreadable record {}: {}", path.display(), e);
            None
        }
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) {
    let result = serde_json::to_string_pretty(value)
        .map_err(Error::from)
        .and_then(|content| fs::write(path, content).map_err(Error::from));
    if let Err(e) = result {
        // Best-effort persistence: log and continue.
        error!("Could not write {}: {}", path.display(), e);
    }
}

impl ProgressStore for DiskStore {
    fn load_progress(&self, user_id: &str) -> Progress {
        read_json(&self.progress_path(user_id)).unwrap_or_default()
    }

    fn save_progress(&self, user_id: &str, progress: Progress) {
        debug!("Saving progress for user {}", user_id);
        write_json(&self.progress_path(user_id), &progress);
    }

    fn load_session(&self) -> Option<User> {
        read_json(&self.session_path())
    }

    fn save_session(&self, user: &User) {
        write_json(&self.session_path(), user);
    }

    fn clear_session(&self) {
        let path = self.session_path();
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                error!("Could not remove {}: {}", path.display(), e);
            }
        }
    }
}
