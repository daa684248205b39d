//! Session marker: one file holding the logged-in username.

use dashboard_core::{DashboardError, DashboardResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const SESSION_FILE: &str = "session";

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, username: &str) -> DashboardResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, username.trim())?;
        Ok(())
    }

    pub fn load(&self) -> DashboardResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let username = contents.trim();
                Ok((!username.is_empty()).then(|| username.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Username of the current session, or `Unauthenticated`.
    pub fn require(&self) -> DashboardResult<String> {
        self.load()?.ok_or(DashboardError::Unauthenticated)
    }

    pub fn clear(&self) -> DashboardResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
