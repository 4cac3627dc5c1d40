//! Persistence of the session snapshot.
//!
//! A storage holds snapshots by key. The file storage keeps every key in one
//! JSON object so several tools can share a session file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use stockroom_client::model::User;
use tracing::debug;

use crate::error::Result;

/// What survives a restart: `{ user, token, isAuthenticated }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub is_authenticated: bool,
}

impl PersistedSession {
    pub fn authenticated(user: User, token: String) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
            is_authenticated: true,
        }
    }

    /// A snapshot only counts when it carries a token.
    pub fn is_usable(&self) -> bool {
        self.is_authenticated && self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Synchronous key-value persistence for session snapshots.
pub trait SessionStorage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<PersistedSession>>;

    fn save(&self, key: &str, session: &PersistedSession) -> Result<()>;

    fn clear(&self, key: &str) -> Result<()>;
}

/// Snapshots in a JSON file, written atomically via a temp file.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, PersistedSession>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Session file not found, starting fresh");
            return Ok(HashMap::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_all(&self, entries: &HashMap<String, PersistedSession>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;

        debug!(path = %self.path.display(), keys = entries.len(), "Flushed session file");
        Ok(())
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self, key: &str) -> Result<Option<PersistedSession>> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&self, key: &str, session: &PersistedSession) -> Result<()> {
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(key.to_string(), session.clone());
        self.write_all(&entries)
    }

    fn clear(&self, key: &str) -> Result<()> {
        // A corrupt file is replaced rather than blocking logout.
        let mut entries = self.read_all().unwrap_or_default();
        entries.remove(key);
        self.write_all(&entries)
    }
}

/// In-process storage for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    entries: Mutex<HashMap<String, PersistedSession>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, PersistedSession>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self, key: &str) -> Result<Option<PersistedSession>> {
        Ok(self.entries().get(key).cloned())
    }

    fn save(&self, key: &str, session: &PersistedSession) -> Result<()> {
        self.entries().insert(key.to_string(), session.clone());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}
