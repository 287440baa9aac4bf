use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;

/// Storage key for the persisted session blob. Bump the suffix when the
/// [`StoredSession`](crate::session::StoredSession) layout changes.
pub const SESSION_KEY: &str = "session.v1";

const STORAGE_DIR_NAME: &str = ".atrium";

/// Durable client-side key-value store for the session blob.
///
/// Every method is infallible from the caller's perspective: a backend
/// that cannot read or write degrades to "no session". Implementations
/// log failures and move on — callers of `hydrate` must never see a
/// storage error.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Fetch the value under `key`, or `None` if absent or unreadable.
    async fn get(&self, key: &str) -> Option<String>;

    /// Persist `value` under `key`. Failures are logged and swallowed.
    async fn set(&self, key: &str, value: &str);

    /// Remove the value under `key`. Removing an absent key is a no-op.
    async fn remove(&self, key: &str);
}

/// File-backed storage: one file per key under a private directory.
///
/// The directory is created `0700` and files `0600` on Unix, the same
/// hardening applied to CLI credential stores. Whitespace-only content is
/// treated as absent.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Storage rooted at `~/.atrium`. `None` when no home directory can
    /// be resolved (containers without a passwd entry).
    #[must_use]
    pub fn in_home_dir() -> Option<Self> {
        dirs::home_dir().map(|home| Self::new(home.join(STORAGE_DIR_NAME)))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn write_file(&self, key: &str, value: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(error) = fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700)) {
                tracing::warn!(%error, dir = %self.dir.display(), "failed to chmod storage dir");
            }
        }
        let path = self.path_for(key);
        fs::write(&path, value)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStorage for FileStorage {
    async fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        fs::read_to_string(&path)
            .ok()
            .filter(|content| !content.trim().is_empty())
    }

    async fn set(&self, key: &str, value: &str) {
        if let Err(error) = self.write_file(key, value) {
            tracing::warn!(%error, key, "session storage write failed; value dropped");
        }
    }

    async fn remove(&self, key: &str) {
        let path = self.path_for(key);
        if path.exists()
            && let Err(error) = fs::remove_file(&path)
        {
            tracing::warn!(%error, key, "session storage remove failed");
        }
    }
}

/// In-memory storage for tests and embedders that opt out of persistence.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key before handing the store to a session service.
    pub fn preload(&self, key: &str, value: &str) {
        self.entries
            .write()
            .expect("storage lock poisoned")
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .expect("storage lock poisoned")
            .get(key)
            .cloned()
    }

    async fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .expect("storage lock poisoned")
            .insert(key.to_string(), value.to_string());
    }

    async fn remove(&self, key: &str) {
        self.entries
            .write()
            .expect("storage lock poisoned")
            .remove(key);
    }
}
