//! Session credential storage.
//!
//! # Design
//! `Session` is the only piece of state shared across calls. It wraps a
//! `SessionStore` holding two string entries, `token` and `user`, and is
//! handed to `SaipdClient::new` rather than living in a global. Nothing is
//! mirrored in memory: every read goes back to the store, so a logout or a
//! new login is visible to the very next request built by any clone of the
//! session.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::trace;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::ApiError;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// String key/value persistence for the session.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ApiError>;
    fn remove(&self, key: &str) -> Result<(), ApiError>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, ApiError> {
        self.entries
            .lock()
            .map_err(|_| ApiError::Storage("memory store lock poisoned".to_string()))
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Store persisted as a flat JSON object on disk.
///
/// The file is re-read on every `get`, so several processes (or several
/// `FileStore` values) pointing at the same path observe each other's writes.
/// Writes replace the file atomically. A missing file is an empty session; an
/// empty or unparsable one is a `Storage` error.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, ApiError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Err(ApiError::Storage(format!(
                "{} is empty, not a session file",
                self.path.display()
            ))),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                ApiError::Storage(format!("{} is not a session file: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(ApiError::Storage(format!("read {}: {e}", self.path.display()))),
        }
    }

    /// Write to a temp file next to the target and rename it over the
    /// target, so readers only ever see a complete file.
    fn save(&self, entries: &HashMap<String, String>) -> Result<(), ApiError> {
        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)
                    .map_err(|e| ApiError::Storage(format!("create {}: {e}", parent.display())))?;
                parent
            }
            None => Path::new("."),
        };
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut temp = NamedTempFile::new_in(parent)
            .map_err(|e| ApiError::Storage(format!("temp file in {}: {e}", parent.display())))?;
        temp.write_all(raw.as_bytes())
            .map_err(|e| ApiError::Storage(format!("write {}: {e}", temp.path().display())))?;
        temp.persist(&self.path)
            .map_err(|e| ApiError::Storage(format!("replace {}: {}", self.path.display(), e.error)))?;
        Ok(())
    }

    fn update<F>(&self, f: F) -> Result<(), ApiError>
    where
        F: FnOnce(&mut HashMap<String, String>),
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| ApiError::Storage("file store lock poisoned".to_string()))?;
        let mut entries = self.load()?;
        f(&mut entries);
        self.save(&entries)
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), ApiError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// Minimal profile kept alongside the token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
}

impl SessionUser {
    /// Placeholder profile built from a successful login, which only returns
    /// the user id.
    pub fn synthesized(id: i64, login: &str) -> Self {
        Self {
            id,
            login: login.to_string(),
            email: format!("{login}@example.com"),
            first_name: "User".to_string(),
            last_name: "Login".to_string(),
            is_active: true,
        }
    }

    /// Bearer token the backend issues for this user id.
    pub fn token(&self) -> String {
        format!("token_{}", self.id)
    }
}

/// Shared handle to the session credential.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    /// Open a session over `store`, picking up whatever credential it
    /// already holds.
    pub fn init(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Session with nothing persisted.
    pub fn in_memory() -> Self {
        Self::init(MemoryStore::new())
    }

    pub fn token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.store.get(TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    pub fn user(&self) -> Result<Option<SessionUser>, ApiError> {
        match self.store.get(USER_KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| ApiError::Deserialization(format!("stored user: {e}"))),
            None => Ok(None),
        }
    }

    pub fn is_logged_in(&self) -> Result<bool, ApiError> {
        Ok(self.token()?.is_some())
    }

    /// Replace the stored credential. Any previous token is overwritten.
    pub fn set_auth(&self, user: &SessionUser, token: &str) -> Result<(), ApiError> {
        let raw = serde_json::to_string(user).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.store.set(USER_KEY, &raw)?;
        self.store.set(TOKEN_KEY, token)?;
        trace!("session credential set for user {}", user.id);
        Ok(())
    }

    /// Drop both entries. Token first, so a failure half-way never leaves a
    /// usable credential behind.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        trace!("session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesized_user_shape() {
        let user = SessionUser::synthesized(42, "alice");
        assert_eq!(user.id, 42);
        assert_eq!(user.login, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.first_name, "User");
        assert_eq!(user.last_name, "Login");
        assert!(user.is_active);
        assert_eq!(user.token(), "token_42");
    }

    #[test]
    fn empty_session_is_logged_out() {
        let session = Session::in_memory();
        assert_eq!(session.token().unwrap(), None);
        assert_eq!(session.user().unwrap(), None);
        assert!(!session.is_logged_in().unwrap());
    }

    #[test]
    fn set_auth_overwrites_previous_token() {
        let session = Session::in_memory();
        session.set_auth(&SessionUser::synthesized(1, "a"), "token_1").unwrap();
        session.set_auth(&SessionUser::synthesized(2, "b"), "token_2").unwrap();
        assert_eq!(session.token().unwrap().as_deref(), Some("token_2"));
        assert_eq!(session.user().unwrap().unwrap().login, "b");
    }

    #[test]
    fn logout_clears_both_entries_for_every_clone() {
        let session = Session::in_memory();
        let other = session.clone();
        session.set_auth(&SessionUser::synthesized(7, "bob"), "token_7").unwrap();
        assert!(other.is_logged_in().unwrap());

        other.logout().unwrap();
        assert_eq!(session.token().unwrap(), None);
        assert_eq!(session.user().unwrap(), None);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let first = Session::init(FileStore::new(&path));
        first.set_auth(&SessionUser::synthesized(3, "carol"), "token_3").unwrap();

        let second = Session::init(FileStore::new(&path));
        assert_eq!(second.token().unwrap().as_deref(), Some("token_3"));
        assert_eq!(second.user().unwrap().unwrap().id, 3);

        second.logout().unwrap();
        assert!(!first.is_logged_in().unwrap());
    }

    #[test]
    fn file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        let err = FileStore::new(&path).get(TOKEN_KEY).unwrap_err();
        assert!(matches!(err, ApiError::Storage(_)));
    }

    #[test]
    fn empty_file_is_not_a_logged_out_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "").unwrap();
        let session = Session::init(FileStore::new(&path));
        assert!(matches!(session.token(), Err(ApiError::Storage(_))));
    }

    #[test]
    fn file_store_readers_never_see_a_partial_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let user = SessionUser::synthesized(1, "admin");

        let writer = Session::init(FileStore::new(&path));
        writer.set_auth(&user, "token_1").unwrap();
        let reader = Session::init(FileStore::new(&path));

        let stop = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let handle = {
            let stop = Arc::clone(&stop);
            let user = user.clone();
            std::thread::spawn(move || {
                while !stop.load(std::sync::atomic::Ordering::Relaxed) {
                    writer.set_auth(&user, "token_1").unwrap();
                }
            })
        };

        for _ in 0..2_000 {
            assert_eq!(reader.token().unwrap().as_deref(), Some("token_1"));
        }
        stop.store(true, std::sync::atomic::Ordering::Relaxed);
        handle.join().unwrap();
    }

    #[test]
    fn corrupt_user_entry_is_an_error() {
        let store = MemoryStore::new();
        store.set(USER_KEY, "{").unwrap();
        let session = Session::init(store);
        assert!(matches!(session.user(), Err(ApiError::Deserialization(_))));
    }
}
