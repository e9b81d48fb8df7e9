//! Session-scoped key/value storage.
//!
//! Hand, print list, current deck snapshot and the deck counter are kept in
//! a [`SessionStore`] as JSON strings. The store is injected into the
//! components that need it so tests can use [`MemoryStore`] while the CLI
//! uses [`FileStore`].
//!
//! Values are not encrypted. [`SessionStore::clear`] is called on logout.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config;
use crate::error::Result;

/// Abstract interface for session storage.
pub trait SessionStore {
    /// Raw JSON stored under `key`, if any.
    fn get_raw(&self, key: &str) -> Result<Option<String>>;

    /// Store raw JSON under `key`, replacing any previous value.
    fn set_raw(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Missing keys are not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Remove every key owned by this store.
    fn clear(&self) -> Result<()>;
}

/// Load and deserialize a value.
///
/// A value that no longer parses is treated as absent and removed, so a
/// stale snapshot from an older version cannot wedge the session.
pub fn load<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: SessionStore + ?Sized,
{
    let Some(raw) = store.get_raw(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("Corrupt session entry '{}': {} -- removing", key, e);
            store.remove(key)?;
            Ok(None)
        }
    }
}

/// Serialize and store a value.
pub fn save<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: SessionStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set_raw(key, &raw)
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries.borrow_mut().clear();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// Name of the file listing every key a [`FileStore`] has written.
const KEY_INDEX_FILE: &str = ".session-keys.json";

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temp file in the same directory and are renamed into
/// place, so an interrupted write never leaves a truncated entry behind.
/// Keys written are recorded in an index file; [`clear`](SessionStore::clear)
/// removes only those, so other files sharing the directory are left alone.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// If `dir` is `None`, the platform cache directory is used.
    pub fn new(dir: Option<PathBuf>) -> Result<Self> {
        let dir = dir.unwrap_or_else(config::default_session_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Keys recorded in the index. A missing or unreadable index is empty.
    fn read_index(&self) -> Result<BTreeSet<String>> {
        let path = self.dir.join(KEY_INDEX_FILE);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(keys) => Ok(keys),
            Err(e) => {
                log::warn!("Corrupt session key index {}: {}", path.display(), e);
                Ok(BTreeSet::new())
            }
        }
    }

    fn write_index(&self, keys: &BTreeSet<String>) -> Result<()> {
        let path = self.dir.join(KEY_INDEX_FILE);
        if keys.is_empty() {
            return remove_if_exists(&path);
        }
        self.write_atomic(&path, &serde_json::to_string(keys)?)
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

impl SessionStore for FileStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        let mut keys = self.read_index()?;
        if keys.insert(key.to_string()) {
            self.write_index(&keys)?;
        }
        self.write_atomic(&self.path_for(key), value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        remove_if_exists(&self.path_for(key))?;
        let mut keys = self.read_index()?;
        if keys.remove(key) {
            self.write_index(&keys)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        for key in self.read_index()? {
            remove_if_exists(&self.path_for(&key))?;
        }
        remove_if_exists(&self.dir.join(KEY_INDEX_FILE))
    }
}
