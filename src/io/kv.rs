use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Opaque string key-value storage.
///
/// Writes are fire-and-forget: implementations log failures and carry on.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store, used by tests and embedders
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Error type for opening a file-backed store
#[derive(Debug, thiserror::Error)]
pub enum StoreIoError {
    #[error("could not create data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("data path {0} is not a directory")]
    NotADirectory(PathBuf),
}

/// One `<key>.json` file per key inside a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) the data directory
    pub fn open(dir: &Path) -> Result<Self, StoreIoError> {
        if dir.exists() && !dir.is_dir() {
            return Err(StoreIoError::NotADirectory(dir.to_path_buf()));
        }
        fs::create_dir_all(dir).map_err(|e| StoreIoError::CreateDir {
            path: dir.to_path_buf(),
            source: e,
        })?;
        Ok(FileStore {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path backing `key`, or `None` if the key cannot name a file
    pub fn key_path(&self, key: &str) -> Option<PathBuf> {
        if is_valid_key(key) {
            Some(self.dir.join(format!("{}.json", key)))
        } else {
            None
        }
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read stored value");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        let Some(path) = self.key_path(key) else {
            tracing::warn!(key, "refusing to write invalid storage key");
            return;
        };
        if let Err(e) = atomic_write(&path, value.as_bytes()) {
            tracing::warn!(path = %path.display(), error = %e, "could not write stored value");
        }
    }

    fn remove(&mut self, key: &str) {
        let Some(path) = self.key_path(key) else {
            return;
        };
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not remove stored value");
            }
        }
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_get_set_remove() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v1");
        store.set("k", "v2");
        assert_eq!(store.get("k").as_deref(), Some("v2"));
        store.remove("k");
        assert!(!store.contains("k"));
    }

    #[test]
    fn file_store_round_trip() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::open(&tmp.path().join("data")).unwrap();

        store.set("things_sections", "[]");
        assert_eq!(store.get("things_sections").as_deref(), Some("[]"));
        assert!(tmp.path().join("data/things_sections.json").exists());

        store.remove("things_sections");
        assert_eq!(store.get("things_sections"), None);
        // Removing a missing key is fine
        store.remove("things_sections");
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let tmp = TempDir::new().unwrap();
        let mut store = FileStore::open(tmp.path()).unwrap();
        store.set("../escape", "x");
        assert!(!tmp.path().join("../escape.json").exists());
        assert_eq!(store.get("../escape"), None);
        assert!(store.key_path("a/b").is_none());
    }

    #[test]
    fn file_store_open_on_file_fails() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("plain");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            FileStore::open(&file),
            Err(StoreIoError::NotADirectory(_))
        ));
    }
}
