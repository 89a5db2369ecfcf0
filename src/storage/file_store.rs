//! Key-value store backed by a single JSON file.
//!
//! All keys live in one JSON object. The whole object is rewritten on every
//! `set`/`remove`, through a temp file and a rename so the file is never left
//! half written.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use super::StorageError;
use crate::host::KeyValueStore;

/// JSON-file key-value store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: IndexMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`.
    ///
    /// A missing file is an empty store. A file that is not a JSON object of
    /// strings is also treated as empty (and replaced on the next write).
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable store file");
                IndexMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => IndexMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    /// Default location: `~/.config/markquill/storage.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("markquill");
            path.push("storage.json");
            path
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_string_pretty(&self.entries)?;
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, data)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.shift_remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
