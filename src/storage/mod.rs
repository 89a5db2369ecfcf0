//! Bookmark persistence.
//!
//! Bookmarks are stored as one JSON document under a single key of a
//! [`KeyValueStore`]. Every save writes a full snapshot; there is no merging.
//!
//! # Format
//!
//! ```json
//! { "version": 2,
//!   "bookmarks": [
//!     { "lineIndex": 4, "text": "fn main() {", "fileName": "main.rs",
//!       "filePath": "/src/main.rs", "label": "BOOKMARK" } ] }
//! ```
//!
//! Version 1 data (a bare array of the same objects, possibly spelling the
//! line field `originalLineNum` and omitting `text`) is still read. Anything
//! else is treated as corrupt and loads as an empty set.
//!
//! Live anchors never reach storage: [`StoredBookmark`] has no field for them.

pub mod file_store;
pub mod memory;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bookmark::record::{BookmarkRecord, DocumentId, DEFAULT_LABEL};
use crate::host::KeyValueStore;

pub use file_store::FileStore;
pub use memory::MemoryStore;

/// Schema version written by [`serialize`].
pub const CURRENT_VERSION: u32 = 2;

/// Key the bookmarks live under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "markquill.bookmarks";

/// Errors raised by stores and the codec.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported bookmark storage version {0}")]
    UnsupportedVersion(u64),
    #[error("stored data has an unexpected shape")]
    UnexpectedShape,
}

/// On-disk shape of one bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBookmark {
    #[serde(alias = "originalLineNum")]
    pub line_index: usize,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub file_name: String,
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    bookmarks: Vec<StoredBookmark>,
}

impl StoredBookmark {
    fn from_record(record: &BookmarkRecord) -> Self {
        Self {
            line_index: record.line_index,
            text: record.line_text.clone(),
            file_name: record.document_display_name.clone(),
            file_path: record.document_key.clone(),
            label: Some(record.label.clone()),
        }
    }

    fn into_record(self, default_label: &str) -> BookmarkRecord {
        let document = if self.file_name.is_empty() {
            DocumentId::from_path(self.file_path)
        } else {
            DocumentId::new(self.file_path, self.file_name)
        };
        BookmarkRecord::new(
            &document,
            self.line_index,
            self.text,
            self.label.unwrap_or_else(|| default_label.to_string()),
        )
    }
}

/// Encodes records in the current format, dropping live anchors.
pub fn serialize(records: &[BookmarkRecord]) -> Result<String, StorageError> {
    let snapshot = Snapshot {
        version: CURRENT_VERSION,
        bookmarks: records.iter().map(StoredBookmark::from_record).collect(),
    };
    Ok(serde_json::to_string(&snapshot)?)
}

/// Decodes stored data of any supported version.
///
/// Returned records have no anchor. `null` decodes as an empty set.
pub fn deserialize(data: &str, default_label: &str) -> Result<Vec<BookmarkRecord>, StorageError> {
    let value: serde_json::Value = serde_json::from_str(data)?;
    let version = value.get("version").and_then(serde_json::Value::as_u64);
    let stored: Vec<StoredBookmark> = match value {
        serde_json::Value::Null => Vec::new(),
        serde_json::Value::Array(_) => serde_json::from_value(value)?,
        serde_json::Value::Object(_) => {
            let version = version.ok_or(StorageError::UnexpectedShape)?;
            if version != u64::from(CURRENT_VERSION) {
                return Err(StorageError::UnsupportedVersion(version));
            }
            serde_json::from_value::<Snapshot>(value)?.bookmarks
        }
        _ => return Err(StorageError::UnexpectedShape),
    };

    Ok(stored
        .into_iter()
        .map(|s| s.into_record(default_label))
        .collect())
}

/// Persistence adapter binding the codec to a store and key.
#[derive(Debug)]
pub struct BookmarkStore<S> {
    store: S,
    key: String,
    default_label: String,
}

impl<S: KeyValueStore> BookmarkStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            default_label: DEFAULT_LABEL.to_string(),
        }
    }

    /// Label given to stored entries that have none.
    pub fn with_default_label(mut self, label: impl Into<String>) -> Self {
        self.default_label = label.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Writes a full snapshot of `records`, replacing what was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails to write.
    pub fn save(&mut self, records: &[BookmarkRecord]) -> Result<(), StorageError> {
        let data = serialize(records)?;
        self.store.set(&self.key, &data)
    }

    /// Reads the stored records. Missing or unreadable data yields an empty
    /// set; the cause is logged.
    pub fn load(&self) -> Vec<BookmarkRecord> {
        let data = match self.store.get(&self.key) {
            Ok(Some(data)) => data,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to read bookmarks");
                return Vec::new();
            }
        };
        match deserialize(&data, &self.default_label) {
            Ok(records) => {
                tracing::debug!(key = %self.key, count = records.len(), "bookmarks loaded");
                records
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "ignoring corrupt bookmark storage");
                Vec::new()
            }
        }
    }

    /// Deletes the stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails to write.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.remove(&self.key)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}
