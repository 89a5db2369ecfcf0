//! Bookmark record and document identity value types.

use std::fmt;

/// Label given to new bookmarks when none is configured.
pub const DEFAULT_LABEL: &str = "BOOKMARK";

/// Opaque handle to a host-side line anchor.
///
/// Only meaningful inside the running host editor; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorHandle(u64);

impl AnchorHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// Key and human-readable name of a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId {
    /// Stable path or URL; the identity of the document.
    pub key: String,
    /// Derived name for display (usually the file name).
    pub display_name: String,
}

impl DocumentId {
    pub fn new(key: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
        }
    }

    /// Builds an id whose display name is the last path segment of `key`.
    ///
    /// ```
    /// use markquill::bookmark::record::DocumentId;
    ///
    /// let doc = DocumentId::from_path("/home/me/src/main.rs");
    /// assert_eq!(doc.display_name, "main.rs");
    /// ```
    pub fn from_path(key: impl Into<String>) -> Self {
        let key = key.into();
        let display_name = key
            .rsplit(['/', '\\'])
            .find(|segment| !segment.is_empty())
            .unwrap_or(&key)
            .to_string();
        Self { key, display_name }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

/// A bookmarked line.
///
/// `line_index` and `line_text` are exact while the owning document is
/// displayed and a last-known snapshot otherwise. `anchor` is set only while
/// the owning document is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkRecord {
    pub document_key: String,
    pub document_display_name: String,
    pub line_index: usize,
    pub line_text: String,
    pub label: String,
    pub anchor: Option<AnchorHandle>,
}

impl BookmarkRecord {
    pub fn new(
        document: &DocumentId,
        line_index: usize,
        line_text: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            document_key: document.key.clone(),
            document_display_name: document.display_name.clone(),
            line_index,
            line_text: line_text.into(),
            label: label.into(),
            anchor: None,
        }
    }

    pub fn belongs_to(&self, document_key: &str) -> bool {
        self.document_key == document_key
    }

    pub fn is_at(&self, document_key: &str, line_index: usize) -> bool {
        self.line_index == line_index && self.belongs_to(document_key)
    }

    /// One-based line number as shown to users.
    pub fn display_line(&self) -> usize {
        self.line_index + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_uses_last_segment() {
        assert_eq!(DocumentId::from_path("a/b/c.txt").display_name, "c.txt");
        assert_eq!(DocumentId::from_path("C:\\work\\x.js").display_name, "x.js");
        assert_eq!(DocumentId::from_path("plain").display_name, "plain");
    }

    #[test]
    fn test_from_path_ignores_trailing_separator() {
        assert_eq!(DocumentId::from_path("dir/sub/").display_name, "sub");
    }

    #[test]
    fn test_new_record_has_no_anchor() {
        let doc = DocumentId::new("A", "A");
        let record = BookmarkRecord::new(&doc, 4, "text", DEFAULT_LABEL);
        assert_eq!(record.anchor, None);
        assert_eq!(record.display_line(), 5);
        assert!(record.is_at("A", 4));
        assert!(!record.is_at("B", 4));
    }
}
