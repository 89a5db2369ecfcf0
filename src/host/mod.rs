//! Capability contracts between the bookmark core and its host editor.
//!
//! The core never reaches into an editor directly. Everything it needs is
//! expressed through three small traits that the host implements and hands
//! to [`RegistrySession`](crate::session::RegistrySession) at construction:
//!
//! - [`EditorBuffer`]: cursor, line text, self-tracking anchors and line decorations
//!   for the document currently on screen
//! - [`DocumentIdentity`]: which document is on screen
//! - [`KeyValueStore`]: durable string storage
//!
//! Host notifications flow the other way as [`HostEvent`] values passed to
//! [`RegistrySession::handle_event`](crate::session::RegistrySession::handle_event).
//!
//! # Example
//!
//! ```
//! use markquill::document::workspace::Workspace;
//! use markquill::host::{DocumentIdentity, EditorBuffer};
//!
//! let mut workspace = Workspace::new();
//! workspace.open_text("notes.txt", "notes.txt", "alpha\nbeta\ngamma");
//!
//! let anchor = workspace.set_line_anchor(2);
//! assert_eq!(workspace.resolve_anchor(anchor).unwrap().line_index, 2);
//! assert_eq!(workspace.current_document_key().as_deref(), Some("notes.txt"));
//! ```

use crate::bookmark::record::{AnchorHandle, DocumentId};
use crate::storage::StorageError;

/// Style tag used to decorate bookmarked lines.
pub const BOOKMARK_LINE_STYLE: &str = "markquill-bookmark";

/// Where an anchor currently sits in the live buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLine {
    pub line_index: usize,
    pub text: String,
}

/// Lines touched by a buffer edit, in post-edit coordinates.
///
/// Informational only: the synchronizer re-resolves every anchor of the
/// displayed document regardless of the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditedRange {
    pub from_line: usize,
    pub to_line: usize,
}

impl EditedRange {
    pub fn new(from_line: usize, to_line: usize) -> Self {
        Self { from_line, to_line }
    }

    pub fn single(line: usize) -> Self {
        Self::new(line, line)
    }
}

/// Notifications the host delivers to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The displayed document's text changed.
    BufferChanged(EditedRange),
    /// A different document is now displayed (or none).
    ActiveDocumentChanged,
    /// The displayed document was written to disk.
    DocumentSaved,
}

/// Live text buffer of the displayed document.
///
/// Anchors are handles the buffer keeps attached to a line across edits.
/// An anchor whose line was deleted resolves to `None`.
pub trait EditorBuffer {
    /// Zero-based line holding the cursor.
    fn cursor_line(&self) -> usize;

    /// Moves the cursor to the start of `line` and brings it into view.
    fn set_cursor_line(&mut self, line: usize);

    fn line_count(&self) -> usize;

    fn line_text(&self, line: usize) -> Option<String>;

    /// Attaches a new anchor at the start of `line`.
    fn set_line_anchor(&mut self, line: usize) -> AnchorHandle;

    fn resolve_anchor(&self, handle: AnchorHandle) -> Option<ResolvedLine>;

    /// Releases an anchor. Unknown handles are ignored.
    fn clear_anchor(&mut self, handle: AnchorHandle);

    fn decorate_line(&mut self, line: usize, style: &str);

    fn undecorate_line(&mut self, line: usize, style: &str);
}

/// Identity of the displayed document.
pub trait DocumentIdentity {
    fn current_document_key(&self) -> Option<String>;

    fn current_document_display_name(&self) -> Option<String>;

    fn current_document(&self) -> Option<DocumentId> {
        let key = self.current_document_key()?;
        let display_name = self
            .current_document_display_name()
            .unwrap_or_else(|| key.clone());
        Some(DocumentId::new(key, display_name))
    }
}

/// Durable string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}
