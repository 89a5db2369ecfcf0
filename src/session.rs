//! Registry session: the per-process context that wires the bookmark core to
//! its host editor and storage.
//!
//! A `RegistrySession` is created once at startup and owns the registry, the
//! persistence adapter and the host capabilities. Every user action and host
//! notification goes through it. Each mutating action follows the same order:
//!
//! 1. mutate the registry (and the host's anchors/decorations)
//! 2. persist a full snapshot
//! 3. notify subscribers synchronously
//!
//! so a subscriber re-rendering the panel always observes the persisted,
//! post-mutation state.
//!
//! # Example
//!
//! ```
//! use markquill::document::workspace::Workspace;
//! use markquill::host::EditorBuffer;
//! use markquill::session::{RegistrySession, SessionOptions};
//! use markquill::storage::MemoryStore;
//!
//! let mut workspace = Workspace::new();
//! workspace.open_text("A", "A", "a\nb\nc\nd\ne\nf\ng");
//!
//! let mut session = RegistrySession::new(workspace, MemoryStore::new(), SessionOptions::default());
//! session.host_mut().set_cursor_line(5);
//! session.toggle_at_cursor();
//!
//! let snapshot = session.snapshot_for("A");
//! assert_eq!(snapshot.len(), 1);
//! assert_eq!(snapshot[0].line_index, 5);
//! assert_eq!(snapshot[0].label, "BOOKMARK");
//! ```

use crate::bookmark::record::{BookmarkRecord, DEFAULT_LABEL};
use crate::bookmark::registry::{BookmarkRegistry, ToggleOutcome};
use crate::bookmark::sync::{activate_document, release_anchors, sync_buffer};
use crate::host::{DocumentIdentity, EditorBuffer, HostEvent, KeyValueStore, BOOKMARK_LINE_STYLE};
use crate::storage::{BookmarkStore, DEFAULT_STORAGE_KEY};

/// Construction parameters for [`RegistrySession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub storage_key: String,
    pub default_label: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_label: DEFAULT_LABEL.to_string(),
        }
    }
}

/// Why subscribers are being notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    Toggled,
    Removed,
    Cleared,
    Relabeled,
    /// Buffer edits moved or deleted bookmarks.
    Synchronized,
    DocumentActivated,
    DocumentSaved,
}

/// Read-only view handed to subscribers after a change.
#[derive(Debug)]
pub struct ChangeNotice<'a> {
    pub cause: ChangeCause,
    pub active_document: Option<&'a str>,
    pub registry: &'a BookmarkRegistry,
}

impl ChangeNotice<'_> {
    /// Bookmarks of the displayed document, ascending.
    pub fn active_bookmarks(&self) -> Vec<&BookmarkRecord> {
        self.active_document
            .map(|key| self.registry.list_for(key))
            .unwrap_or_default()
    }
}

/// Callback invoked after every change.
pub type Listener = Box<dyn FnMut(&ChangeNotice<'_>)>;

/// Handle returned by [`RegistrySession::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Bookmark registry bound to a host editor and a key-value store.
pub struct RegistrySession<H, S> {
    host: H,
    storage: BookmarkStore<S>,
    registry: BookmarkRegistry,
    active_document: Option<String>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<H, S> RegistrySession<H, S>
where
    H: EditorBuffer + DocumentIdentity,
    S: KeyValueStore,
{
    /// Loads stored bookmarks and anchors those of the displayed document.
    pub fn new(host: H, store: S, options: SessionOptions) -> Self {
        let storage = BookmarkStore::with_key(store, options.storage_key)
            .with_default_label(options.default_label.clone());
        let mut registry = BookmarkRegistry::with_default_label(options.default_label);
        registry.restore(storage.load());

        let mut session = Self {
            host,
            storage,
            registry,
            active_document: None,
            listeners: Vec::new(),
            next_subscription: 0,
        };
        if session.attach_active_document() {
            session.persist();
        }
        tracing::info!(
            bookmarks = session.registry.len(),
            document = session.active_document.as_deref().unwrap_or("-"),
            "bookmark session started"
        );
        session
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access for edits. Report edits with
    /// [`handle_event`](Self::handle_event) afterwards.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn registry(&self) -> &BookmarkRegistry {
        &self.registry
    }

    pub fn storage(&self) -> &BookmarkStore<S> {
        &self.storage
    }

    /// Key of the document whose bookmarks carry live anchors.
    pub fn active_document(&self) -> Option<&str> {
        self.active_document.as_deref()
    }

    /// Toggles the bookmark on the cursor line of the displayed document.
    ///
    /// Returns `None` when no document is displayed.
    pub fn toggle_at_cursor(&mut self) -> Option<ToggleOutcome> {
        let document = self.host.current_document()?;
        self.ensure_active(&document.key);

        let line = self.host.cursor_line();
        let text = self.host.line_text(line).unwrap_or_default();
        let outcome = self.registry.toggle(&document, line, &text);
        match &outcome {
            ToggleOutcome::Added => {
                let anchor = self.host.set_line_anchor(line);
                self.registry.attach_anchor(&document.key, line, anchor);
                self.host.decorate_line(line, BOOKMARK_LINE_STYLE);
            }
            ToggleOutcome::Removed(record) => self.release(record),
        }
        self.commit(ChangeCause::Toggled);
        Some(outcome)
    }

    /// Moves the cursor to the next bookmark of the displayed document,
    /// wrapping to the first. No-op without bookmarks.
    pub fn jump_next(&mut self) -> Option<usize> {
        let key = self.follow_displayed_document()?;
        let target = self.registry.next(&key, self.host.cursor_line())?;
        self.host.set_cursor_line(target);
        Some(target)
    }

    /// Moves the cursor to the previous bookmark, wrapping to the last.
    pub fn jump_previous(&mut self) -> Option<usize> {
        let key = self.follow_displayed_document()?;
        let target = self.registry.previous(&key, self.host.cursor_line())?;
        self.host.set_cursor_line(target);
        Some(target)
    }

    /// Moves the cursor to a bookmark picked from the panel.
    ///
    /// Only bookmarks of the displayed document can be jumped to.
    pub fn jump_to(&mut self, document_key: &str, line_index: usize) -> bool {
        if self.active_document.as_deref() != Some(document_key)
            || !self.registry.contains(document_key, line_index)
        {
            return false;
        }
        self.host.set_cursor_line(line_index);
        true
    }

    /// Removes one bookmark. Returns whether it existed.
    pub fn remove_at(&mut self, document_key: &str, line_index: usize) -> bool {
        let Some(record) = self.registry.take(document_key, line_index) else {
            return false;
        };
        self.release(&record);
        self.commit(ChangeCause::Removed);
        true
    }

    /// Removes every bookmark of the displayed document.
    pub fn clear_current_document(&mut self) -> usize {
        let Some(key) = self.active_document.clone() else {
            return 0;
        };
        let removed = self.registry.drain_document(&key);
        for record in &removed {
            self.release(record);
        }
        if !removed.is_empty() {
            tracing::debug!(document = %key, count = removed.len(), "bookmarks cleared");
            self.commit(ChangeCause::Cleared);
        }
        removed.len()
    }

    /// Changes a bookmark's label. Returns false when no bookmark matched.
    pub fn rename_label(&mut self, document_key: &str, line_index: usize, label: &str) -> bool {
        if !self.registry.set_label(document_key, line_index, label) {
            return false;
        }
        self.commit(ChangeCause::Relabeled);
        true
    }

    /// Copy of a document's bookmarks, ascending, for rendering.
    pub fn snapshot_for(&self, document_key: &str) -> Vec<BookmarkRecord> {
        self.registry
            .list_for(document_key)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Registers a callback run after every change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&ChangeNotice<'_>) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a callback. Returns false for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Reacts to a host notification. Returns true if bookmarks changed.
    pub fn handle_event(&mut self, event: HostEvent) -> bool {
        match event {
            HostEvent::BufferChanged(_) => {
                let Some(key) = self.host.current_document_key() else {
                    return false;
                };
                let reattached = self.ensure_active(&key);
                let report = sync_buffer(&mut self.registry, &mut self.host, &key);
                let changed = reattached || report.changed();
                if changed {
                    self.commit(ChangeCause::Synchronized);
                }
                changed
            }
            HostEvent::ActiveDocumentChanged => {
                let changed = self.attach_active_document();
                if changed {
                    self.persist();
                }
                self.notify(ChangeCause::DocumentActivated);
                changed
            }
            HostEvent::DocumentSaved => {
                self.notify(ChangeCause::DocumentSaved);
                false
            }
        }
    }

    /// Writes a final snapshot, releases all anchors, and hands the
    /// collaborators back.
    pub fn shutdown(mut self) -> (H, S) {
        self.persist();
        release_anchors(&mut self.registry, &mut self.host);
        tracing::info!(bookmarks = self.registry.len(), "bookmark session closed");
        (self.host, self.storage.into_inner())
    }

    /// Drops anchors of the previous document and anchors the displayed one.
    /// Returns true if re-anchoring moved or dropped any record.
    fn attach_active_document(&mut self) -> bool {
        release_anchors(&mut self.registry, &mut self.host);
        self.active_document = self.host.current_document_key();
        let Some(key) = self.active_document.clone() else {
            return false;
        };
        let report = activate_document(&mut self.registry, &mut self.host, &key);
        report.relocated > 0 || report.dropped > 0
    }

    // Hosts that switch documents without sending `ActiveDocumentChanged`
    // would otherwise get anchors attached to the wrong buffer.
    // Returns true if re-anchoring moved or dropped records.
    fn ensure_active(&mut self, document_key: &str) -> bool {
        if self.active_document.as_deref() == Some(document_key) {
            return false;
        }
        tracing::debug!(document = document_key, "document switch was not reported");
        let changed = self.attach_active_document();
        if changed {
            self.persist();
        }
        changed
    }

    fn follow_displayed_document(&mut self) -> Option<String> {
        let key = self.host.current_document_key()?;
        self.ensure_active(&key);
        Some(key)
    }

    fn release(&mut self, record: &BookmarkRecord) {
        if let Some(anchor) = record.anchor {
            self.host.clear_anchor(anchor);
        }
        if self.active_document.as_deref() == Some(record.document_key.as_str()) {
            self.host
                .undecorate_line(record.line_index, BOOKMARK_LINE_STYLE);
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.storage.save(self.registry.records()) {
            tracing::warn!(key = self.storage.key(), error = %e, "failed to save bookmarks");
        }
    }

    fn commit(&mut self, cause: ChangeCause) {
        self.persist();
        self.notify(cause);
    }

    fn notify(&mut self, cause: ChangeCause) {
        let notice = ChangeNotice {
            cause,
            active_document: self.active_document.as_deref(),
            registry: &self.registry,
        };
        for (_, listener) in self.listeners.iter_mut() {
            listener(&notice);
        }
    }
}
