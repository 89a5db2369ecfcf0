//! Set of open documents with one displayed at a time.
//!
//! `Workspace` is the host side of the bookmark core: it implements
//! [`EditorBuffer`] by delegating to the displayed document's
//! [`TextBuffer`] and [`DocumentIdentity`] from that document's id. Files are
//! read whole on open and written atomically on save.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::buffer::{allocate_anchor, TextBuffer};
use crate::bookmark::record::{AnchorHandle, DocumentId};
use crate::host::{DocumentIdentity, EditorBuffer, ResolvedLine};

/// A document loaded into the workspace.
#[derive(Debug, Clone)]
pub struct OpenDocument {
    pub id: DocumentId,
    /// Backing file, `None` for scratch documents.
    pub path: Option<PathBuf>,
    pub buffer: TextBuffer,
}

/// Open documents plus the index of the displayed one.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    documents: Vec<OpenDocument>,
    active: Option<usize>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a file from disk and adds it to the workspace.
    ///
    /// The document key is the canonical path when it can be resolved. A
    /// file that is already open is not loaded twice; its index is returned.
    /// The first document opened becomes the displayed one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid UTF-8.
    pub fn open_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let resolved = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let key = resolved.to_string_lossy().into_owned();

        if let Some(index) = self.position(&key) {
            return Ok(index);
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file {}", path.display()))?;
        tracing::info!(path = %path.display(), "document opened");
        Ok(self.push(OpenDocument {
            id: DocumentId::from_path(key),
            path: Some(resolved),
            buffer: TextBuffer::from_text(&text),
        }))
    }

    /// Adds an in-memory document that has no backing file.
    pub fn open_text(&mut self, key: &str, display_name: &str, text: &str) -> usize {
        if let Some(index) = self.position(key) {
            return index;
        }
        self.push(OpenDocument {
            id: DocumentId::new(key, display_name),
            path: None,
            buffer: TextBuffer::from_text(text),
        })
    }

    fn push(&mut self, document: OpenDocument) -> usize {
        self.documents.push(document);
        let index = self.documents.len() - 1;
        if self.active.is_none() {
            self.active = Some(index);
        }
        index
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.documents.iter().position(|d| d.id.key == key)
    }

    pub fn documents(&self) -> &[OpenDocument] {
        &self.documents
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active(&self) -> Option<&OpenDocument> {
        self.active.and_then(|i| self.documents.get(i))
    }

    pub fn active_mut(&mut self) -> Option<&mut OpenDocument> {
        self.active.and_then(move |i| self.documents.get_mut(i))
    }

    /// Displays document `index`. Returns false if it does not exist or is
    /// already displayed.
    pub fn activate(&mut self, index: usize) -> bool {
        if index >= self.documents.len() || self.active == Some(index) {
            return false;
        }
        self.active = Some(index);
        true
    }

    /// Displays the document with `key`, if open.
    pub fn activate_key(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(index) => self.activate(index),
            None => false,
        }
    }

    /// Cycles to the next (or previous) document. Returns false when there
    /// is nothing to switch to.
    pub fn cycle(&mut self, forward: bool) -> bool {
        let count = self.documents.len();
        let Some(current) = self.active else {
            return false;
        };
        if count < 2 {
            return false;
        }
        let next = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
        self.activate(next)
    }

    /// Writes the displayed document to its file.
    ///
    /// When `create_backup` is set and the file exists, it is first copied to
    /// `<name>.bak`.
    ///
    /// # Errors
    ///
    /// Returns an error if no document is displayed, the document has no
    /// backing file, or writing fails.
    pub fn save_active(&mut self, create_backup: bool) -> Result<PathBuf> {
        let document = self
            .active_mut()
            .ok_or_else(|| anyhow::anyhow!("No document is displayed"))?;
        let path = document
            .path
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Document has no file name"))?;

        if create_backup && path.exists() {
            write_backup(&path)?;
        }
        write_file_atomic(&path, document.buffer.to_text().as_bytes())?;
        document.buffer.clear_dirty();
        tracing::info!(path = %path.display(), "document saved");
        Ok(path)
    }

    fn active_buffer(&self) -> Option<&TextBuffer> {
        self.active().map(|d| &d.buffer)
    }

    fn active_buffer_mut(&mut self) -> Option<&mut TextBuffer> {
        self.active_mut().map(|d| &mut d.buffer)
    }
}

/// Copies `path` to `<name>.bak` next to it.
fn write_backup(path: &Path) -> Result<()> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    fs::copy(path, path.with_file_name(format!("{}.bak", name)))
        .context("Failed to create backup")?;
    Ok(())
}

/// Writes to a sibling temp file, then renames it over `path`.
pub(crate) fn write_file_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, data).context("Failed to write temp file")?;
    fs::rename(&temp_path, path).context("Failed to rename temp file")?;
    Ok(())
}

impl EditorBuffer for Workspace {
    fn cursor_line(&self) -> usize {
        self.active_buffer().map_or(0, |b| b.cursor_line())
    }

    fn set_cursor_line(&mut self, line: usize) {
        if let Some(buffer) = self.active_buffer_mut() {
            buffer.set_cursor_line(line);
        }
    }

    fn line_count(&self) -> usize {
        self.active_buffer().map_or(0, |b| b.line_count())
    }

    fn line_text(&self, line: usize) -> Option<String> {
        self.active_buffer()?.line_text(line)
    }

    fn set_line_anchor(&mut self, line: usize) -> AnchorHandle {
        match self.active_buffer_mut() {
            Some(buffer) => buffer.set_line_anchor(line),
            // Nothing displayed: a handle that never resolves.
            None => allocate_anchor(),
        }
    }

    fn resolve_anchor(&self, handle: AnchorHandle) -> Option<ResolvedLine> {
        self.active_buffer()?.resolve_anchor(handle)
    }

    fn clear_anchor(&mut self, handle: AnchorHandle) {
        if let Some(document) = self
            .documents
            .iter_mut()
            .find(|d| d.buffer.owns_anchor(handle))
        {
            document.buffer.clear_anchor(handle);
        }
    }

    fn decorate_line(&mut self, line: usize, style: &str) {
        if let Some(buffer) = self.active_buffer_mut() {
            buffer.decorate_line(line, style);
        }
    }

    fn undecorate_line(&mut self, line: usize, style: &str) {
        if let Some(buffer) = self.active_buffer_mut() {
            buffer.undecorate_line(line, style);
        }
    }
}

impl DocumentIdentity for Workspace {
    fn current_document_key(&self) -> Option<String> {
        self.active().map(|d| d.id.key.clone())
    }

    fn current_document_display_name(&self) -> Option<String> {
        self.active().map(|d| d.id.display_name.clone())
    }
}
