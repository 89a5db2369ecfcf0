//! Line-oriented text buffer with self-tracking anchors.
//!
//! `TextBuffer` is the reference implementation of
//! [`EditorBuffer`](crate::host::EditorBuffer). Each line carries its own set
//! of decoration tags, so decorations move with their line on insertion and
//! vanish with it on deletion. Anchors are tracked by line index and shifted
//! by every structural edit; an anchor whose line is deleted stops resolving.
//!
//! # Example
//!
//! ```
//! use markquill::document::buffer::TextBuffer;
//! use markquill::host::EditorBuffer;
//!
//! let mut buffer = TextBuffer::from_text("one\ntwo\nthree");
//! let anchor = buffer.set_line_anchor(1);
//!
//! buffer.insert_line(0, "zero");
//! assert_eq!(buffer.resolve_anchor(anchor).unwrap().line_index, 2);
//!
//! buffer.delete_line(2);
//! assert!(buffer.resolve_anchor(anchor).is_none());
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::bookmark::record::AnchorHandle;
use crate::host::{EditedRange, EditorBuffer, ResolvedLine};

// Anchor ids are unique across all buffers of the process so a handle can be
// routed back to the buffer that issued it.
static NEXT_ANCHOR_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn allocate_anchor() -> AnchorHandle {
    AnchorHandle::new(NEXT_ANCHOR_ID.fetch_add(1, Ordering::Relaxed))
}

#[derive(Debug, Clone, Default)]
struct Line {
    text: String,
    styles: BTreeSet<String>,
}

impl Line {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            styles: BTreeSet::new(),
        }
    }
}

/// Editable list of lines. Always holds at least one (possibly empty) line.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<Line>,
    cursor: usize,
    /// `None` once the anchored line has been deleted.
    anchors: HashMap<AnchorHandle, Option<usize>>,
    trailing_newline: bool,
    dirty: bool,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Splits `text` into lines. A trailing newline is remembered for
    /// [`to_text`](Self::to_text) rather than producing an extra empty line.
    pub fn from_text(text: &str) -> Self {
        let trailing_newline = text.ends_with('\n');
        let body = text.strip_suffix('\n').unwrap_or(text);
        let body = body.strip_suffix('\r').unwrap_or(body);
        let mut lines: Vec<Line> = body
            .split('\n')
            .map(|l| Line::new(l.strip_suffix('\r').unwrap_or(l)))
            .collect();
        if lines.is_empty() {
            lines.push(Line::default());
        }
        Self {
            lines,
            cursor: 0,
            anchors: HashMap::new(),
            trailing_newline,
            dirty: false,
        }
    }

    pub fn to_text(&self) -> String {
        let mut text = self
            .lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if self.trailing_newline {
            text.push('\n');
        }
        text
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|l| l.text.as_str())
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.text.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when the buffer holds a single empty line.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].text.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn is_decorated(&self, line: usize, style: &str) -> bool {
        self.lines
            .get(line)
            .is_some_and(|l| l.styles.contains(style))
    }

    /// Lines carrying `style`, ascending.
    pub fn decorated_lines(&self, style: &str) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.styles.contains(style))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn owns_anchor(&self, handle: AnchorHandle) -> bool {
        self.anchors.contains_key(&handle)
    }

    /// Inserts a line before `at` (or appends when `at` is past the end).
    pub fn insert_line(&mut self, at: usize, text: &str) -> EditedRange {
        self.insert_lines(at, &[text])
    }

    /// Inserts `texts` as consecutive lines starting at `at`.
    pub fn insert_lines(&mut self, at: usize, texts: &[&str]) -> EditedRange {
        let at = at.min(self.lines.len());
        let count = texts.len();
        if count == 0 {
            return EditedRange::single(at);
        }

        for (offset, text) in texts.iter().enumerate() {
            self.lines.insert(at + offset, Line::new(*text));
        }
        for line in self.anchors.values_mut().flatten() {
            if *line >= at {
                *line += count;
            }
        }
        if self.cursor >= at {
            self.cursor += count;
        }
        self.dirty = true;
        EditedRange::new(at, at + count - 1)
    }

    /// Deletes line `at`. Returns `None` when `at` is out of range.
    ///
    /// Deleting the only line leaves one empty line behind; anchors on the
    /// deleted line stop resolving either way.
    pub fn delete_line(&mut self, at: usize) -> Option<EditedRange> {
        if at >= self.lines.len() {
            return None;
        }

        self.lines.remove(at);
        if self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        for slot in self.anchors.values_mut() {
            *slot = match *slot {
                Some(line) if line == at => None,
                Some(line) if line > at => Some(line - 1),
                other => other,
            };
        }
        self.cursor = self.cursor.min(self.lines.len() - 1);
        self.dirty = true;
        Some(EditedRange::single(at.min(self.lines.len() - 1)))
    }

    /// Replaces the text of line `at`, keeping its anchors and decorations.
    pub fn set_line_text(&mut self, at: usize, text: &str) -> Option<EditedRange> {
        let line = self.lines.get_mut(at)?;
        if line.text != text {
            line.text = text.to_string();
            self.dirty = true;
        }
        Some(EditedRange::single(at))
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorBuffer for TextBuffer {
    fn cursor_line(&self) -> usize {
        self.cursor
    }

    fn set_cursor_line(&mut self, line: usize) {
        self.cursor = line.min(self.lines.len() - 1);
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_text(&self, line: usize) -> Option<String> {
        self.line(line).map(str::to_string)
    }

    fn set_line_anchor(&mut self, line: usize) -> AnchorHandle {
        let handle = allocate_anchor();
        self.anchors
            .insert(handle, Some(line.min(self.lines.len() - 1)));
        handle
    }

    fn resolve_anchor(&self, handle: AnchorHandle) -> Option<ResolvedLine> {
        let line_index = (*self.anchors.get(&handle)?)?;
        let text = self.line_text(line_index)?;
        Some(ResolvedLine { line_index, text })
    }

    fn clear_anchor(&mut self, handle: AnchorHandle) {
        self.anchors.remove(&handle);
    }

    fn decorate_line(&mut self, line: usize, style: &str) {
        if let Some(l) = self.lines.get_mut(line) {
            l.styles.insert(style.to_string());
        }
    }

    fn undecorate_line(&mut self, line: usize, style: &str) {
        if let Some(l) = self.lines.get_mut(line) {
            l.styles.remove(style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_tracks_trailing_newline() {
        let buffer = TextBuffer::from_text("a\nb\n");
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.to_text(), "a\nb\n");

        let buffer = TextBuffer::from_text("a\r\nb");
        assert_eq!(buffer.line(0), Some("a"));
        assert_eq!(buffer.to_text(), "a\nb");
    }

    #[test]
    fn test_empty_text_has_one_line() {
        let buffer = TextBuffer::from_text("");
        assert_eq!(buffer.len(), 1);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_insert_shifts_anchor_on_same_line() {
        let mut buffer = TextBuffer::from_text("a\nb");
        let anchor = buffer.set_line_anchor(1);
        buffer.insert_lines(1, &["x", "y"]);

        let resolved = buffer.resolve_anchor(anchor).unwrap();
        assert_eq!(resolved.line_index, 3);
        assert_eq!(resolved.text, "b");
    }

    #[test]
    fn test_insert_below_leaves_anchor() {
        let mut buffer = TextBuffer::from_text("a\nb");
        let anchor = buffer.set_line_anchor(0);
        buffer.insert_line(1, "x");
        assert_eq!(buffer.resolve_anchor(anchor).unwrap().line_index, 0);
    }

    #[test]
    fn test_decorations_move_with_lines() {
        let mut buffer = TextBuffer::from_text("a\nb\nc");
        buffer.decorate_line(1, "mark");
        buffer.insert_line(0, "top");
        assert_eq!(buffer.decorated_lines("mark"), vec![2]);

        buffer.delete_line(2);
        assert!(buffer.decorated_lines("mark").is_empty());
    }

    #[test]
    fn test_delete_only_line_keeps_one_line() {
        let mut buffer = TextBuffer::from_text("solo");
        let anchor = buffer.set_line_anchor(0);
        buffer.delete_line(0);

        assert_eq!(buffer.len(), 1);
        assert!(buffer.resolve_anchor(anchor).is_none());
    }

    #[test]
    fn test_set_line_text_keeps_anchor() {
        let mut buffer = TextBuffer::from_text("a\nb");
        let anchor = buffer.set_line_anchor(1);
        buffer.set_line_text(1, "bee");
        assert_eq!(buffer.resolve_anchor(anchor).unwrap().text, "bee");
        assert!(buffer.is_dirty());
    }

    #[test]
    fn test_clear_anchor_stops_tracking() {
        let mut buffer = TextBuffer::from_text("a");
        let anchor = buffer.set_line_anchor(0);
        buffer.clear_anchor(anchor);
        assert!(!buffer.owns_anchor(anchor));
        assert!(buffer.resolve_anchor(anchor).is_none());
    }
}
