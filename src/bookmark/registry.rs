//! Bookmark registry: the single owner of every bookmark record.
//!
//! The registry holds records for all documents seen during the session,
//! including those restored from storage. It enforces two invariants after
//! every mutation:
//!
//! - at most one record per `(document_key, line_index)`
//! - records are ordered by ascending `line_index` (stable across documents),
//!   so any per-document view is ascending too
//!
//! The synchronizer mutates records only through the crate-private hooks at
//! the bottom of this file, which keep those invariants intact.

use std::collections::{HashMap, HashSet};

use super::record::{AnchorHandle, BookmarkRecord, DocumentId, DEFAULT_LABEL};
use crate::host::ResolvedLine;

/// Result of [`BookmarkRegistry::toggle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A new record was created with the default label.
    Added,
    /// The existing record on that line was removed and is returned.
    Removed(BookmarkRecord),
}

impl ToggleOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, ToggleOutcome::Added)
    }
}

/// A record's new home decided by a re-anchoring pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Placement {
    pub from_line: usize,
    pub to_line: usize,
    pub text: String,
    pub anchor: AnchorHandle,
}

/// What a buffer-sync batch did to the registry.
#[derive(Debug, Default)]
pub(crate) struct AppliedSync {
    pub removed: Vec<BookmarkRecord>,
    pub updated: usize,
}

/// Ordered collection of bookmark records across documents.
#[derive(Debug, Clone)]
pub struct BookmarkRegistry {
    records: Vec<BookmarkRecord>,
    default_label: String,
}

impl BookmarkRegistry {
    /// Creates an empty registry using [`DEFAULT_LABEL`] for new bookmarks.
    pub fn new() -> Self {
        Self::with_default_label(DEFAULT_LABEL)
    }

    pub fn with_default_label(label: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            default_label: label.into(),
        }
    }

    pub fn default_label(&self) -> &str {
        &self.default_label
    }

    /// Replaces the whole collection, dropping duplicate lines (first wins)
    /// and re-establishing the ordering.
    pub fn restore(&mut self, records: Vec<BookmarkRecord>) {
        let mut seen = HashSet::new();
        self.records = records
            .into_iter()
            .filter(|r| seen.insert((r.document_key.clone(), r.line_index)))
            .collect();
        self.sort();
    }

    /// Adds a bookmark on `line_index`, or removes the one already there.
    pub fn toggle(
        &mut self,
        document: &DocumentId,
        line_index: usize,
        line_text: &str,
    ) -> ToggleOutcome {
        if let Some(existing) = self.take(&document.key, line_index) {
            tracing::debug!(document = %document.key, line = line_index, "bookmark removed");
            return ToggleOutcome::Removed(existing);
        }

        self.records.push(BookmarkRecord::new(
            document,
            line_index,
            line_text,
            self.default_label.clone(),
        ));
        self.sort();
        tracing::debug!(document = %document.key, line = line_index, "bookmark added");
        ToggleOutcome::Added
    }

    /// Removes the bookmark at `(document_key, line_index)`.
    ///
    /// Returns true if one existed.
    pub fn remove(&mut self, document_key: &str, line_index: usize) -> bool {
        self.take(document_key, line_index).is_some()
    }

    /// Removes and returns the bookmark at `(document_key, line_index)`.
    pub fn take(&mut self, document_key: &str, line_index: usize) -> Option<BookmarkRecord> {
        let pos = self
            .records
            .iter()
            .position(|r| r.is_at(document_key, line_index))?;
        Some(self.records.remove(pos))
    }

    /// Removes every bookmark of `document_key`, returning how many went.
    pub fn clear_all(&mut self, document_key: &str) -> usize {
        self.drain_document(document_key).len()
    }

    /// Removes and returns every bookmark of `document_key` in line order.
    pub fn drain_document(&mut self, document_key: &str) -> Vec<BookmarkRecord> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.records)
            .into_iter()
            .partition(|r| r.belongs_to(document_key));
        self.records = kept;
        removed
    }

    /// Sets the label of an exact match. Returns false when nothing matched.
    pub fn set_label(&mut self, document_key: &str, line_index: usize, label: &str) -> bool {
        match self
            .records
            .iter_mut()
            .find(|r| r.is_at(document_key, line_index))
        {
            Some(record) => {
                record.label = label.to_string();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, document_key: &str, line_index: usize) -> Option<&BookmarkRecord> {
        self.records
            .iter()
            .find(|r| r.is_at(document_key, line_index))
    }

    pub fn contains(&self, document_key: &str, line_index: usize) -> bool {
        self.get(document_key, line_index).is_some()
    }

    /// Bookmarks of one document, ascending by line.
    pub fn list_for(&self, document_key: &str) -> Vec<&BookmarkRecord> {
        self.records
            .iter()
            .filter(|r| r.belongs_to(document_key))
            .collect()
    }

    /// Every record, ascending by line.
    pub fn records(&self) -> &[BookmarkRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Smallest bookmarked line after `current_line`, wrapping to the first.
    ///
    /// Only bookmarks of `document_key` are considered.
    pub fn next(&self, document_key: &str, current_line: usize) -> Option<usize> {
        let lines = self.lines_for(document_key);
        lines
            .iter()
            .copied()
            .find(|&line| line > current_line)
            .or_else(|| lines.first().copied())
    }

    /// Largest bookmarked line before `current_line`, wrapping to the last.
    pub fn previous(&self, document_key: &str, current_line: usize) -> Option<usize> {
        let lines = self.lines_for(document_key);
        lines
            .iter()
            .rev()
            .copied()
            .find(|&line| line < current_line)
            .or_else(|| lines.last().copied())
    }

    fn lines_for(&self, document_key: &str) -> Vec<usize> {
        self.records
            .iter()
            .filter(|r| r.belongs_to(document_key))
            .map(|r| r.line_index)
            .collect()
    }

    fn sort(&mut self) {
        self.records.sort_by_key(|r| r.line_index);
    }

    // Synchronizer hooks

    pub(crate) fn attach_anchor(
        &mut self,
        document_key: &str,
        line_index: usize,
        anchor: AnchorHandle,
    ) -> bool {
        match self
            .records
            .iter_mut()
            .find(|r| r.is_at(document_key, line_index))
        {
            Some(record) => {
                record.anchor = Some(anchor);
                true
            }
            None => false,
        }
    }

    /// Unsets every anchor, returning the released handles with their lines.
    pub(crate) fn detach_anchors(&mut self) -> Vec<(AnchorHandle, usize)> {
        self.records
            .iter_mut()
            .filter_map(|r| r.anchor.take().map(|a| (a, r.line_index)))
            .collect()
    }

    /// Anchors currently held by records of `document_key`.
    pub(crate) fn anchors_for(&self, document_key: &str) -> Vec<AnchorHandle> {
        self.records
            .iter()
            .filter(|r| r.belongs_to(document_key))
            .filter_map(|r| r.anchor)
            .collect()
    }

    /// Applies freshly resolved anchor positions for one document.
    ///
    /// `None` means the anchored line is gone and the record is removed.
    /// When two records land on the same line the later one is removed.
    pub(crate) fn apply_resolutions(
        &mut self,
        document_key: &str,
        resolutions: &HashMap<AnchorHandle, Option<ResolvedLine>>,
    ) -> AppliedSync {
        let mut applied = AppliedSync::default();
        let mut kept = Vec::with_capacity(self.records.len());

        for mut record in std::mem::take(&mut self.records) {
            let resolution = match (record.belongs_to(document_key), record.anchor) {
                (true, Some(anchor)) => resolutions.get(&anchor),
                _ => None,
            };
            match resolution {
                Some(None) => applied.removed.push(record),
                Some(Some(resolved)) => {
                    if record.line_index != resolved.line_index || record.line_text != resolved.text
                    {
                        record.line_index = resolved.line_index;
                        record.line_text = resolved.text.clone();
                        applied.updated += 1;
                    }
                    kept.push(record);
                }
                None => kept.push(record),
            }
        }

        let mut taken = HashSet::new();
        for record in kept {
            if record.belongs_to(document_key) && !taken.insert(record.line_index) {
                applied.removed.push(record);
            } else {
                self.records.push(record);
            }
        }
        self.sort();
        applied
    }

    /// Moves records of `document_key` to their re-anchored lines and
    /// removes the records listed in `dropped` (by stored line).
    pub(crate) fn apply_placements(
        &mut self,
        document_key: &str,
        placements: Vec<Placement>,
        dropped: &[usize],
    ) -> Vec<BookmarkRecord> {
        let mut by_line: HashMap<usize, Placement> =
            placements.into_iter().map(|p| (p.from_line, p)).collect();
        let mut removed = Vec::new();

        for mut record in std::mem::take(&mut self.records) {
            if !record.belongs_to(document_key) {
                self.records.push(record);
                continue;
            }
            if dropped.contains(&record.line_index) {
                removed.push(record);
                continue;
            }
            if let Some(placement) = by_line.remove(&record.line_index) {
                record.line_index = placement.to_line;
                record.line_text = placement.text;
                record.anchor = Some(placement.anchor);
            }
            self.records.push(record);
        }
        self.sort();
        removed
    }
}

impl Default for BookmarkRegistry {
    fn default() -> Self {
        Self::new()
    }
}
