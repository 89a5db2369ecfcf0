//! Position synchronizer.
//!
//! Bookmarks of the displayed document carry a live anchor that the host
//! buffer moves along with edits. After every buffer change
//! [`sync_buffer`] reads each anchor back and copies its line and text into
//! the record, dropping records whose line was deleted.
//!
//! Documents that are not displayed have no anchors. When a document is
//! displayed again, [`activate_document`] attaches fresh anchors, using the
//! stored line text to re-find lines that drifted while the document was
//! away. The text match is a hint: when it finds nothing the stored line
//! number is used as is.

use std::collections::{HashMap, HashSet};

use super::record::BookmarkRecord;
use super::registry::{BookmarkRegistry, Placement};
use crate::host::{EditorBuffer, BOOKMARK_LINE_STYLE};

/// Changes made by a synchronization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Records removed because their line no longer exists (or collided).
    pub removed: usize,
    /// Records whose line index or text changed.
    pub updated: usize,
}

impl SyncReport {
    /// True when the panel needs to re-render.
    pub fn changed(&self) -> bool {
        self.removed > 0 || self.updated > 0
    }
}

/// Result of attaching anchors to a newly displayed document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivationReport {
    pub anchored: usize,
    /// Records moved off their stored line by the text heuristic or clamping.
    pub relocated: usize,
    /// Records dropped because their target line was already bookmarked.
    pub dropped: usize,
}

/// Re-reads every anchor of `document_key` after a buffer edit.
pub fn sync_buffer<B: EditorBuffer + ?Sized>(
    registry: &mut BookmarkRegistry,
    buffer: &mut B,
    document_key: &str,
) -> SyncReport {
    let resolutions: HashMap<_, _> = registry
        .anchors_for(document_key)
        .into_iter()
        .map(|anchor| (anchor, buffer.resolve_anchor(anchor)))
        .collect();
    if resolutions.is_empty() {
        return SyncReport::default();
    }

    let applied = registry.apply_resolutions(document_key, &resolutions);
    release_removed(buffer, &applied.removed);

    let report = SyncReport {
        removed: applied.removed.len(),
        updated: applied.updated,
    };
    if report.changed() {
        tracing::debug!(
            document = document_key,
            removed = report.removed,
            updated = report.updated,
            "bookmarks synchronized"
        );
    }
    report
}

/// Releases every anchor held by any record.
///
/// Called before a different document is displayed; afterwards records carry
/// only their last synchronized line and text.
pub fn release_anchors<B: EditorBuffer + ?Sized>(registry: &mut BookmarkRegistry, buffer: &mut B) {
    for (anchor, _) in registry.detach_anchors() {
        buffer.clear_anchor(anchor);
    }
}

/// Attaches anchors and decorations for every bookmark of the displayed
/// document `document_key`.
pub fn activate_document<B: EditorBuffer + ?Sized>(
    registry: &mut BookmarkRegistry,
    buffer: &mut B,
    document_key: &str,
) -> ActivationReport {
    // Bookmarks removed while the document was hidden left their decoration.
    for line in 0..buffer.line_count() {
        buffer.undecorate_line(line, BOOKMARK_LINE_STYLE);
    }

    let stored: Vec<(usize, String)> = registry
        .list_for(document_key)
        .into_iter()
        .map(|r| (r.line_index, r.line_text.clone()))
        .collect();
    if stored.is_empty() {
        return ActivationReport::default();
    }

    let line_count = buffer.line_count().max(1);
    let mut taken = HashSet::new();
    let mut targets: HashMap<usize, usize> = HashMap::new();

    // Records still sitting on their own text keep their line first.
    for (line, text) in &stored {
        if *line < line_count && line_matches(buffer, *line, text) {
            taken.insert(*line);
            targets.insert(*line, *line);
        }
    }

    let mut dropped = Vec::new();
    for (line, text) in &stored {
        if targets.contains_key(line) {
            continue;
        }
        let target = nearest_text_match(buffer, *line, text, line_count, &taken)
            .unwrap_or_else(|| (*line).min(line_count - 1));
        if taken.insert(target) {
            targets.insert(*line, target);
        } else {
            dropped.push(*line);
        }
    }

    let mut report = ActivationReport {
        dropped: dropped.len(),
        ..ActivationReport::default()
    };
    let mut placements = Vec::with_capacity(targets.len());
    for (from_line, to_line) in targets {
        if from_line != to_line {
            report.relocated += 1;
        }
        let anchor = buffer.set_line_anchor(to_line);
        buffer.decorate_line(to_line, BOOKMARK_LINE_STYLE);
        placements.push(Placement {
            from_line,
            to_line,
            text: buffer.line_text(to_line).unwrap_or_default(),
            anchor,
        });
    }
    report.anchored = placements.len();

    let removed = registry.apply_placements(document_key, placements, &dropped);
    if report.relocated > 0 || !removed.is_empty() {
        tracing::debug!(
            document = document_key,
            relocated = report.relocated,
            dropped = removed.len(),
            "bookmarks re-anchored"
        );
    }
    report
}

fn line_matches<B: EditorBuffer + ?Sized>(buffer: &B, line: usize, text: &str) -> bool {
    text.is_empty() || buffer.line_text(line).as_deref() == Some(text)
}

/// Closest line holding exactly `text`, searching outward from `origin`
/// with the line above winning ties.
fn nearest_text_match<B: EditorBuffer + ?Sized>(
    buffer: &B,
    origin: usize,
    text: &str,
    line_count: usize,
    taken: &HashSet<usize>,
) -> Option<usize> {
    if text.is_empty() {
        return None;
    }
    let origin = origin.min(line_count - 1);
    let is_match =
        |line: usize| !taken.contains(&line) && buffer.line_text(line).as_deref() == Some(text);

    if is_match(origin) {
        return Some(origin);
    }
    for distance in 1..line_count {
        if let Some(above) = origin.checked_sub(distance) {
            if is_match(above) {
                return Some(above);
            }
        }
        let below = origin + distance;
        if below < line_count && is_match(below) {
            return Some(below);
        }
        if origin < distance && below >= line_count {
            break;
        }
    }
    None
}

fn release_removed<B: EditorBuffer + ?Sized>(buffer: &mut B, removed: &[BookmarkRecord]) {
    for record in removed {
        if let Some(anchor) = record.anchor {
            buffer.clear_anchor(anchor);
        }
    }
}
