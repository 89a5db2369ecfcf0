//! Bookmarks panel view model.
//!
//! The presenter turns the registry into rows for the bookmarks panel. It
//! never mutates bookmarks itself: row actions go back through the session.
//! It subscribes to session changes through [`PanelPresenter::listener`],
//! which only marks the rows stale; rows are rebuilt on the next
//! [`refresh`](PanelPresenter::refresh).
//!
//! # Example
//!
//! ```
//! use markquill::bookmark::record::DocumentId;
//! use markquill::bookmark::registry::BookmarkRegistry;
//! use markquill::panel::{PanelPresenter, ViewFilter};
//!
//! let mut registry = BookmarkRegistry::new();
//! registry.toggle(&DocumentId::new("A", "a.txt"), 0, "first");
//! registry.toggle(&DocumentId::new("B", "b.txt"), 4, "other");
//!
//! let mut panel = PanelPresenter::new();
//! panel.refresh(&registry, Some("A"));
//! assert_eq!(panel.rows().len(), 1);
//! assert_eq!(panel.rows()[0].line_number, 1);
//!
//! panel.set_filter(ViewFilter::AllDocuments);
//! panel.refresh(&registry, Some("A"));
//! assert_eq!(panel.rows().len(), 2);
//! assert!(!panel.rows()[1].active);
//! ```

use std::cell::Cell;
use std::rc::Rc;

use crate::bookmark::record::BookmarkRecord;
use crate::bookmark::registry::BookmarkRegistry;
use crate::session::ChangeNotice;

/// Which bookmarks the panel lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewFilter {
    /// Only the displayed document's bookmarks.
    #[default]
    CurrentDocument,
    /// Every bookmark; other documents' rows are inactive.
    AllDocuments,
}

impl ViewFilter {
    pub fn toggled(self) -> Self {
        match self {
            ViewFilter::CurrentDocument => ViewFilter::AllDocuments,
            ViewFilter::AllDocuments => ViewFilter::CurrentDocument,
        }
    }
}

/// One line of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    pub document_key: String,
    pub file_name: String,
    pub line_index: usize,
    /// One-based, as shown.
    pub line_number: usize,
    pub label: String,
    pub text: String,
    /// True when the row belongs to the displayed document.
    pub active: bool,
}

impl PanelRow {
    fn from_record(record: &BookmarkRecord, active_document: Option<&str>) -> Self {
        Self {
            document_key: record.document_key.clone(),
            file_name: record.document_display_name.clone(),
            line_index: record.line_index,
            line_number: record.display_line(),
            label: record.label.clone(),
            text: record.line_text.clone(),
            active: active_document == Some(record.document_key.as_str()),
        }
    }
}

/// Rows, filter, selection and visibility of the bookmarks panel.
#[derive(Debug, Clone)]
pub struct PanelPresenter {
    visible: bool,
    filter: ViewFilter,
    rows: Vec<PanelRow>,
    selected: usize,
    stale: Rc<Cell<bool>>,
}

impl PanelPresenter {
    pub fn new() -> Self {
        Self {
            visible: false,
            filter: ViewFilter::default(),
            rows: Vec::new(),
            selected: 0,
            stale: Rc::new(Cell::new(true)),
        }
    }

    /// Callback for [`RegistrySession::subscribe`](crate::session::RegistrySession::subscribe).
    pub fn listener(&self) -> impl FnMut(&ChangeNotice<'_>) + 'static {
        let stale = Rc::clone(&self.stale);
        move |_| stale.set(true)
    }

    pub fn needs_refresh(&self) -> bool {
        self.stale.get()
    }

    /// Rebuilds rows from the registry.
    pub fn refresh(&mut self, registry: &BookmarkRegistry, active_document: Option<&str>) {
        self.rows = registry
            .records()
            .iter()
            .filter(|r| match self.filter {
                ViewFilter::AllDocuments => true,
                ViewFilter::CurrentDocument => active_document == Some(r.document_key.as_str()),
            })
            .map(|r| PanelRow::from_record(r, active_document))
            .collect();
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
        self.stale.set(false);
    }

    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if visible {
            self.stale.set(true);
        }
    }

    /// Shows or hides the panel, returning the new visibility.
    pub fn toggle_visible(&mut self) -> bool {
        self.set_visible(!self.visible);
        self.visible
    }

    pub fn filter(&self) -> ViewFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: ViewFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.stale.set(true);
        }
    }

    pub fn toggle_filter(&mut self) -> ViewFilter {
        self.set_filter(self.filter.toggled());
        self.filter
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&PanelRow> {
        self.rows.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Selects the row of `(document_key, line_index)` if listed.
    pub fn select_bookmark(&mut self, document_key: &str, line_index: usize) -> bool {
        match self
            .rows
            .iter()
            .position(|r| r.document_key == document_key && r.line_index == line_index)
        {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }
}

impl Default for PanelPresenter {
    fn default() -> Self {
        Self::new()
    }
}
