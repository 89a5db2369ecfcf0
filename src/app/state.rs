//! Application state management.
//!
//! This module provides the `AppState` struct that holds all runtime state of
//! the terminal host: the bookmark session (which owns the open documents),
//! the bookmarks panel, the current mode, the prompt and the status message.
//!
//! Every editing command reports back to the session with a
//! [`HostEvent`] so bookmarks follow the text.
//!
//! # Example
//!
//! ```
//! use markquill::app::state::AppState;
//! use markquill::config::Config;
//! use markquill::document::workspace::Workspace;
//! use markquill::session::RegistrySession;
//! use markquill::storage::MemoryStore;
//!
//! let mut workspace = Workspace::new();
//! workspace.open_text("A", "a.txt", "one\ntwo\nthree");
//! let config = Config::default();
//! let session = RegistrySession::new(workspace, MemoryStore::new(), config.session_options());
//! let mut state = AppState::new(session, &config);
//!
//! state.move_cursor(2);
//! state.toggle_bookmark();
//! state.open_line_above();
//! assert!(state.session().registry().contains("A", 3));
//! ```

use super::mode::AppMode;
use crate::bookmark::registry::ToggleOutcome;
use crate::config::Config;
use crate::document::workspace::Workspace;
use crate::host::{DocumentIdentity, EditedRange, EditorBuffer, HostEvent, KeyValueStore};
use crate::panel::{PanelPresenter, ViewFilter};
use crate::session::RegistrySession;

/// Represents a message to display to the user.
#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub level: MessageLevel,
}

/// Message severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// What a submitted prompt does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    RenameLabel {
        document_key: String,
        line_index: usize,
    },
    EditLine {
        line_index: usize,
    },
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            PromptKind::RenameLabel { .. } => "Label: ",
            PromptKind::EditLine { .. } => "Line: ",
        }
    }
}

/// Single-line text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub buffer: String,
    /// Cursor position in characters.
    pub cursor: usize,
}

impl Prompt {
    fn new(kind: PromptKind, initial: &str) -> Self {
        Self {
            kind,
            buffer: initial.to_string(),
            cursor: initial.chars().count(),
        }
    }

    fn byte_offset(&self) -> usize {
        self.buffer
            .char_indices()
            .nth(self.cursor)
            .map_or(self.buffer.len(), |(i, _)| i)
    }
}

/// Runtime state of the terminal host.
pub struct AppState<S> {
    session: RegistrySession<Workspace, S>,
    panel: PanelPresenter,
    mode: AppMode,
    prompt: Option<Prompt>,
    /// Mode to return to once the prompt closes.
    prompt_return: AppMode,
    message: Option<Message>,
    scroll_offset: usize,
    show_line_numbers: bool,
    create_backup: bool,
    panel_height: u16,
}

impl<S: KeyValueStore> AppState<S> {
    pub fn new(mut session: RegistrySession<Workspace, S>, config: &Config) -> Self {
        let mut panel = PanelPresenter::new();
        panel.set_visible(config.show_panel);
        if config.view_all_documents {
            panel.set_filter(ViewFilter::AllDocuments);
        }
        session.subscribe(panel.listener());

        Self {
            session,
            panel,
            mode: AppMode::Normal,
            prompt: None,
            prompt_return: AppMode::Normal,
            message: None,
            scroll_offset: 0,
            show_line_numbers: config.show_line_numbers,
            create_backup: config.create_backup,
            panel_height: config.panel_height,
        }
    }

    pub fn session(&self) -> &RegistrySession<Workspace, S> {
        &self.session
    }

    pub fn workspace(&self) -> &Workspace {
        self.session.host()
    }

    pub fn panel(&self) -> &PanelPresenter {
        &self.panel
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn set_message(&mut self, text: impl Into<String>, level: MessageLevel) {
        self.message = Some(Message {
            text: text.into(),
            level,
        });
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn show_line_numbers(&self) -> bool {
        self.show_line_numbers
    }

    pub fn panel_height(&self) -> u16 {
        self.panel_height
    }

    pub fn cursor_line(&self) -> usize {
        self.session.host().cursor_line()
    }

    /// Rebuilds panel rows if the session reported changes since the last
    /// refresh. Call before rendering.
    pub fn refresh_panel(&mut self) {
        if self.panel.needs_refresh() {
            self.panel
                .refresh(self.session.registry(), self.session.active_document());
        }
    }

    /// Keeps the cursor line inside a viewport of `height` lines.
    pub fn adjust_scroll_to_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        let cursor = self.cursor_line();
        if cursor < self.scroll_offset {
            self.scroll_offset = cursor;
        } else if cursor >= self.scroll_offset + height {
            self.scroll_offset = cursor + 1 - height;
        }
    }

    // Cursor movement

    pub fn move_cursor(&mut self, delta: isize) {
        let current = self.cursor_line();
        let target = current.saturating_add_signed(delta);
        self.session.host_mut().set_cursor_line(target);
    }

    pub fn cursor_to_top(&mut self) {
        self.session.host_mut().set_cursor_line(0);
    }

    pub fn cursor_to_bottom(&mut self) {
        let last = self.session.host().line_count().saturating_sub(1);
        self.session.host_mut().set_cursor_line(last);
    }

    // Bookmark commands

    pub fn toggle_bookmark(&mut self) {
        let line = self.cursor_line() + 1;
        match self.session.toggle_at_cursor() {
            Some(ToggleOutcome::Added) => {
                self.set_message(format!("Bookmark added at line {}", line), MessageLevel::Info)
            }
            Some(ToggleOutcome::Removed(_)) => {
                self.set_message(format!("Bookmark removed at line {}", line), MessageLevel::Info)
            }
            None => self.set_message("No document is open", MessageLevel::Warning),
        }
    }

    pub fn next_bookmark(&mut self) {
        if self.session.jump_next().is_none() {
            self.set_message("No bookmarks in this document", MessageLevel::Info);
        }
    }

    pub fn previous_bookmark(&mut self) {
        if self.session.jump_previous().is_none() {
            self.set_message("No bookmarks in this document", MessageLevel::Info);
        }
    }

    pub fn clear_bookmarks(&mut self) {
        let count = self.session.clear_current_document();
        self.set_message(
            format!("Cleared {} bookmark(s)", count),
            MessageLevel::Info,
        );
    }

    /// Opens the label prompt for the bookmark on the cursor line.
    pub fn start_rename_at_cursor(&mut self) {
        let Some(key) = self.session.active_document().map(str::to_string) else {
            return;
        };
        let line = self.cursor_line();
        self.start_rename(&key, line);
    }

    /// Opens the label prompt for the selected panel row.
    pub fn start_rename_selected(&mut self) {
        if let Some(row) = self.panel.selected_row().cloned() {
            self.start_rename(&row.document_key, row.line_index);
        }
    }

    fn start_rename(&mut self, document_key: &str, line_index: usize) {
        let Some(label) = self
            .session
            .registry()
            .get(document_key, line_index)
            .map(|r| r.label.clone())
        else {
            self.set_message("No bookmark on this line", MessageLevel::Warning);
            return;
        };
        self.open_prompt(
            PromptKind::RenameLabel {
                document_key: document_key.to_string(),
                line_index,
            },
            &label,
        );
    }

    // Panel commands

    pub fn toggle_panel(&mut self) {
        if !self.panel.toggle_visible() && self.mode == AppMode::Panel {
            self.mode = AppMode::Normal;
        }
    }

    pub fn focus_panel(&mut self) {
        self.panel.set_visible(true);
        self.refresh_panel();
        let key = self.session.active_document().map(str::to_string);
        if let Some(key) = key {
            let line = self.cursor_line();
            self.panel.select_bookmark(&key, line);
        }
        self.mode = AppMode::Panel;
    }

    pub fn leave_panel(&mut self) {
        self.mode = AppMode::Normal;
    }

    pub fn panel_select_next(&mut self) {
        self.panel.select_next();
    }

    pub fn panel_select_previous(&mut self) {
        self.panel.select_previous();
    }

    pub fn panel_toggle_filter(&mut self) {
        let filter = self.panel.toggle_filter();
        self.refresh_panel();
        let text = match filter {
            ViewFilter::CurrentDocument => "Showing bookmarks of this document",
            ViewFilter::AllDocuments => "Showing bookmarks of all documents",
        };
        self.set_message(text, MessageLevel::Info);
    }

    /// Jumps to the selected row's line and returns focus to the text.
    pub fn panel_activate(&mut self) {
        let Some(row) = self.panel.selected_row().cloned() else {
            return;
        };
        if self.session.jump_to(&row.document_key, row.line_index) {
            self.mode = AppMode::Normal;
        } else {
            self.set_message(
                format!("Bookmark is in {}", row.file_name),
                MessageLevel::Warning,
            );
        }
    }

    pub fn panel_delete(&mut self) {
        let Some(row) = self.panel.selected_row().cloned() else {
            return;
        };
        if self.session.remove_at(&row.document_key, row.line_index) {
            self.refresh_panel();
            self.set_message(
                format!("Bookmark removed at line {}", row.line_number),
                MessageLevel::Info,
            );
        }
    }

    // Editing commands

    pub fn open_line_below(&mut self) {
        let at = self.cursor_line() + 1;
        self.insert_line_at(at);
    }

    pub fn open_line_above(&mut self) {
        let at = self.cursor_line();
        self.insert_line_at(at);
    }

    fn insert_line_at(&mut self, at: usize) {
        let range = self
            .session
            .host_mut()
            .active_mut()
            .map(|doc| doc.buffer.insert_line(at, ""));
        if let Some(range) = range {
            self.session.host_mut().set_cursor_line(at);
            self.buffer_changed(range);
        }
    }

    pub fn delete_line(&mut self) {
        let at = self.cursor_line();
        let range = self
            .session
            .host_mut()
            .active_mut()
            .and_then(|doc| doc.buffer.delete_line(at));
        if let Some(range) = range {
            self.buffer_changed(range);
        }
    }

    pub fn start_edit_line(&mut self) {
        let line = self.cursor_line();
        let Some(text) = self.session.host().line_text(line) else {
            return;
        };
        self.open_prompt(PromptKind::EditLine { line_index: line }, &text);
    }

    fn buffer_changed(&mut self, range: EditedRange) {
        let removed_before = self.session.registry().len();
        self.session.handle_event(HostEvent::BufferChanged(range));
        let removed = removed_before.saturating_sub(self.session.registry().len());
        if removed > 0 {
            self.set_message(
                format!("{} bookmark(s) removed with deleted lines", removed),
                MessageLevel::Info,
            );
        }
    }

    // Documents

    pub fn switch_document(&mut self, forward: bool) {
        if self.session.host_mut().cycle(forward) {
            self.scroll_offset = 0;
            self.session.handle_event(HostEvent::ActiveDocumentChanged);
            if let Some(name) = self.session.host().current_document_display_name() {
                self.set_message(name, MessageLevel::Info);
            }
        }
    }

    pub fn save(&mut self) {
        let create_backup = self.create_backup;
        match self.session.host_mut().save_active(create_backup) {
            Ok(path) => {
                self.session.handle_event(HostEvent::DocumentSaved);
                self.set_message(format!("Saved {}", path.display()), MessageLevel::Info);
            }
            Err(e) => {
                tracing::warn!(error = %e, "save failed");
                self.set_message(format!("Save failed: {}", e), MessageLevel::Error);
            }
        }
    }

    // Prompt

    fn open_prompt(&mut self, kind: PromptKind, initial: &str) {
        self.prompt = Some(Prompt::new(kind, initial));
        self.prompt_return = self.mode;
        self.mode = AppMode::Prompt;
    }

    pub fn prompt_insert(&mut self, c: char) {
        if let Some(prompt) = self.prompt.as_mut() {
            let offset = prompt.byte_offset();
            prompt.buffer.insert(offset, c);
            prompt.cursor += 1;
        }
    }

    pub fn prompt_backspace(&mut self) {
        if let Some(prompt) = self.prompt.as_mut() {
            if prompt.cursor > 0 {
                prompt.cursor -= 1;
                let offset = prompt.byte_offset();
                prompt.buffer.remove(offset);
            }
        }
    }

    pub fn prompt_left(&mut self) {
        if let Some(prompt) = self.prompt.as_mut() {
            prompt.cursor = prompt.cursor.saturating_sub(1);
        }
    }

    pub fn prompt_right(&mut self) {
        if let Some(prompt) = self.prompt.as_mut() {
            prompt.cursor = (prompt.cursor + 1).min(prompt.buffer.chars().count());
        }
    }

    pub fn prompt_cancel(&mut self) {
        self.close_prompt();
    }

    pub fn prompt_submit(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        match prompt.kind {
            PromptKind::RenameLabel {
                ref document_key,
                line_index,
            } => {
                if self
                    .session
                    .rename_label(document_key, line_index, &prompt.buffer)
                {
                    self.set_message("Label saved", MessageLevel::Info);
                }
            }
            PromptKind::EditLine { line_index } => {
                let range = self
                    .session
                    .host_mut()
                    .active_mut()
                    .and_then(|doc| doc.buffer.set_line_text(line_index, &prompt.buffer));
                if let Some(range) = range {
                    self.buffer_changed(range);
                }
            }
        }
        self.close_prompt();
    }

    fn close_prompt(&mut self) {
        self.prompt = None;
        self.mode = if self.prompt_return == AppMode::Panel && self.panel.is_visible() {
            AppMode::Panel
        } else {
            AppMode::Normal
        };
    }

    /// Persists bookmarks and releases the session.
    pub fn shutdown(self) {
        self.session.shutdown();
    }
}
