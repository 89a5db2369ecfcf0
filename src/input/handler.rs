//! Input event handler for polling and processing keyboard events.

use super::keys::{map_key_event, InputEvent};
use crate::app::state::AppState;
use crate::host::KeyValueStore;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Stdin};
use termion::event::Event;
use termion::input::{Events, TermRead};

/// Event source for reading terminal events.
///
/// Holds the events iterator so its position survives between calls and
/// pasted input is not lost.
enum EventSource {
    /// Reading from stdin
    Stdin(Events<Stdin>),
    /// Reading from /dev/tty (when stdin was piped)
    Tty(Events<File>),
}

/// Handles terminal input events and updates application state.
pub struct InputHandler {
    events: EventSource,
    /// Lines moved by PageUp/PageDown.
    page_size: usize,
}

impl InputHandler {
    /// Creates a new InputHandler that reads from stdin.
    pub fn new() -> Self {
        Self {
            events: EventSource::Stdin(io::stdin().events()),
            page_size: 20,
        }
    }

    /// Creates a new InputHandler that reads from /dev/tty.
    /// Use this when stdin is not a terminal.
    pub fn new_with_tty() -> Result<Self> {
        let tty_file = File::options()
            .read(true)
            .write(true)
            .open("/dev/tty")
            .context("Failed to open /dev/tty for keyboard input")?;

        Ok(Self {
            events: EventSource::Tty(tty_file.events()),
            page_size: 20,
        })
    }

    pub fn set_page_size(&mut self, lines: usize) {
        self.page_size = lines.max(1);
    }

    /// Blocks until the next terminal event. Returns `None` at end of input.
    pub fn next_event(&mut self) -> Result<Option<Event>> {
        let next = match &mut self.events {
            EventSource::Stdin(events) => events.next(),
            EventSource::Tty(events) => events.next(),
        };
        match next {
            Some(event) => Ok(Some(event?)),
            None => Ok(None),
        }
    }

    /// Handles a terminal event and updates application state.
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Example
    ///
    /// ```
    /// use markquill::app::state::AppState;
    /// use markquill::config::Config;
    /// use markquill::document::workspace::Workspace;
    /// use markquill::input::InputHandler;
    /// use markquill::session::RegistrySession;
    /// use markquill::storage::MemoryStore;
    /// use termion::event::{Event, Key};
    ///
    /// let mut workspace = Workspace::new();
    /// workspace.open_text("A", "a.txt", "one\ntwo");
    /// let config = Config::default();
    /// let session = RegistrySession::new(workspace, MemoryStore::new(), config.session_options());
    /// let mut state = AppState::new(session, &config);
    ///
    /// let mut handler = InputHandler::new();
    /// handler.handle_event(Event::Key(Key::Char('m')), &mut state);
    /// assert!(state.session().registry().contains("A", 0));
    /// assert!(handler.handle_event(Event::Key(Key::Char('q')), &mut state));
    /// ```
    pub fn handle_event<S: KeyValueStore>(&mut self, event: Event, state: &mut AppState<S>) -> bool {
        let input = map_key_event(event, state.mode());

        // Any key press dismisses the previous message.
        if input != InputEvent::Unknown {
            state.clear_message();
        }

        let page = self.page_size as isize;
        match input {
            InputEvent::Quit => return true,
            InputEvent::MoveDown => state.move_cursor(1),
            InputEvent::MoveUp => state.move_cursor(-1),
            InputEvent::JumpToTop => state.cursor_to_top(),
            InputEvent::JumpToBottom => state.cursor_to_bottom(),
            InputEvent::PageDown => state.move_cursor(page),
            InputEvent::PageUp => state.move_cursor(-page),
            InputEvent::ToggleBookmark => state.toggle_bookmark(),
            InputEvent::NextBookmark => state.next_bookmark(),
            InputEvent::PreviousBookmark => state.previous_bookmark(),
            InputEvent::ClearBookmarks => state.clear_bookmarks(),
            InputEvent::TogglePanel => state.toggle_panel(),
            InputEvent::FocusPanel => state.focus_panel(),
            InputEvent::LeavePanel => state.leave_panel(),
            InputEvent::RenameLabel => {
                if state.mode() == crate::app::mode::AppMode::Panel {
                    state.start_rename_selected();
                } else {
                    state.start_rename_at_cursor();
                }
            }
            InputEvent::OpenLineBelow => state.open_line_below(),
            InputEvent::OpenLineAbove => state.open_line_above(),
            InputEvent::DeleteLine => state.delete_line(),
            InputEvent::EditLine => state.start_edit_line(),
            InputEvent::NextDocument => state.switch_document(true),
            InputEvent::PreviousDocument => state.switch_document(false),
            InputEvent::Save => state.save(),
            InputEvent::SelectNext => state.panel_select_next(),
            InputEvent::SelectPrevious => state.panel_select_previous(),
            InputEvent::Activate => state.panel_activate(),
            InputEvent::RemoveSelected => state.panel_delete(),
            InputEvent::ToggleViewAll => state.panel_toggle_filter(),
            InputEvent::PromptChar(c) => state.prompt_insert(c),
            InputEvent::PromptBackspace => state.prompt_backspace(),
            InputEvent::PromptLeft => state.prompt_left(),
            InputEvent::PromptRight => state.prompt_right(),
            InputEvent::PromptSubmit => state.prompt_submit(),
            InputEvent::PromptCancel => state.prompt_cancel(),
            InputEvent::Unknown => {}
        }

        false
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
