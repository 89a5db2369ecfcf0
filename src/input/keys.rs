//! Keyboard event mapping and input event types.

use crate::app::mode::AppMode;
use termion::event::{Event, Key};

/// High-level input events abstracted from raw keyboard input.
///
/// These events represent user intentions (toggle a bookmark, jump, move the
/// cursor) rather than specific key presses, so each mode can bind keys
/// differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Quit the application
    Quit,
    /// Move cursor down
    MoveDown,
    /// Move cursor up
    MoveUp,
    /// Move cursor to the first line
    JumpToTop,
    /// Move cursor to the last line
    JumpToBottom,
    /// Move cursor down a page
    PageDown,
    /// Move cursor up a page
    PageUp,
    /// Add or remove the bookmark on the cursor line
    ToggleBookmark,
    /// Jump to the next bookmark, wrapping around
    NextBookmark,
    /// Jump to the previous bookmark, wrapping around
    PreviousBookmark,
    /// Remove all bookmarks of the displayed document
    ClearBookmarks,
    /// Show or hide the bookmarks panel
    TogglePanel,
    /// Move keyboard focus to the bookmarks panel
    FocusPanel,
    /// Return keyboard focus to the text
    LeavePanel,
    /// Edit the label of a bookmark
    RenameLabel,
    /// Insert an empty line below the cursor
    OpenLineBelow,
    /// Insert an empty line above the cursor
    OpenLineAbove,
    /// Delete the cursor line
    DeleteLine,
    /// Replace the text of the cursor line
    EditLine,
    /// Display the next open document
    NextDocument,
    /// Display the previous open document
    PreviousDocument,
    /// Write the displayed document to disk
    Save,
    /// Select the next panel row
    SelectNext,
    /// Select the previous panel row
    SelectPrevious,
    /// Jump to the selected panel row
    Activate,
    /// Remove the selected panel row's bookmark
    RemoveSelected,
    /// Switch the panel between this document and all documents
    ToggleViewAll,
    /// Type a character into the prompt
    PromptChar(char),
    /// Delete the character before the prompt cursor
    PromptBackspace,
    /// Move the prompt cursor left
    PromptLeft,
    /// Move the prompt cursor right
    PromptRight,
    /// Accept the prompt
    PromptSubmit,
    /// Dismiss the prompt
    PromptCancel,
    /// Unknown or unmapped key
    Unknown,
}

/// Maps a termion Event to an InputEvent based on the current mode.
///
/// # Example
///
/// ```
/// use termion::event::{Event, Key};
/// use markquill::app::mode::AppMode;
/// use markquill::input::keys::{map_key_event, InputEvent};
///
/// let event = Event::Key(Key::Char('m'));
/// assert_eq!(map_key_event(event, AppMode::Normal), InputEvent::ToggleBookmark);
/// ```
pub fn map_key_event(event: Event, mode: AppMode) -> InputEvent {
    let key = match event {
        Event::Key(k) => k,
        _ => return InputEvent::Unknown,
    };

    match mode {
        AppMode::Normal => match key {
            Key::Char('q') => InputEvent::Quit,
            Key::Char('j') | Key::Down => InputEvent::MoveDown,
            Key::Char('k') | Key::Up => InputEvent::MoveUp,
            Key::Char('g') | Key::Home => InputEvent::JumpToTop,
            Key::Char('G') | Key::End => InputEvent::JumpToBottom,
            Key::PageDown | Key::Ctrl('f') => InputEvent::PageDown,
            Key::PageUp | Key::Ctrl('b') => InputEvent::PageUp,
            Key::Char('m') | Key::F(2) => InputEvent::ToggleBookmark,
            Key::Char(']') | Key::F(4) => InputEvent::NextBookmark,
            Key::Char('[') | Key::F(3) => InputEvent::PreviousBookmark,
            Key::Char('M') => InputEvent::ClearBookmarks,
            Key::Char('b') => InputEvent::TogglePanel,
            Key::Char('p') => InputEvent::FocusPanel,
            Key::Char('r') => InputEvent::RenameLabel,
            Key::Char('o') => InputEvent::OpenLineBelow,
            Key::Char('O') => InputEvent::OpenLineAbove,
            Key::Char('d') => InputEvent::DeleteLine,
            Key::Char('e') => InputEvent::EditLine,
            Key::Char('\t') => InputEvent::NextDocument,
            Key::BackTab => InputEvent::PreviousDocument,
            Key::Char('w') => InputEvent::Save,
            _ => InputEvent::Unknown,
        },
        AppMode::Panel => match key {
            Key::Char('q') => InputEvent::Quit,
            Key::Char('j') | Key::Down => InputEvent::SelectNext,
            Key::Char('k') | Key::Up => InputEvent::SelectPrevious,
            Key::Char('\n') => InputEvent::Activate,
            Key::Char('x') | Key::Delete => InputEvent::RemoveSelected,
            Key::Char('r') => InputEvent::RenameLabel,
            Key::Char('a') => InputEvent::ToggleViewAll,
            Key::Char('b') => InputEvent::TogglePanel,
            Key::Esc | Key::Char('p') => InputEvent::LeavePanel,
            _ => InputEvent::Unknown,
        },
        AppMode::Prompt => match key {
            Key::Esc => InputEvent::PromptCancel,
            Key::Char('\n') => InputEvent::PromptSubmit,
            Key::Backspace => InputEvent::PromptBackspace,
            Key::Left => InputEvent::PromptLeft,
            Key::Right => InputEvent::PromptRight,
            Key::Char(c) => InputEvent::PromptChar(c),
            _ => InputEvent::Unknown,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: Key, mode: AppMode) -> InputEvent {
        map_key_event(Event::Key(k), mode)
    }

    #[test]
    fn test_normal_mode_quit() {
        assert_eq!(key(Key::Char('q'), AppMode::Normal), InputEvent::Quit);
    }

    #[test]
    fn test_bookmark_function_keys() {
        assert_eq!(key(Key::F(2), AppMode::Normal), InputEvent::ToggleBookmark);
        assert_eq!(key(Key::F(3), AppMode::Normal), InputEvent::PreviousBookmark);
        assert_eq!(key(Key::F(4), AppMode::Normal), InputEvent::NextBookmark);
    }

    #[test]
    fn test_panel_mode_keys() {
        assert_eq!(key(Key::Char('\n'), AppMode::Panel), InputEvent::Activate);
        assert_eq!(key(Key::Delete, AppMode::Panel), InputEvent::RemoveSelected);
        assert_eq!(key(Key::Esc, AppMode::Panel), InputEvent::LeavePanel);
        // Toggling is a normal-mode key only.
        assert_eq!(key(Key::Char('m'), AppMode::Panel), InputEvent::Unknown);
    }

    #[test]
    fn test_prompt_mode_takes_every_char() {
        assert_eq!(key(Key::Char('q'), AppMode::Prompt), InputEvent::PromptChar('q'));
        assert_eq!(key(Key::Esc, AppMode::Prompt), InputEvent::PromptCancel);
    }

    #[test]
    fn test_non_key_events_are_unknown() {
        let event = Event::Unsupported(vec![0x1b]);
        assert_eq!(map_key_event(event, AppMode::Normal), InputEvent::Unknown);
    }
}
