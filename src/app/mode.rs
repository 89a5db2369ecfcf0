//! Application mode management.
//!
//! The terminal host is modal: keys mean different things while moving
//! around the text, while browsing the bookmarks panel, and while typing into
//! a prompt.
//!
//! # Example
//!
//! ```
//! use markquill::app::mode::AppMode;
//!
//! let mode = AppMode::default();
//! assert_eq!(mode, AppMode::Normal);
//! assert_eq!(format!("{}", AppMode::Panel), "PANEL");
//! ```

use std::fmt;

/// Current input mode of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Moving through the displayed document and editing lines.
    #[default]
    Normal,
    /// Keyboard focus is on the bookmarks panel.
    Panel,
    /// Typing into the prompt line.
    Prompt,
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppMode::Normal => "NORMAL",
            AppMode::Panel => "PANEL",
            AppMode::Prompt => "PROMPT",
        };
        write!(f, "{}", name)
    }
}
