//! Color definitions for markquill themes.
//!
//! This module defines the [`ThemeColors`] struct which contains all color
//! values used in the markquill terminal UI, grouped into text view, bookmark,
//! panel and semantic colors.

use ratatui::style::Color;

/// Defines all colors used in a markquill theme.
///
/// # Examples
///
/// ```
/// use markquill::theme::colors::ThemeColors;
/// use ratatui::style::Color;
///
/// let dark = ThemeColors::default_dark();
/// assert_eq!(dark.background, Color::Reset);
/// ```
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Text view
    /// Main background color for the editor.
    pub background: Color,
    /// Main foreground/text color for the editor.
    pub foreground: Color,
    /// Background of the line holding the cursor.
    pub cursor_line_bg: Color,
    /// Line number gutter text.
    pub line_number: Color,

    // Bookmarks
    /// Gutter marker on bookmarked lines.
    pub bookmark_marker: Color,
    /// Background of bookmarked lines.
    pub bookmark_line_bg: Color,
    /// Bookmark label text in the panel.
    pub label: Color,

    // Panel and status line
    /// Panel border and header text.
    pub panel_border: Color,
    /// Rows that belong to documents not on screen.
    pub inactive_row: Color,
    /// Background of the selected panel row.
    pub selected_row_bg: Color,
    /// Background color for the status line.
    pub status_line_bg: Color,
    /// Foreground/text color for the status line.
    pub status_line_fg: Color,

    // Semantic colors
    /// Color for error messages.
    pub error: Color,
    /// Color for warning messages.
    pub warning: Color,
    /// Color for informational messages.
    pub info: Color,
}

impl ThemeColors {
    /// Returns the default dark color scheme.
    ///
    /// Uses ANSI colors so the palette follows the terminal's own scheme.
    pub fn default_dark() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::Gray,
            cursor_line_bg: Color::Rgb(40, 44, 52),
            line_number: Color::DarkGray,

            bookmark_marker: Color::LightBlue,
            bookmark_line_bg: Color::Rgb(30, 50, 70),
            label: Color::Yellow,

            panel_border: Color::LightBlue,
            inactive_row: Color::DarkGray,
            selected_row_bg: Color::DarkGray,
            status_line_bg: Color::White, // White status bar like jless
            status_line_fg: Color::Black,

            error: Color::Red,
            warning: Color::Yellow,
            info: Color::LightBlue,
        }
    }

    /// Returns the default light color scheme.
    pub fn default_light() -> Self {
        Self {
            background: Color::Rgb(250, 250, 250),
            foreground: Color::Rgb(56, 58, 66),
            cursor_line_bg: Color::Rgb(235, 235, 235),
            line_number: Color::Rgb(160, 161, 167),

            bookmark_marker: Color::Rgb(1, 132, 188),
            bookmark_line_bg: Color::Rgb(220, 235, 250),
            label: Color::Rgb(152, 104, 1),

            panel_border: Color::Rgb(82, 139, 255),
            inactive_row: Color::Rgb(160, 161, 167),
            selected_row_bg: Color::Rgb(220, 220, 220),
            status_line_bg: Color::Rgb(238, 238, 238),
            status_line_fg: Color::Rgb(56, 58, 66),

            error: Color::Rgb(202, 18, 67),
            warning: Color::Rgb(152, 104, 1),
            info: Color::Rgb(1, 132, 188),
        }
    }

    /// Returns the Gruvbox dark color scheme.
    pub fn gruvbox_dark() -> Self {
        Self {
            background: Color::Rgb(40, 40, 40),
            foreground: Color::Rgb(235, 219, 178),
            cursor_line_bg: Color::Rgb(50, 48, 47),
            line_number: Color::Rgb(146, 131, 116),

            bookmark_marker: Color::Rgb(251, 184, 108), // orange
            bookmark_line_bg: Color::Rgb(60, 56, 54),
            label: Color::Rgb(250, 189, 47),

            panel_border: Color::Rgb(131, 165, 152), // aqua
            inactive_row: Color::Rgb(146, 131, 116),
            selected_row_bg: Color::Rgb(80, 73, 69),
            status_line_bg: Color::Rgb(60, 56, 54),
            status_line_fg: Color::Rgb(235, 219, 178),

            error: Color::Rgb(251, 73, 52),
            warning: Color::Rgb(250, 189, 47),
            info: Color::Rgb(131, 165, 152),
        }
    }

    /// Returns the Nord color scheme.
    pub fn nord() -> Self {
        Self {
            background: Color::Rgb(46, 52, 64),
            foreground: Color::Rgb(216, 222, 233),
            cursor_line_bg: Color::Rgb(59, 66, 82),
            line_number: Color::Rgb(76, 86, 106),

            bookmark_marker: Color::Rgb(136, 192, 208), // frost cyan
            bookmark_line_bg: Color::Rgb(67, 76, 94),
            label: Color::Rgb(235, 203, 139),

            panel_border: Color::Rgb(136, 192, 208),
            inactive_row: Color::Rgb(76, 86, 106),
            selected_row_bg: Color::Rgb(67, 76, 94),
            status_line_bg: Color::Rgb(59, 66, 82),
            status_line_fg: Color::Rgb(216, 222, 233),

            error: Color::Rgb(191, 97, 106),
            warning: Color::Rgb(235, 203, 139),
            info: Color::Rgb(136, 192, 208),
        }
    }
}
