//! Status line widget.
//!
//! The status line shows:
//! - Current mode (NORMAL, PANEL, PROMPT)
//! - Displayed document name and a dirty indicator "[+]"
//! - Bookmark count of the displayed document
//! - Cursor position (line/total)
//!
//! Example status line: `NORMAL | notes.md [+]  3 bookmarks        12/240`

use crate::app::state::AppState;
use crate::host::{DocumentIdentity, EditorBuffer, KeyValueStore};
use crate::theme::colors::ThemeColors;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render_status_line<S: KeyValueStore>(
    f: &mut Frame,
    area: Rect,
    state: &AppState<S>,
    colors: &ThemeColors,
) {
    let workspace = state.workspace();
    let name = workspace
        .current_document_display_name()
        .unwrap_or_else(|| "[No Name]".to_string());
    let dirty = workspace
        .active()
        .is_some_and(|doc| doc.buffer.is_dirty());
    let dirty_indicator = if dirty { " [+]" } else { "" };

    let count = state
        .session()
        .active_document()
        .map_or(0, |key| state.session().registry().list_for(key).len());
    let bookmark_info = match count {
        0 => String::new(),
        1 => "  1 bookmark".to_string(),
        n => format!("  {} bookmarks", n),
    };

    let documents = if workspace.len() > 1 {
        format!(
            "  [{}/{}]",
            workspace.active_index().map_or(0, |i| i + 1),
            workspace.len()
        )
    } else {
        String::new()
    };

    let left = format!(
        "{} | {}{}{}{}",
        state.mode(),
        name,
        dirty_indicator,
        documents,
        bookmark_info
    );
    let position = format!(
        "{}/{}",
        state.cursor_line() + 1,
        workspace.line_count().max(1)
    );

    let total_width = area.width as usize;
    let left_len = left.chars().count();
    let padding = if left_len + position.len() + 1 < total_width {
        total_width - left_len - position.len()
    } else {
        1
    };

    let style = Style::default()
        .fg(colors.status_line_fg)
        .bg(colors.status_line_bg);
    let line = Line::from(vec![
        Span::styled(left, style),
        Span::styled(" ".repeat(padding), style),
        Span::styled(position, style),
    ]);

    f.render_widget(Paragraph::new(line), area);
}
