//! Text view rendering with a bookmark gutter.

use crate::document::buffer::TextBuffer;
use crate::host::BOOKMARK_LINE_STYLE;
use crate::theme::colors::ThemeColors;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Gutter glyph for bookmarked lines.
const MARKER: &str = "\u{25cf} ";

/// Renders the visible slice of `buffer`.
///
/// Lines carrying the bookmark decoration get a marker in the gutter and the
/// bookmark background. The cursor line background wins over it.
pub fn render_text_view(
    f: &mut Frame,
    area: Rect,
    buffer: &TextBuffer,
    cursor_line: usize,
    scroll_offset: usize,
    show_line_numbers: bool,
    colors: &ThemeColors,
) {
    let number_width = if show_line_numbers {
        buffer.len().to_string().len()
    } else {
        0
    };

    let lines: Vec<Line> = buffer
        .lines()
        .enumerate()
        .skip(scroll_offset)
        .take(area.height as usize)
        .map(|(index, text)| {
            let bookmarked = buffer.is_decorated(index, BOOKMARK_LINE_STYLE);
            let mut spans = Vec::new();

            if show_line_numbers {
                spans.push(Span::styled(
                    format!("{:>width$} ", index + 1, width = number_width),
                    Style::default()
                        .fg(colors.line_number)
                        .add_modifier(Modifier::DIM),
                ));
            }

            if bookmarked {
                spans.push(Span::styled(
                    MARKER,
                    Style::default()
                        .fg(colors.bookmark_marker)
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::raw("  "));
            }

            spans.push(Span::raw(text));

            let line_style = if index == cursor_line {
                Style::default().bg(colors.cursor_line_bg)
            } else if bookmarked {
                Style::default().bg(colors.bookmark_line_bg)
            } else {
                Style::default()
            };
            Line::from(spans).style(line_style)
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::NONE))
        .style(Style::default().bg(colors.background).fg(colors.foreground));

    f.render_widget(paragraph, area);
}
