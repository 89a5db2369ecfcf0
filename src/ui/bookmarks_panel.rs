//! Bookmarks panel: a table of bookmarks with line, label and text.

use crate::panel::{PanelPresenter, ViewFilter};
use crate::theme::colors::ThemeColors;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

/// Renders the panel rows.
///
/// The selection is only highlighted while the panel has keyboard focus.
/// Rows of documents other than the displayed one are dimmed.
pub fn render_bookmarks_panel(
    f: &mut Frame,
    area: Rect,
    panel: &PanelPresenter,
    focused: bool,
    colors: &ThemeColors,
) {
    let scope = match panel.filter() {
        ViewFilter::CurrentDocument => "this document",
        ViewFilter::AllDocuments => "all documents",
    };
    let title = format!(" Bookmarks ({}) - {} ", panel.rows().len(), scope);

    let header = Row::new(vec!["File", "Line", "Label", "Text"]).style(
        Style::default()
            .fg(colors.panel_border)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = panel
        .rows()
        .iter()
        .map(|row| {
            let base = if row.active {
                Style::default().fg(colors.foreground)
            } else {
                Style::default().fg(colors.inactive_row)
            };
            let label_style = if row.active {
                Style::default().fg(colors.label)
            } else {
                base
            };
            Row::new(vec![
                Cell::from(row.file_name.as_str()),
                Cell::from(row.line_number.to_string()),
                Cell::from(Span::styled(row.label.as_str(), label_style)),
                Cell::from(row.text.trim()),
            ])
            .style(base)
        })
        .collect();

    let widths = [
        Constraint::Length(16),
        Constraint::Length(6),
        Constraint::Length(16),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.panel_border))
                .title(title),
        )
        .style(Style::default().bg(colors.background))
        .row_highlight_style(
            Style::default()
                .bg(colors.selected_row_bg)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = TableState::default();
    if focused && !panel.rows().is_empty() {
        state.select(Some(panel.selected_index()));
    }

    f.render_stateful_widget(table, area, &mut state);
}
