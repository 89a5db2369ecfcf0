use crate::app::state::Prompt;
use crate::theme::colors::ThemeColors;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Renders the prompt title and its buffer with a block cursor.
pub fn render_edit_prompt(f: &mut Frame, area: Rect, prompt: &Prompt, colors: &ThemeColors) {
    let chars: Vec<char> = prompt.buffer.chars().collect();
    let cursor = prompt.cursor.min(chars.len());

    let before: String = chars[..cursor].iter().collect();
    let at_cursor = chars.get(cursor).copied().unwrap_or(' ');
    let after: String = chars.iter().skip(cursor + 1).collect();

    let text_style = Style::default()
        .fg(colors.foreground)
        .bg(colors.background)
        .add_modifier(Modifier::BOLD);

    let mut spans = vec![
        Span::styled(prompt.kind.title(), text_style),
        Span::styled(before, text_style),
        // Inverted colors give a block cursor.
        Span::styled(
            at_cursor.to_string(),
            Style::default()
                .fg(colors.background)
                .bg(colors.foreground),
        ),
    ];
    if !after.is_empty() {
        spans.push(Span::styled(after, text_style));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(colors.background));

    f.render_widget(paragraph, area);
}
