//! UI module for the markquill terminal interface.
//!
//! The screen is split top to bottom into the text view, the bookmarks panel
//! (when visible), the status line, and the message area. The message area
//! shows the prompt while one is open.

pub mod bookmarks_panel;
pub mod edit_prompt;
pub mod message_area;
pub mod status_line;
pub mod text_view;

use anyhow::Result;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Terminal;

use crate::app::mode::AppMode;
use crate::app::state::AppState;
use crate::host::KeyValueStore;
use crate::theme::Theme;

/// Main UI structure that manages the terminal interface rendering.
///
/// # Example
///
/// ```
/// use markquill::ui::UI;
/// use markquill::theme::get_builtin_theme;
///
/// let ui = UI::new(get_builtin_theme("default-dark").unwrap());
/// assert_eq!(ui.theme_name(), "default-dark");
/// ```
pub struct UI {
    theme: Theme,
}

impl UI {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Returns the current theme name.
    pub fn theme_name(&self) -> &str {
        &self.theme.name
    }

    /// Draws one frame.
    ///
    /// Refreshes the panel rows and scroll position first, so state changed
    /// since the last frame is what ends up on screen. Returns the height of
    /// the text view, which callers use as the page size.
    pub fn render<B: Backend, S: KeyValueStore>(
        &self,
        terminal: &mut Terminal<B>,
        state: &mut AppState<S>,
    ) -> Result<usize> {
        state.refresh_panel();
        let colors = &self.theme.colors;
        let mut viewport_height = 0;

        terminal.draw(|f| {
            let panel_height = if state.panel().is_visible() {
                state.panel_height() + 3 // borders and header
            } else {
                0
            };
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(1),               // Text view
                    Constraint::Length(panel_height), // Bookmarks panel
                    Constraint::Length(1),            // Status line
                    Constraint::Length(1),            // Message area
                ])
                .split(f.area());

            viewport_height = chunks[0].height as usize;
            state.adjust_scroll_to_cursor(viewport_height);

            if let Some(doc) = state.workspace().active() {
                text_view::render_text_view(
                    f,
                    chunks[0],
                    &doc.buffer,
                    state.cursor_line(),
                    state.scroll_offset(),
                    state.show_line_numbers(),
                    colors,
                );
            }

            if state.panel().is_visible() {
                bookmarks_panel::render_bookmarks_panel(
                    f,
                    chunks[1],
                    state.panel(),
                    state.mode() == AppMode::Panel,
                    colors,
                );
            }

            status_line::render_status_line(f, chunks[2], state, colors);

            match state.prompt() {
                Some(prompt) => edit_prompt::render_edit_prompt(f, chunks[3], prompt, colors),
                None => message_area::render_message_area(f, chunks[3], state.message(), colors),
            }
        })?;

        Ok(viewport_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::workspace::Workspace;
    use crate::session::RegistrySession;
    use crate::storage::MemoryStore;
    use crate::theme::get_builtin_theme;
    use ratatui::backend::TestBackend;

    fn state_with(text: &str) -> AppState<MemoryStore> {
        let mut workspace = Workspace::new();
        workspace.open_text("A", "a.txt", text);
        let config = Config::default();
        let session =
            RegistrySession::new(workspace, MemoryStore::new(), config.session_options());
        AppState::new(session, &config)
    }

    #[test]
    fn test_render_executes() {
        let ui = UI::new(get_builtin_theme("default-dark").unwrap());
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut state = state_with("one\ntwo");

        let height = ui.render(&mut terminal, &mut state).unwrap();
        assert_eq!(height, 22);
    }

    #[test]
    fn test_render_with_panel_shrinks_text_view() {
        let ui = UI::new(get_builtin_theme("default-light").unwrap());
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut state = state_with("one\ntwo\nthree");
        state.toggle_bookmark();
        state.toggle_panel();

        let height = ui.render(&mut terminal, &mut state).unwrap();
        assert_eq!(height, 22 - (state.panel_height() as usize + 3));
        assert_eq!(state.panel().rows().len(), 1);
    }
}
