//! Key presses through the input handler into the bookmark session.

use markquill::app::mode::AppMode;
use markquill::app::state::{AppState, MessageLevel};
use markquill::config::Config;
use markquill::document::workspace::Workspace;
use markquill::input::InputHandler;
use markquill::session::RegistrySession;
use markquill::storage::MemoryStore;
use termion::event::{Event, Key};

fn app(documents: &[(&str, &str)]) -> AppState<MemoryStore> {
    let mut workspace = Workspace::new();
    for (key, text) in documents {
        workspace.open_text(key, key, text);
    }
    let config = Config::default();
    let session = RegistrySession::new(workspace, MemoryStore::new(), config.session_options());
    AppState::new(session, &config)
}

fn press(handler: &mut InputHandler, state: &mut AppState<MemoryStore>, keys: &[Key]) -> bool {
    let mut quit = false;
    for key in keys {
        quit = handler.handle_event(Event::Key(key.clone()), state);
    }
    quit
}

fn bookmarked(state: &AppState<MemoryStore>, key: &str) -> Vec<usize> {
    state
        .session()
        .registry()
        .list_for(key)
        .iter()
        .map(|r| r.line_index)
        .collect()
}

const TEXT: &str = "zero\none\ntwo\nthree\nfour\nfive\nsix";

#[test]
fn test_toggle_and_navigate_with_keys() {
    let mut state = app(&[("A", TEXT)]);
    let mut handler = InputHandler::new();

    press(
        &mut handler,
        &mut state,
        &[Key::Char('j'), Key::F(2), Key::Char('j'), Key::Char('j'), Key::Char('m')],
    );
    assert_eq!(bookmarked(&state, "A"), vec![1, 3]);

    press(&mut handler, &mut state, &[Key::Char('G'), Key::Char(']')]);
    assert_eq!(state.cursor_line(), 1);
    press(&mut handler, &mut state, &[Key::F(3)]);
    assert_eq!(state.cursor_line(), 3);
    press(&mut handler, &mut state, &[Key::F(4)]);
    assert_eq!(state.cursor_line(), 1);
}

#[test]
fn test_jump_without_bookmarks_reports_message() {
    let mut state = app(&[("A", TEXT)]);
    let mut handler = InputHandler::new();

    press(&mut handler, &mut state, &[Key::Char(']')]);

    let message = state.message().unwrap();
    assert_eq!(message.level, MessageLevel::Info);
    assert_eq!(state.cursor_line(), 0);
}

#[test]
fn test_line_edits_move_bookmarks() {
    let mut state = app(&[("A", TEXT)]);
    let mut handler = InputHandler::new();

    // Bookmark line 4, then open a line above line 1.
    press(
        &mut handler,
        &mut state,
        &[Key::Char('j'), Key::Char('j'), Key::Char('j'), Key::Char('j'), Key::Char('m')],
    );
    press(&mut handler, &mut state, &[Key::Char('g'), Key::Char('j'), Key::Char('O')]);
    assert_eq!(bookmarked(&state, "A"), vec![5]);

    // Delete the bookmarked line itself.
    press(
        &mut handler,
        &mut state,
        &[Key::Char('G'), Key::Char('['), Key::Char('d')],
    );
    assert!(bookmarked(&state, "A").is_empty());
    assert!(state.message().unwrap().text.contains("removed"));
}

#[test]
fn test_edit_line_prompt_updates_snapshot() {
    let mut state = app(&[("A", "alpha\nbeta")]);
    let mut handler = InputHandler::new();

    press(&mut handler, &mut state, &[Key::Char('m'), Key::Char('e')]);
    assert_eq!(state.mode(), AppMode::Prompt);
    assert_eq!(state.prompt().unwrap().buffer, "alpha");

    press(
        &mut handler,
        &mut state,
        &[Key::Backspace, Key::Backspace, Key::Char('!'), Key::Char('\n')],
    );

    assert_eq!(state.mode(), AppMode::Normal);
    let record = state.session().registry().get("A", 0).unwrap();
    assert_eq!(record.line_text, "alp!");
}

#[test]
fn test_rename_label_from_cursor() {
    let mut state = app(&[("A", TEXT)]);
    let mut handler = InputHandler::new();

    press(&mut handler, &mut state, &[Key::Char('m'), Key::Char('r')]);
    assert_eq!(state.prompt().unwrap().buffer, "BOOKMARK");

    let mut keys = vec![Key::Backspace; 8];
    keys.extend("intro".chars().map(Key::Char));
    keys.push(Key::Char('\n'));
    press(&mut handler, &mut state, &keys);

    assert_eq!(state.session().registry().get("A", 0).unwrap().label, "intro");
}

#[test]
fn test_rename_cancel_keeps_label() {
    let mut state = app(&[("A", TEXT)]);
    let mut handler = InputHandler::new();

    press(
        &mut handler,
        &mut state,
        &[Key::Char('m'), Key::Char('r'), Key::Char('x'), Key::Esc],
    );

    assert_eq!(state.mode(), AppMode::Normal);
    assert_eq!(
        state.session().registry().get("A", 0).unwrap().label,
        "BOOKMARK"
    );
}

#[test]
fn test_rename_without_bookmark_warns() {
    let mut state = app(&[("A", TEXT)]);
    let mut handler = InputHandler::new();

    press(&mut handler, &mut state, &[Key::Char('r')]);

    assert_eq!(state.mode(), AppMode::Normal);
    assert_eq!(state.message().unwrap().level, MessageLevel::Warning);
}

#[test]
fn test_panel_jump_and_delete() {
    let mut state = app(&[("A", TEXT)]);
    let mut handler = InputHandler::new();
    press(
        &mut handler,
        &mut state,
        &[Key::Char('j'), Key::Char('m'), Key::Char('G'), Key::Char('m')],
    );

    press(&mut handler, &mut state, &[Key::Char('p')]);
    assert_eq!(state.mode(), AppMode::Panel);
    assert!(state.panel().is_visible());
    // Focus selects the bookmark under the cursor.
    assert_eq!(state.panel().selected_row().unwrap().line_index, 6);

    press(&mut handler, &mut state, &[Key::Char('k'), Key::Char('\n')]);
    assert_eq!(state.mode(), AppMode::Normal);
    assert_eq!(state.cursor_line(), 1);

    press(&mut handler, &mut state, &[Key::Char('p'), Key::Char('x')]);
    assert_eq!(bookmarked(&state, "A"), vec![6]);
    assert_eq!(state.panel().rows().len(), 1);
}

#[test]
fn test_panel_rows_of_other_documents_are_inactive() {
    let mut state = app(&[("A", TEXT), ("B", TEXT)]);
    let mut handler = InputHandler::new();
    press(&mut handler, &mut state, &[Key::Char('m'), Key::Char('\t')]);
    assert_eq!(state.session().active_document(), Some("B"));

    press(&mut handler, &mut state, &[Key::Char('G'), Key::Char('p'), Key::Char('a')]);
    state.refresh_panel();
    assert_eq!(state.panel().rows().len(), 1);
    assert!(!state.panel().rows()[0].active);

    // Activating an inactive row does not move the cursor.
    press(&mut handler, &mut state, &[Key::Char('\n')]);
    assert_eq!(state.mode(), AppMode::Panel);
    assert_eq!(state.cursor_line(), 6);
    assert_eq!(state.message().unwrap().level, MessageLevel::Warning);
}

#[test]
fn test_panel_rename_returns_to_panel() {
    let mut state = app(&[("A", TEXT)]);
    let mut handler = InputHandler::new();

    press(
        &mut handler,
        &mut state,
        &[Key::Char('m'), Key::Char('p'), Key::Char('r'), Key::Char('!'), Key::Char('\n')],
    );

    assert_eq!(state.mode(), AppMode::Panel);
    assert_eq!(
        state.session().registry().get("A", 0).unwrap().label,
        "BOOKMARK!"
    );
}

#[test]
fn test_clear_bookmarks_key() {
    let mut state = app(&[("A", TEXT)]);
    let mut handler = InputHandler::new();
    press(
        &mut handler,
        &mut state,
        &[Key::Char('m'), Key::Char('j'), Key::Char('m'), Key::Char('M')],
    );

    assert!(bookmarked(&state, "A").is_empty());
    assert!(state.message().unwrap().text.contains('2'));
}

#[test]
fn test_save_without_file_reports_error() {
    let mut state = app(&[("A", TEXT)]);
    let mut handler = InputHandler::new();

    press(&mut handler, &mut state, &[Key::Char('w')]);

    assert_eq!(state.message().unwrap().level, MessageLevel::Error);
}

#[test]
fn test_quit_key() {
    let mut state = app(&[("A", TEXT)]);
    let mut handler = InputHandler::new();

    assert!(!press(&mut handler, &mut state, &[Key::Char('j')]));
    assert!(press(&mut handler, &mut state, &[Key::Char('q')]));
}

#[test]
fn test_prompt_swallows_quit_key() {
    let mut state = app(&[("A", TEXT)]);
    let mut handler = InputHandler::new();

    assert!(!press(&mut handler, &mut state, &[Key::Char('e'), Key::Char('q')]));
    assert_eq!(state.prompt().unwrap().buffer, "zeroq");
}
