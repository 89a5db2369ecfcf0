use markquill::document::workspace::Workspace;
use markquill::host::{EditorBuffer, HostEvent};
use markquill::panel::{PanelPresenter, ViewFilter};
use markquill::session::{RegistrySession, SessionOptions};
use markquill::storage::MemoryStore;

type Session = RegistrySession<Workspace, MemoryStore>;

fn two_documents() -> Session {
    let mut workspace = Workspace::new();
    workspace.open_text("/src/a.rs", "a.rs", "a0\na1\na2\na3");
    workspace.open_text("/src/b.rs", "b.rs", "b0\nb1\nb2");
    RegistrySession::new(workspace, MemoryStore::new(), SessionOptions::default())
}

fn toggle_at(session: &mut Session, line: usize) {
    session.host_mut().set_cursor_line(line);
    session.toggle_at_cursor();
}

fn refresh(panel: &mut PanelPresenter, session: &Session) {
    panel.refresh(session.registry(), session.active_document());
}

#[test]
fn test_listener_marks_rows_stale() {
    let mut session = two_documents();
    let mut panel = PanelPresenter::new();
    session.subscribe(panel.listener());
    refresh(&mut panel, &session);
    assert!(!panel.needs_refresh());

    toggle_at(&mut session, 2);
    assert!(panel.needs_refresh());

    refresh(&mut panel, &session);
    assert_eq!(panel.rows().len(), 1);
    let row = &panel.rows()[0];
    assert_eq!(row.line_index, 2);
    assert_eq!(row.line_number, 3);
    assert_eq!(row.file_name, "a.rs");
    assert_eq!(row.text, "a2");
    assert_eq!(row.label, "BOOKMARK");
    assert!(row.active);
}

#[test]
fn test_filter_switches_between_current_and_all() {
    let mut session = two_documents();
    toggle_at(&mut session, 1);
    session.host_mut().cycle(true);
    session.handle_event(HostEvent::ActiveDocumentChanged);
    toggle_at(&mut session, 0);

    let mut panel = PanelPresenter::new();
    refresh(&mut panel, &session);
    assert_eq!(panel.filter(), ViewFilter::CurrentDocument);
    assert_eq!(panel.rows().len(), 1);
    assert_eq!(panel.rows()[0].file_name, "b.rs");

    assert_eq!(panel.toggle_filter(), ViewFilter::AllDocuments);
    assert!(panel.needs_refresh());
    refresh(&mut panel, &session);
    let rows: Vec<(&str, bool)> = panel
        .rows()
        .iter()
        .map(|r| (r.file_name.as_str(), r.active))
        .collect();
    assert_eq!(rows, vec![("b.rs", true), ("a.rs", false)]);
}

#[test]
fn test_selection_clamps_without_wrapping() {
    let mut session = two_documents();
    for line in [0, 1, 3] {
        toggle_at(&mut session, line);
    }
    let mut panel = PanelPresenter::new();
    refresh(&mut panel, &session);

    panel.select_previous();
    assert_eq!(panel.selected_index(), 0);
    panel.select_next();
    panel.select_next();
    panel.select_next();
    assert_eq!(panel.selected_index(), 2);
    assert_eq!(panel.selected_row().unwrap().line_index, 3);

    // Removing rows pulls the selection back inside the list.
    session.remove_at("/src/a.rs", 3);
    session.remove_at("/src/a.rs", 1);
    refresh(&mut panel, &session);
    assert_eq!(panel.selected_index(), 0);
}

#[test]
fn test_select_bookmark() {
    let mut session = two_documents();
    toggle_at(&mut session, 0);
    toggle_at(&mut session, 2);
    let mut panel = PanelPresenter::new();
    refresh(&mut panel, &session);

    assert!(panel.select_bookmark("/src/a.rs", 2));
    assert_eq!(panel.selected_index(), 1);
    assert!(!panel.select_bookmark("/src/b.rs", 2));
    assert_eq!(panel.selected_index(), 1);
}

#[test]
fn test_empty_panel_has_no_selection() {
    let session = two_documents();
    let mut panel = PanelPresenter::new();
    refresh(&mut panel, &session);

    assert!(panel.rows().is_empty());
    assert!(panel.selected_row().is_none());
}

#[test]
fn test_visibility_toggle() {
    let mut panel = PanelPresenter::new();
    assert!(!panel.is_visible());
    assert!(panel.toggle_visible());
    assert!(!panel.toggle_visible());
}
