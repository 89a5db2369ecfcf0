use std::cell::RefCell;
use std::rc::Rc;

use markquill::bookmark::ToggleOutcome;
use markquill::document::workspace::Workspace;
use markquill::host::{EditorBuffer, HostEvent, KeyValueStore, BOOKMARK_LINE_STYLE};
use markquill::session::{ChangeCause, RegistrySession, SessionOptions};
use markquill::storage::{deserialize, BookmarkStore, MemoryStore, DEFAULT_STORAGE_KEY};

type Session = RegistrySession<Workspace, MemoryStore>;

fn session_with(documents: &[(&str, usize)]) -> Session {
    let mut workspace = Workspace::new();
    for (key, lines) in documents {
        let text = (0..*lines)
            .map(|i| format!("{} {}", key, i))
            .collect::<Vec<_>>()
            .join("\n");
        workspace.open_text(key, &format!("{}.txt", key), &text);
    }
    RegistrySession::new(workspace, MemoryStore::new(), SessionOptions::default())
}

fn toggle_at(session: &mut Session, line: usize) -> Option<ToggleOutcome> {
    session.host_mut().set_cursor_line(line);
    session.toggle_at_cursor()
}

fn stored(session: &Session) -> Vec<(String, usize, String)> {
    let data = session
        .storage()
        .store()
        .get(DEFAULT_STORAGE_KEY)
        .unwrap()
        .unwrap_or_else(|| "[]".to_string());
    deserialize(&data, "BOOKMARK")
        .unwrap()
        .into_iter()
        .map(|r| (r.document_key, r.line_index, r.label))
        .collect()
}

#[test]
fn test_first_toggle_is_persisted_immediately() {
    let mut session = session_with(&[("A", 10)]);

    let outcome = toggle_at(&mut session, 5);

    assert_eq!(outcome, Some(ToggleOutcome::Added));
    assert_eq!(
        stored(&session),
        vec![("A".to_string(), 5, "BOOKMARK".to_string())]
    );
    let buffer = &session.host().active().unwrap().buffer;
    assert!(buffer.is_decorated(5, BOOKMARK_LINE_STYLE));
}

#[test]
fn test_second_toggle_removes_and_persists() {
    let mut session = session_with(&[("A", 10)]);
    toggle_at(&mut session, 5);

    let outcome = toggle_at(&mut session, 5);

    assert!(matches!(outcome, Some(ToggleOutcome::Removed(_))));
    assert!(stored(&session).is_empty());
    let buffer = &session.host().active().unwrap().buffer;
    assert!(!buffer.is_decorated(5, BOOKMARK_LINE_STYLE));
}

#[test]
fn test_toggle_without_document_is_noop() {
    let mut session = RegistrySession::new(
        Workspace::new(),
        MemoryStore::new(),
        SessionOptions::default(),
    );
    assert_eq!(session.toggle_at_cursor(), None);
    assert_eq!(session.storage().store().writes(), 0);
}

#[test]
fn test_listener_sees_persisted_state() {
    let mut session = session_with(&[("A", 10)]);
    let seen = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&seen);
    session.subscribe(move |notice| {
        let lines: Vec<usize> = notice.active_bookmarks().iter().map(|r| r.line_index).collect();
        sink.borrow_mut().push((notice.cause, lines));
    });

    toggle_at(&mut session, 2);
    toggle_at(&mut session, 8);
    session.rename_label("A", 8, "end");

    let seen = seen.borrow();
    assert_eq!(
        *seen,
        vec![
            (ChangeCause::Toggled, vec![2]),
            (ChangeCause::Toggled, vec![2, 8]),
            (ChangeCause::Relabeled, vec![2, 8]),
        ]
    );
    assert_eq!(stored(&session)[1].2, "end");
}

#[test]
fn test_unsubscribe_stops_notifications() {
    let mut session = session_with(&[("A", 4)]);
    let count = Rc::new(RefCell::new(0));

    let sink = Rc::clone(&count);
    let id = session.subscribe(move |_| *sink.borrow_mut() += 1);
    toggle_at(&mut session, 0);
    assert!(session.unsubscribe(id));
    assert!(!session.unsubscribe(id));
    toggle_at(&mut session, 1);

    assert_eq!(*count.borrow(), 1);
}

#[test]
fn test_jump_wraps_in_both_directions() {
    let mut session = session_with(&[("A", 20)]);
    for line in [3, 7, 12] {
        toggle_at(&mut session, line);
    }

    session.host_mut().set_cursor_line(12);
    assert_eq!(session.jump_next(), Some(3));
    assert_eq!(session.host().cursor_line(), 3);

    assert_eq!(session.jump_previous(), Some(12));
    assert_eq!(session.host().cursor_line(), 12);

    session.host_mut().set_cursor_line(5);
    assert_eq!(session.jump_next(), Some(7));
}

#[test]
fn test_jump_without_bookmarks_leaves_cursor() {
    let mut session = session_with(&[("A", 20)]);
    session.host_mut().set_cursor_line(9);

    assert_eq!(session.jump_next(), None);
    assert_eq!(session.jump_previous(), None);
    assert_eq!(session.host().cursor_line(), 9);
}

#[test]
fn test_jump_to_only_targets_displayed_document() {
    let mut session = session_with(&[("A", 10), ("B", 10)]);
    toggle_at(&mut session, 4);

    session.host_mut().cycle(true);
    session.handle_event(HostEvent::ActiveDocumentChanged);

    assert!(!session.jump_to("A", 4));
    assert!(!session.jump_to("B", 4));
    toggle_at(&mut session, 6);
    session.host_mut().set_cursor_line(0);
    assert!(session.jump_to("B", 6));
    assert_eq!(session.host().cursor_line(), 6);
}

#[test]
fn test_clear_current_document_keeps_others() {
    let mut session = session_with(&[("A", 10), ("B", 10)]);
    toggle_at(&mut session, 1);
    toggle_at(&mut session, 2);

    session.host_mut().cycle(true);
    session.handle_event(HostEvent::ActiveDocumentChanged);
    toggle_at(&mut session, 3);

    assert_eq!(session.clear_current_document(), 1);
    assert_eq!(session.clear_current_document(), 0);
    let remaining: Vec<usize> = stored(&session).iter().map(|(_, line, _)| *line).collect();
    assert_eq!(remaining, vec![1, 2]);
}

#[test]
fn test_remove_at_releases_decoration() {
    let mut session = session_with(&[("A", 10)]);
    toggle_at(&mut session, 3);

    assert!(session.remove_at("A", 3));
    assert!(!session.remove_at("A", 3));
    let buffer = &session.host().active().unwrap().buffer;
    assert!(!buffer.is_decorated(3, BOOKMARK_LINE_STYLE));
    assert!(stored(&session).is_empty());
}

#[test]
fn test_new_session_restores_stored_bookmarks() {
    let mut first = session_with(&[("A", 10)]);
    toggle_at(&mut first, 4);
    first.rename_label("A", 4, "keep");
    let (workspace, store) = first.shutdown();

    let second = RegistrySession::new(workspace, store, SessionOptions::default());

    let snapshot = second.snapshot_for("A");
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].line_index, 4);
    assert_eq!(snapshot[0].label, "keep");
    assert!(snapshot[0].anchor.is_some());
}

#[test]
fn test_corrupt_storage_starts_empty() {
    let mut workspace = Workspace::new();
    workspace.open_text("A", "a.txt", "x\ny");
    let store = MemoryStore::with_entry(DEFAULT_STORAGE_KEY, "{\"version\": 99}");

    let mut session = RegistrySession::new(workspace, store, SessionOptions::default());
    assert!(session.registry().is_empty());

    // The next mutation overwrites the corrupt value.
    session.toggle_at_cursor();
    let store = BookmarkStore::new(session.storage().store().clone());
    assert_eq!(store.load().len(), 1);
}

#[test]
fn test_document_saved_only_notifies() {
    let mut session = session_with(&[("A", 3)]);
    toggle_at(&mut session, 1);
    let writes = session.storage().store().writes();
    let causes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&causes);
    session.subscribe(move |notice| sink.borrow_mut().push(notice.cause));

    assert!(!session.handle_event(HostEvent::DocumentSaved));

    assert_eq!(*causes.borrow(), vec![ChangeCause::DocumentSaved]);
    assert_eq!(session.storage().store().writes(), writes);
}

#[test]
fn test_custom_options() {
    let mut workspace = Workspace::new();
    workspace.open_text("A", "a.txt", "x");
    let options = SessionOptions {
        storage_key: "custom.key".to_string(),
        default_label: "NOTE".to_string(),
    };
    let mut session = RegistrySession::new(workspace, MemoryStore::new(), options);

    session.toggle_at_cursor();

    assert_eq!(session.snapshot_for("A")[0].label, "NOTE");
    assert!(session.storage().store().get("custom.key").unwrap().is_some());
    assert!(session
        .storage()
        .store()
        .get(DEFAULT_STORAGE_KEY)
        .unwrap()
        .is_none());
}
