use blackboard::Mode;
use blackboard::core::action::{Action, Effect, update};
use blackboard::core::key::{Key, KeyInput, Modifiers};
use blackboard::core::state::{App, Surface};
use blackboard::core::storage::{self, FileStore, SnapshotContent};
use chrono::NaiveDate;

// ============================================================================
// Helper Functions
// ============================================================================

fn key_for(c: char) -> KeyInput {
    match c {
        '\n' => KeyInput::plain(Key::Enter),
        c => KeyInput::plain(Key::Char(c)),
    }
}

/// Feeds `text` through `update()` one keystroke at a time.
fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        update(app, Action::Key(key_for(c)));
    }
}

fn press(app: &mut App, input: KeyInput) -> Effect {
    update(app, Action::Key(input))
}

fn shift(key: Key) -> KeyInput {
    KeyInput::new(key, Modifiers::SHIFT)
}

fn export_markdown(app: &mut App) -> String {
    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    match update(app, Action::Export(date)) {
        Effect::WriteExport(export) => {
            assert_eq!(export.filename, "blackboard-2024-05-01.md");
            export.markdown
        }
        other => panic!("expected export, got {other:?}"),
    }
}

fn raw() -> App {
    App::new(Surface::from_snapshot(Mode::Raw, None))
}

fn blocks() -> App {
    App::new(Surface::from_snapshot(Mode::Blocks, None))
}

// ============================================================================
// Raw Mode
// ============================================================================

#[test]
fn test_raw_heading_and_todo_export() {
    let mut app = raw();
    type_text(&mut app, "/h2 Title\n/todo Task");
    assert_eq!(export_markdown(&mut app), "## Title\n\n☐ Task");
}

#[test]
fn test_raw_checklist_flow() {
    let mut app = raw();
    type_text(&mut app, "/todo buy milk\ncall mom");
    assert_eq!(
        app.surface.content(),
        SnapshotContent::Text("☐ buy milk\n☐ call mom".into())
    );

    assert_eq!(press(&mut app, KeyInput::ctrl(Key::Enter)), Effect::ScheduleSave);
    assert_eq!(
        app.surface.content(),
        SnapshotContent::Text("☐ buy milk\n☑ call mom".into())
    );
}

#[test]
fn test_raw_bold_chord_after_shift_selection() {
    let mut app = raw();
    type_text(&mut app, "make bold");
    for _ in 0..4 {
        press(&mut app, shift(Key::Left));
    }
    press(&mut app, KeyInput::ctrl(Key::Char('b')));
    assert_eq!(
        app.surface.content(),
        SnapshotContent::Text("make **bold**".into())
    );
}

#[test]
fn test_raw_menu_select_by_index() {
    let mut app = raw();
    type_text(&mut app, "/h");
    let menu = app.surface.menu();
    assert!(menu.is_open);
    assert_eq!(menu.items.len(), 3);
    assert_eq!(update(&mut app, Action::MenuSelect(1)), Effect::ScheduleSave);
    type_text(&mut app, "Sub");
    assert_eq!(export_markdown(&mut app), "## Sub");
}

// ============================================================================
// Block Mode
// ============================================================================

#[test]
fn test_blocks_heading_and_todo_export() {
    let mut app = blocks();
    type_text(&mut app, "/h2 Title\n/todo Task");
    assert_eq!(export_markdown(&mut app), "## Title\n\n- [ ] Task");
}

#[test]
fn test_blocks_nested_checklist_export() {
    let mut app = blocks();
    type_text(&mut app, "/todo parent\nchild");
    press(&mut app, KeyInput::plain(Key::Home));
    press(&mut app, KeyInput::plain(Key::Tab));
    assert_eq!(
        export_markdown(&mut app),
        "- [ ] parent\n  - [ ] child"
    );

    press(&mut app, KeyInput::ctrl(Key::Enter));
    assert_eq!(
        export_markdown(&mut app),
        "- [ ] parent\n  - [x] child"
    );
}

#[test]
fn test_blocks_bold_chord_after_shift_selection() {
    let mut app = blocks();
    type_text(&mut app, "hello world");
    for _ in 0..5 {
        press(&mut app, shift(Key::Left));
    }
    press(&mut app, KeyInput::ctrl(Key::Char('b')));
    assert_eq!(export_markdown(&mut app), "hello **world**");
}

#[test]
fn test_escape_keeps_text_literal() {
    let mut app = blocks();
    type_text(&mut app, "/to");
    press(&mut app, KeyInput::plain(Key::Escape));
    assert!(!app.surface.menu().is_open);
    assert_eq!(export_markdown(&mut app), "/to");
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_file_store_round_trip_across_modes() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(tmp.path()).unwrap();

    let mut app = blocks();
    type_text(&mut app, "/h1 Plan\n/todo ship it");
    let Effect::SaveNow(content) = update(&mut app, Action::Persist) else {
        panic!("dirty document should save");
    };
    storage::save(&mut store, content).unwrap();
    update(&mut app, Action::Saved);
    assert!(!app.dirty);

    // Reopen from disk in the same mode
    let reopened = Surface::from_snapshot(Mode::Blocks, storage::load(&store));
    assert_eq!(reopened.content(), app.surface.content());

    // And as raw text
    let as_raw = Surface::from_snapshot(Mode::Raw, storage::load(&store));
    assert_eq!(
        as_raw.content(),
        SnapshotContent::Text("# Plan\n\n☐ ship it".into())
    );
}

#[test]
fn test_raw_checklist_keeps_working_in_block_mode() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(tmp.path()).unwrap();
    storage::save(
        &mut store,
        SnapshotContent::Text("☐ buy milk\n  ☑ oat".into()),
    )
    .unwrap();

    let mut app = App::new(Surface::from_snapshot(Mode::Blocks, storage::load(&store)));
    assert_eq!(export_markdown(&mut app), "- [ ] buy milk\n  - [x] oat");

    // Focus starts at the end of the first block
    assert_eq!(press(&mut app, KeyInput::ctrl(Key::Enter)), Effect::ScheduleSave);
    type_text(&mut app, "\neggs");
    assert_eq!(
        export_markdown(&mut app),
        "- [x] buy milk\n  - [x] oat\n- [ ] eggs"
    );
}

#[test]
fn test_block_checklist_keeps_working_in_raw_mode() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(tmp.path()).unwrap();

    let mut blocks_app = blocks();
    type_text(&mut blocks_app, "/todo task");
    storage::save(&mut store, blocks_app.surface.content()).unwrap();

    let mut app = App::new(Surface::from_snapshot(Mode::Raw, storage::load(&store)));
    assert_eq!(app.surface.content(), SnapshotContent::Text("☐ task".into()));

    assert_eq!(press(&mut app, KeyInput::ctrl(Key::Enter)), Effect::ScheduleSave);
    type_text(&mut app, "\nnext");
    assert_eq!(
        app.surface.content(),
        SnapshotContent::Text("☑ task\n☐ next".into())
    );

    // And back again
    storage::save(&mut store, app.surface.content()).unwrap();
    let reopened = Surface::from_snapshot(Mode::Blocks, storage::load(&store));
    assert_eq!(
        reopened.export(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()).markdown,
        "- [x] task\n- [ ] next"
    );
}

#[test]
fn test_corrupt_store_opens_empty_document() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("blackboard-document.json"), "{not json").unwrap();
    let store = FileStore::new(tmp.path()).unwrap();
    assert!(storage::load(&store).is_none());
    let surface = Surface::from_snapshot(Mode::Raw, storage::load(&store));
    assert_eq!(surface.content(), SnapshotContent::Text(String::new()));
}
