//! # Actions
//!
//! Everything that can happen in Blackboard becomes an `Action`.
//! User presses a key? That's `Action::Key(input)`.
//! The autosave timer fires? That's `Action::Persist`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing any I/O the caller should
//! perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};

use crate::core::export::Export;
use crate::core::key::KeyInput;
use crate::core::state::App;
use crate::core::storage::SnapshotContent;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Key(KeyInput),
    Paste(String),
    /// Menu command: commit the item at this index.
    MenuSelect(usize),
    /// Menu command: close without editing.
    MenuClose,
    /// Export requested for the given date.
    Export(NaiveDate),
    /// Autosave timer fired.
    Persist,
    Saved,
    SaveFailed(String),
    Exported(PathBuf),
    ExportFailed(String),
    Quit,
}

/// I/O the event loop should perform after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Content changed: (re)start the autosave timer.
    ScheduleSave,
    /// Write this snapshot now.
    SaveNow(SnapshotContent),
    WriteExport(Export),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Key(input) => {
            let changed = app.surface.key(&input);
            mark_changed(app, changed)
        }
        Action::Paste(text) => {
            let changed = app.surface.paste(&text);
            mark_changed(app, changed)
        }
        Action::MenuSelect(index) => {
            let changed = app.surface.select(index);
            mark_changed(app, changed)
        }
        Action::MenuClose => {
            app.surface.close_menu();
            Effect::None
        }
        Action::Export(date) => {
            let export = app.surface.export(date);
            debug!("Export prepared: {}", export.filename);
            Effect::WriteExport(export)
        }
        Action::Persist => {
            if app.dirty {
                Effect::SaveNow(app.surface.content())
            } else {
                Effect::None
            }
        }
        Action::Saved => {
            app.dirty = false;
            app.saved_at = Some(Utc::now());
            Effect::None
        }
        Action::SaveFailed(e) => {
            warn!("Save failed: {}", e);
            app.status_message = format!("Save failed: {e}");
            Effect::None
        }
        Action::Exported(path) => {
            info!("Exported to {}", path.display());
            app.status_message = format!("Exported {}", path.display());
            Effect::None
        }
        Action::ExportFailed(e) => {
            warn!("Export failed: {}", e);
            app.status_message = format!("Export failed: {e}");
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn mark_changed(app: &mut App, changed: bool) -> Effect {
    if changed {
        app.dirty = true;
        Effect::ScheduleSave
    } else {
        Effect::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::key::Key;
    use crate::test_support::{blocks_app, key_for, raw_app};

    fn type_into(app: &mut App, text: &str) -> Vec<Effect> {
        text.chars()
            .map(|c| update(app, Action::Key(key_for(c))))
            .collect()
    }

    fn may_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_typing_schedules_save() {
        let mut app = raw_app("");
        let effects = type_into(&mut app, "hi");
        assert!(effects.iter().all(|e| *e == Effect::ScheduleSave));
        assert!(app.dirty);
    }

    #[test]
    fn test_cursor_movement_does_not_schedule_save() {
        let mut app = raw_app("abc");
        let effect = update(&mut app, Action::Key(KeyInput::plain(Key::Left)));
        assert_eq!(effect, Effect::None);
        assert!(!app.dirty);
    }

    #[test]
    fn test_persist_only_when_dirty() {
        let mut app = raw_app("x");
        assert_eq!(update(&mut app, Action::Persist), Effect::None);
        type_into(&mut app, "y");
        assert_eq!(
            update(&mut app, Action::Persist),
            Effect::SaveNow(SnapshotContent::Text("xy".into()))
        );
        update(&mut app, Action::Saved);
        assert!(!app.dirty);
        assert!(app.saved_at.is_some());
        assert_eq!(update(&mut app, Action::Persist), Effect::None);
    }

    #[test]
    fn test_export_effect_raw_end_to_end() {
        let mut app = raw_app("");
        type_into(&mut app, "/h2 Title\n/todo Task");
        let Effect::WriteExport(export) = update(&mut app, Action::Export(may_first())) else {
            panic!("expected export effect");
        };
        assert_eq!(export.filename, "blackboard-2024-05-01.md");
        assert_eq!(export.markdown, "## Title\n\n☐ Task");
    }

    #[test]
    fn test_export_effect_blocks_end_to_end() {
        let mut app = blocks_app();
        type_into(&mut app, "/h2 Title\n/todo Task");
        let Effect::WriteExport(export) = update(&mut app, Action::Export(may_first())) else {
            panic!("expected export effect");
        };
        assert_eq!(export.markdown, "## Title\n\n- [ ] Task");
    }

    #[test]
    fn test_menu_actions() {
        let mut app = raw_app("");
        type_into(&mut app, "/");
        assert_eq!(update(&mut app, Action::MenuSelect(0)), Effect::ScheduleSave);
        assert_eq!(app.surface.content(), SnapshotContent::Text("☐ ".into()));

        let mut app = raw_app("");
        type_into(&mut app, "/");
        assert!(app.surface.menu().is_open);
        assert_eq!(update(&mut app, Action::MenuClose), Effect::None);
        assert!(!app.surface.menu().is_open);
    }

    #[test]
    fn test_escape_keeps_menu_closed_until_next_edit() {
        for mut app in [raw_app(""), blocks_app()] {
            type_into(&mut app, "/h");
            assert_eq!(
                update(&mut app, Action::Key(KeyInput::plain(Key::Escape))),
                Effect::None
            );
            assert!(!app.surface.menu().is_open);

            type_into(&mut app, "1");
            assert!(app.surface.menu().is_open);
        }
    }

    #[test]
    fn test_failures_surface_in_status() {
        let mut app = raw_app("");
        update(&mut app, Action::SaveFailed("disk full".into()));
        assert!(app.status_message.contains("disk full"));
        update(&mut app, Action::ExportFailed("read-only".into()));
        assert!(app.status_message.contains("read-only"));
        update(&mut app, Action::Exported(PathBuf::from("/tmp/blackboard-2024-05-01.md")));
        assert!(app.status_message.contains("blackboard-2024-05-01.md"));
    }

    #[test]
    fn test_quit() {
        let mut app = blocks_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
