//! # Application State
//!
//! Core business state for Blackboard. This module contains domain logic
//! only, no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── surface: Surface              // the document being edited
//! │   ├── Raw { engine, text }      //   flat text + command engine
//! │   └── Blocks(BlockEditor)       //   block tree + command rules
//! ├── status_message: String        // status bar text
//! ├── dirty: bool                   // changed since the last save
//! └── saved_at: Option<DateTime>    // last successful save
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use chrono::{DateTime, NaiveDate, Utc};

use crate::Mode;
use crate::core::blocks::BlockEditor;
use crate::core::document::Document;
use crate::core::engine::{Engine, KeyOutcome};
use crate::core::export::Export;
use crate::core::key::{Key, KeyInput};
use crate::core::storage::{Snapshot, SnapshotContent};
use crate::core::suggestion::MenuView;
use crate::core::text::TextState;

/// The editing surface, one variant per mode.
#[derive(Debug)]
pub enum Surface {
    Raw { engine: Engine, text: TextState },
    Blocks(BlockEditor),
}

impl Surface {
    pub fn raw(text: impl Into<String>) -> Self {
        Surface::Raw {
            engine: Engine::new(),
            text: TextState::new(text),
        }
    }

    pub fn blocks(document: Document) -> Self {
        Surface::Blocks(BlockEditor::new(document))
    }

    /// Open a stored snapshot (or nothing) in the requested mode,
    /// converting between text and blocks when they differ.
    pub fn from_snapshot(mode: Mode, snapshot: Option<Snapshot>) -> Self {
        match (mode, snapshot) {
            (Mode::Raw, Some(s)) => Surface::raw(s.into_text()),
            (Mode::Raw, None) => Surface::raw(""),
            (Mode::Blocks, Some(s)) => Surface::blocks(s.into_document()),
            (Mode::Blocks, None) => Surface::blocks(Document::new()),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Surface::Raw { .. } => Mode::Raw,
            Surface::Blocks(_) => Mode::Blocks,
        }
    }

    /// Run the command rules, fall back to default editing if the key was
    /// passed through, then refresh the menu. An intercepted key leaves the
    /// menu as the rules set it, so Escape stays dismissed. Returns `true` if
    /// the content (not just the cursor) changed.
    pub fn key(&mut self, input: &KeyInput) -> bool {
        match self {
            Surface::Raw { engine, text } => {
                let before = text.text.clone();
                match engine.handle_key(input, text) {
                    KeyOutcome::Intercepted => {}
                    KeyOutcome::PassThrough => {
                        text.apply_default(input);
                        engine.refresh_suggestions(text);
                    }
                    KeyOutcome::Edited => engine.refresh_suggestions(text),
                }
                text.text != before
            }
            Surface::Blocks(editor) => {
                let before = editor.document().clone();
                match editor.handle_key(input) {
                    KeyOutcome::Intercepted => {}
                    KeyOutcome::PassThrough => {
                        editor.apply_default(input);
                        editor.refresh_suggestions();
                    }
                    KeyOutcome::Edited => editor.refresh_suggestions(),
                }
                *editor.document() != before
            }
        }
    }

    /// Insert pasted text at the cursor. Newlines split blocks in block mode.
    pub fn paste(&mut self, pasted: &str) -> bool {
        let pasted = pasted.replace("\r\n", "\n");
        if pasted.is_empty() {
            return false;
        }
        match self {
            Surface::Raw { engine, text } => {
                if text.validate().is_err() {
                    return false;
                }
                text.insert(&pasted);
                engine.refresh_suggestions(text);
                true
            }
            Surface::Blocks(editor) => {
                let mut changed = false;
                for (i, line) in pasted.split('\n').enumerate() {
                    if i > 0 {
                        changed |= editor.apply_default(&KeyInput::plain(Key::Enter));
                    }
                    if !line.is_empty() {
                        changed |= editor.insert(line);
                    }
                }
                editor.refresh_suggestions();
                changed
            }
        }
    }

    pub fn menu(&self) -> MenuView {
        match self {
            Surface::Raw { engine, .. } => engine.menu(),
            Surface::Blocks(editor) => editor.menu(),
        }
    }

    /// Commit menu item `index`. Returns `true` if the content changed.
    pub fn select(&mut self, index: usize) -> bool {
        let outcome = match self {
            Surface::Raw { engine, text } => engine.select(index, text),
            Surface::Blocks(editor) => editor.select(index),
        };
        outcome == KeyOutcome::Edited
    }

    pub fn close_menu(&mut self) {
        match self {
            Surface::Raw { engine, .. } => engine.close_menu(),
            Surface::Blocks(editor) => editor.close_menu(),
        }
    }

    pub fn content(&self) -> SnapshotContent {
        match self {
            Surface::Raw { text, .. } => SnapshotContent::Text(text.text.clone()),
            Surface::Blocks(editor) => SnapshotContent::Blocks(editor.document().clone()),
        }
    }

    pub fn export(&self, date: NaiveDate) -> Export {
        match self {
            Surface::Raw { text, .. } => Export::from_raw_text(&text.text, date),
            Surface::Blocks(editor) => Export::from_document(editor.document(), date),
        }
    }
}

pub struct App {
    pub surface: Surface,
    pub status_message: String,
    /// True when the surface changed after the last successful save.
    pub dirty: bool,
    pub saved_at: Option<DateTime<Utc>>,
}

impl App {
    pub fn new(surface: Surface) -> Self {
        Self {
            surface,
            status_message: String::from("Type / for commands"),
            dirty: false,
            saved_at: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.surface.mode()
    }
}
