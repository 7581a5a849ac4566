//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Loop
//!
//! Each turn draws if something changed, waits up to 250ms for input, then
//! drains every pending terminal event before drawing again. Actions sent
//! from background tasks (the autosave timer) arrive over a std `mpsc`
//! channel and go through the same `update()` as key presses.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::autosave::Debouncer;
use crate::core::config::ResolvedConfig;
use crate::core::export::Export;
use crate::core::state::{App, Surface};
use crate::core::storage::{self, FileStore, KeyValueStore};
use crate::tui::component::EventHandler;
use crate::tui::components::{BlockViewState, PreviewState, ViewportState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
#[derive(Debug, Default)]
pub struct TuiState {
    pub raw_viewport: ViewportState,
    pub block_view: BlockViewState,
    /// Markdown preview pane (None = hidden)
    pub preview: Option<PreviewState>,
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_preview(&mut self) {
        self.preview = match self.preview {
            Some(_) => None,
            None => Some(PreviewState::default()),
        };
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Push the Kitty keyboard protocol unconditionally so Ctrl+Enter and
        // Ctrl+I arrive distinct from Ctrl+J and Tab. Terminals without
        // support ignore it; Ctrl+J still works there.
        execute!(
            stdout(),
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Performs the I/O that `update()` asks for and feeds the outcome back in.
struct EffectRunner<'a> {
    store: &'a mut dyn KeyValueStore,
    autosave: Debouncer,
    export_dir: PathBuf,
    tx: mpsc::Sender<Action>,
}

impl EffectRunner<'_> {
    /// Run `action` and every follow-up it causes. Returns `true` on quit.
    fn dispatch(&mut self, app: &mut App, action: Action) -> bool {
        let mut effect = update(app, action);
        loop {
            let follow_up = match effect {
                Effect::None => return false,
                Effect::Quit => return true,
                Effect::ScheduleSave => {
                    let tx = self.tx.clone();
                    self.autosave.schedule(move || {
                        if tx.send(Action::Persist).is_err() {
                            warn!("Failed to send autosave tick: receiver dropped");
                        }
                    });
                    return false;
                }
                Effect::SaveNow(content) => match storage::save(&mut *self.store, content) {
                    Ok(()) => Action::Saved,
                    Err(e) => Action::SaveFailed(e.to_string()),
                },
                Effect::WriteExport(export) => match export.write_to(&self.export_dir) {
                    Ok(path) => Action::Exported(path),
                    Err(e) => Action::ExportFailed(e.to_string()),
                },
            };
            effect = update(app, follow_up);
        }
    }

    /// Flush a pending change before exit.
    fn save_on_exit(&mut self, app: &mut App) {
        self.autosave.cancel();
        if app.dirty {
            info!("Saving before exit");
            self.dispatch(app, Action::Persist);
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut store = FileStore::new(&config.data_dir)?;
    let snapshot = storage::load(&store);
    info!(
        "Opening {} in {} mode",
        if snapshot.is_some() {
            "saved document"
        } else {
            "empty document"
        },
        config.mode.label()
    );
    let mut app = App::new(Surface::from_snapshot(config.mode, snapshot));
    let mut tui = TuiState::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut runner = EffectRunner {
        store: &mut store,
        autosave: Debouncer::new(config.autosave_delay),
        export_dir: config.export_dir.clone(),
        tx,
    };

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let mut needs_redraw = true; // Force first frame

    let result = loop {
        if needs_redraw {
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &app, &mut tui)) {
                break Err(e);
            }
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(Duration::from_millis(250));
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let action = match event {
                TuiEvent::Resize => continue,
                TuiEvent::TogglePreview => {
                    tui.toggle_preview();
                    continue;
                }
                TuiEvent::ScrollPreviewUp | TuiEvent::ScrollPreviewDown => {
                    if let Some(preview) = tui.preview.as_mut() {
                        preview.handle_event(&event);
                    }
                    continue;
                }
                TuiEvent::Key(input) => Action::Key(input),
                TuiEvent::Paste(text) => Action::Paste(text),
                TuiEvent::Export => Action::Export(Export::today()),
                TuiEvent::Quit | TuiEvent::ForceQuit => Action::Quit,
            };
            if runner.dispatch(&mut app, action) {
                should_quit = true;
                break;
            }
        }

        if should_quit {
            break Ok(());
        }

        // Handle background task actions (autosave ticks)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if runner.dispatch(&mut app, action) {
                should_quit = true;
            }
        }
        if should_quit {
            break Ok(());
        }
    };

    runner.save_on_exit(&mut app);

    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::key::{Key, KeyInput};
    use crate::core::storage::{MemoryStore, STORAGE_KEY, SnapshotContent};
    use crate::test_support::{key_for, raw_app};

    fn runner<'a>(store: &'a mut MemoryStore, dir: &std::path::Path) -> (EffectRunner<'a>, mpsc::Receiver<Action>) {
        let (tx, rx) = mpsc::channel();
        (
            EffectRunner {
                store,
                autosave: Debouncer::new(Duration::from_millis(20)),
                export_dir: dir.to_path_buf(),
                tx,
            },
            rx,
        )
    }

    #[test]
    fn test_toggle_preview() {
        let mut tui = TuiState::new();
        tui.toggle_preview();
        assert!(tui.preview.is_some());
        tui.toggle_preview();
        assert!(tui.preview.is_none());
    }

    #[tokio::test]
    async fn test_typing_autosaves_after_quiet_period() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = MemoryStore::default();
        let mut app = raw_app("");
        {
            let (mut runner, rx) = runner(&mut store, tmp.path());
            for c in "hi".chars() {
                assert!(!runner.dispatch(&mut app, Action::Key(key_for(c))));
            }
            // Only the last keystroke's timer survives
            let tick = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(2)))
                .await
                .unwrap()
                .unwrap();
            assert_eq!(tick, Action::Persist);
            runner.dispatch(&mut app, tick);
        }
        assert!(!app.dirty);
        assert!(app.saved_at.is_some());
        let saved = storage::load(&store).unwrap();
        assert_eq!(saved.content, SnapshotContent::Text("hi".into()));
        assert!(store.get(STORAGE_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_export_writes_file_and_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = MemoryStore::default();
        let mut app = raw_app("/todo");
        let (mut runner, _rx) = runner(&mut store, tmp.path());
        runner.dispatch(&mut app, Action::Key(KeyInput::plain(Key::Char(' '))));
        let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        runner.dispatch(&mut app, Action::Export(date));
        let written =
            std::fs::read_to_string(tmp.path().join("blackboard-2024-05-01.md")).unwrap();
        assert_eq!(written, "☐");
        assert!(app.status_message.contains("blackboard-2024-05-01.md"));
    }

    #[tokio::test]
    async fn test_export_failure_surfaces_in_status() {
        let tmp = tempfile::tempdir().unwrap();
        let not_a_dir = tmp.path().join("file");
        std::fs::write(&not_a_dir, "x").unwrap();
        let mut store = MemoryStore::default();
        let mut app = raw_app("text");
        let (mut runner, _rx) = runner(&mut store, &not_a_dir);
        runner.dispatch(&mut app, Action::Export(Export::today()));
        assert!(app.status_message.starts_with("Export failed"));
    }

    #[tokio::test]
    async fn test_quit_saves_pending_changes() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = MemoryStore::default();
        let mut app = raw_app("");
        {
            let (mut runner, _rx) = runner(&mut store, tmp.path());
            runner.dispatch(&mut app, Action::Key(key_for('x')));
            assert!(runner.dispatch(&mut app, Action::Quit));
            runner.save_on_exit(&mut app);
            assert!(!runner.autosave.is_pending());
        }
        assert!(!app.dirty);
        assert_eq!(
            storage::load(&store).unwrap().content,
            SnapshotContent::Text("x".into())
        );
    }
}
