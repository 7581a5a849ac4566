use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, warn};

use crate::core::key::{Key, KeyInput, Modifiers};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Passed to core::update
    Key(KeyInput),
    Paste(String), // Bracketed paste - preserves newlines
    Export,        // Ctrl+S
    Quit,          // Ctrl+Q
    ForceQuit,     // Ctrl+C

    // TUI-local events (handled directly in TUI)
    TogglePreview, // Ctrl+P
    ScrollPreviewUp,
    ScrollPreviewDown,
    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => match event::read() {
            Ok(ev) => translate(ev),
            Err(e) => {
                warn!("Failed to read terminal event: {}", e);
                None
            }
        },
        Ok(false) => None,
        Err(e) => {
            warn!("Failed to poll terminal events: {}", e);
            None
        }
    }
}

/// Map a crossterm event onto a `TuiEvent`. Release events are dropped.
pub fn translate(ev: Event) -> Option<TuiEvent> {
    match ev {
        Event::Key(key_event) => translate_key(key_event),
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

fn translate_key(key_event: KeyEvent) -> Option<TuiEvent> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    debug!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code, key_event.modifiers
    );

    let modifiers = translate_modifiers(key_event.modifiers);
    let ctrl_only = key_event.modifiers == KeyModifiers::CONTROL;

    let key = match key_event.code {
        KeyCode::Char('q') if ctrl_only => return Some(TuiEvent::Quit),
        KeyCode::Char('c') if ctrl_only => return Some(TuiEvent::ForceQuit),
        KeyCode::Char('s') if ctrl_only => return Some(TuiEvent::Export),
        KeyCode::Char('p') if ctrl_only => return Some(TuiEvent::TogglePreview),
        KeyCode::PageUp => return Some(TuiEvent::ScrollPreviewUp),
        KeyCode::PageDown => return Some(TuiEvent::ScrollPreviewDown),
        // Ctrl+J is ASCII LF; terminals without keyboard enhancement send it for Ctrl+Enter
        KeyCode::Char('j') if ctrl_only => Key::Enter,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => {
            return Some(TuiEvent::Key(KeyInput::new(
                Key::Tab,
                Modifiers {
                    shift: true,
                    ..modifiers
                },
            )));
        }
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => return None,
    };
    Some(TuiEvent::Key(KeyInput::new(key, modifiers)))
}

fn translate_modifiers(m: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: m.contains(KeyModifiers::CONTROL),
        meta: m.intersects(KeyModifiers::SUPER | KeyModifiers::META),
        shift: m.contains(KeyModifiers::SHIFT),
        alt: m.contains(KeyModifiers::ALT),
    }
}
