//! # Command Engine (raw text)
//!
//! Decides, for each keystroke, whether to intercept it and if so what the
//! new `(text, selection)` is. The host applies default handling only when
//! the outcome is `PassThrough`.
//!
//! ```text
//! KeyInput + TextState ──▶ handle_key() ──▶ PassThrough │ Intercepted │ Edited
//!                                │
//!                                └── SuggestionMenu (Closed / Open)
//! ```
//!
//! Rules are checked in a fixed order: open menu, checkbox toggle chord,
//! exact trigger expansion, checklist propagation, style chords. New state
//! is built off to the side and swapped in whole, so a failed rule never
//! leaves a half-edited buffer.

use log::debug;

use crate::core::document::Style;
use crate::core::key::{Key, KeyInput};
use crate::core::suggestion::{MenuEvent, MenuView, SuggestionMenu};
use crate::core::text::{Selection, TextState};
use crate::core::trigger::{self, CHECKBOX_CHECKED, CHECKBOX_UNCHECKED, Trigger};

/// What the host should do with the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not handled: run default input behaviour.
    PassThrough,
    /// Handled, nothing changed, suppress default behaviour.
    Intercepted,
    /// Handled and the state was replaced, suppress default behaviour.
    Edited,
}

/// Style chord bound to a key, if any.
pub fn chord_style(input: &KeyInput) -> Option<Style> {
    if !input.has_platform_modifier() {
        return None;
    }
    match input.key {
        Key::Char('b') | Key::Char('B') => Some(Style::Bold),
        Key::Char('i') | Key::Char('I') => Some(Style::Italic),
        Key::Char('u') | Key::Char('U') => Some(Style::Underline),
        _ => None,
    }
}

pub fn is_toggle_chord(input: &KeyInput) -> bool {
    input.has_platform_modifier() && input.key == Key::Enter
}

#[derive(Debug, Default)]
pub struct Engine {
    menu: SuggestionMenu,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn menu(&self) -> MenuView {
        self.menu.view()
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu.is_open()
    }

    pub fn handle_key(&mut self, input: &KeyInput, state: &mut TextState) -> KeyOutcome {
        let line = match state.line_before_cursor() {
            Ok(line) => line.to_string(),
            Err(e) => {
                debug!("Passing {:?} through: {}", input.key, e);
                return KeyOutcome::PassThrough;
            }
        };

        if self.menu.is_open() {
            return self.handle_menu_key(input, state);
        }

        if is_toggle_chord(input) {
            return match toggle_checkbox(state) {
                Some(next) => commit(state, next),
                None => KeyOutcome::Intercepted,
            };
        }

        if input.is_activation()
            && let Some(t) = trigger::find_exact(&line)
        {
            debug!("Expanding trigger {}", t.key);
            let next = expand(state, t);
            return commit(state, next);
        }

        if input.key == Key::Enter && !input.has_platform_modifier() && is_checklist_line(&line) {
            let insert = format!("\n{CHECKBOX_UNCHECKED} ");
            let cursor = state.selection.start + insert.len();
            let next = state.splice(
                state.selection.start,
                state.selection.end,
                &insert,
                Selection::collapsed(cursor),
            );
            return commit(state, next);
        }

        if let Some(style) = chord_style(input) {
            return match toggle_delimiters(state, style) {
                Some(next) => commit(state, next),
                None => KeyOutcome::Intercepted,
            };
        }

        KeyOutcome::PassThrough
    }

    fn handle_menu_key(&mut self, input: &KeyInput, state: &mut TextState) -> KeyOutcome {
        if input.has_platform_modifier() {
            return KeyOutcome::PassThrough;
        }
        let event = match input.key {
            Key::Down => MenuEvent::Next,
            Key::Up => MenuEvent::Previous,
            Key::Escape => MenuEvent::Dismiss,
            Key::Enter | Key::Char(' ') => {
                let Some(t) = self.menu.selected() else {
                    return KeyOutcome::PassThrough;
                };
                self.menu = SuggestionMenu::Closed;
                debug!("Committing suggestion {}", t.key);
                let next = expand(state, t);
                return commit(state, next);
            }
            _ => return KeyOutcome::PassThrough,
        };
        self.menu = std::mem::take(&mut self.menu).transition(event);
        KeyOutcome::Intercepted
    }

    /// Recompute the menu after the text or cursor changed.
    pub fn refresh_suggestions(&mut self, state: &TextState) {
        let menu = std::mem::take(&mut self.menu);
        self.menu = match state.line_before_cursor() {
            Ok(line) if state.selection.is_empty() => menu.transition(MenuEvent::Filter {
                line,
                anchor: state.line_start(),
            }),
            _ => menu.transition(MenuEvent::Dismiss),
        };
    }

    /// Menu command: commit the item at `index` as if it were selected and
    /// Enter was pressed.
    pub fn select(&mut self, index: usize, state: &mut TextState) -> KeyOutcome {
        if !self.menu.is_open() || state.validate().is_err() {
            return KeyOutcome::PassThrough;
        }
        let menu = std::mem::take(&mut self.menu).transition(MenuEvent::Select(index));
        let Some(t) = menu.selected() else {
            return KeyOutcome::PassThrough;
        };
        let next = expand(state, t);
        commit(state, next)
    }

    /// Menu command: close without touching the text.
    pub fn close_menu(&mut self) {
        self.menu = std::mem::take(&mut self.menu).transition(MenuEvent::Dismiss);
    }
}

fn commit(state: &mut TextState, next: TextState) -> KeyOutcome {
    *state = next;
    KeyOutcome::Edited
}

/// Replace line start..selection end with the trigger's replacement.
fn expand(state: &TextState, t: &Trigger) -> TextState {
    let line_start = state.line_start();
    let cursor = line_start + t.replacement.len();
    state.splice(
        line_start,
        state.selection.end,
        t.replacement,
        Selection::collapsed(cursor),
    )
}

fn is_checklist_line(line: &str) -> bool {
    line.trim_start()
        .starts_with([CHECKBOX_UNCHECKED, CHECKBOX_CHECKED])
}

/// Flip the first checkbox glyph on the cursor's line. Selection offsets stay
/// numerically the same: both glyphs have the same UTF-8 width.
fn toggle_checkbox(state: &TextState) -> Option<TextState> {
    let line_start = state.line_start();
    let line = &state.text[line_start..state.line_end()];
    let (idx, glyph) = line
        .char_indices()
        .find(|(_, c)| *c == CHECKBOX_UNCHECKED || *c == CHECKBOX_CHECKED)?;
    let flipped = if glyph == CHECKBOX_UNCHECKED {
        CHECKBOX_CHECKED
    } else {
        CHECKBOX_UNCHECKED
    };
    let at = line_start + idx;
    let mut buf = [0u8; 4];
    Some(state.splice(
        at,
        at + glyph.len_utf8(),
        flipped.encode_utf8(&mut buf),
        state.selection,
    ))
}

/// Delimiter character, delimiter length, and the bit of the surrounding run
/// length that means "this style is on".
///
/// Bold and italic share `*`: a run of 1 is italic, 2 bold, 3 both. Reading
/// bit 0 / bit 1 of the run keeps wrap and unwrap exact inverses.
fn delimiter(style: Style) -> (char, usize, usize) {
    match style {
        Style::Bold => ('*', 2, 0b10),
        Style::Italic => ('*', 1, 0b01),
        Style::Underline => ('_', 2, 0b10),
    }
}

/// Wrap the selection in the style's delimiters, or strip them if they are
/// already there. `None` for an empty selection.
pub fn toggle_delimiters(state: &TextState, style: Style) -> Option<TextState> {
    if state.selection.is_empty() {
        return None;
    }
    let Selection { start, end } = state.selection;
    let (c, width, bit) = delimiter(style);
    let before = state.text[..start].chars().rev().take_while(|&x| x == c).count();
    let after = state.text[end..].chars().take_while(|&x| x == c).count();
    let run = before.min(after);

    if run & bit != 0 {
        let inner = &state.text[start..end];
        Some(state.splice(
            start - width,
            end + width,
            inner,
            Selection::new(start - width, end - width),
        ))
    } else {
        let delim = c.to_string().repeat(width);
        let wrapped = format!("{delim}{}{delim}", state.selected_text());
        Some(state.splice(
            start,
            end,
            &wrapped,
            Selection::new(start + width, end + width),
        ))
    }
}
