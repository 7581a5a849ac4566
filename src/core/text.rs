//! Raw text buffer with a selection.
//!
//! Offsets are UTF-8 byte offsets and must sit on char boundaries
//! (0..=text.len()). A collapsed selection is the cursor.
//!
//! Besides the line helpers the engine needs, this module holds the
//! "default handling" for keys the engine passes through: inserting
//! characters, deleting, and moving the cursor.

use crate::core::error::EditorError;
use crate::core::key::{Key, KeyInput};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn collapsed(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The end Shift+arrows move.
    pub fn head(&self, active: ActiveEnd) -> usize {
        match active {
            ActiveEnd::Start => self.start,
            ActiveEnd::End => self.end,
        }
    }

    /// Move the active end to `to` while the other end stays anchored.
    /// Crossing the anchor flips which end is active.
    pub fn extend(&self, active: ActiveEnd, to: usize) -> (Selection, ActiveEnd) {
        let anchor = match active {
            ActiveEnd::Start => self.end,
            ActiveEnd::End => self.start,
        };
        if to < anchor {
            (Selection::new(to, anchor), ActiveEnd::Start)
        } else {
            (Selection::new(anchor, to), ActiveEnd::End)
        }
    }
}

/// Which end of a selection is under the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveEnd {
    Start,
    #[default]
    End,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextState {
    pub text: String,
    pub selection: Selection,
    pub active: ActiveEnd,
}

impl TextState {
    /// Text with the cursor at the end.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            selection: Selection::collapsed(end),
            active: ActiveEnd::End,
        }
    }

    pub fn with_selection(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            selection: Selection::new(start, end),
            active: ActiveEnd::End,
        }
    }

    pub fn cursor(&self) -> usize {
        self.selection.start
    }

    /// Checks `0 <= start <= end <= len` and char-boundary alignment.
    pub fn validate(&self) -> Result<(), EditorError> {
        let Selection { start, end } = self.selection;
        if start > end || end > self.text.len() {
            return Err(EditorError::AmbiguousCursorContext(format!(
                "selection {start}..{end} outside text of length {}",
                self.text.len()
            )));
        }
        if !self.text.is_char_boundary(start) || !self.text.is_char_boundary(end) {
            return Err(EditorError::AmbiguousCursorContext(format!(
                "selection {start}..{end} splits a character"
            )));
        }
        Ok(())
    }

    /// Offset where the line holding the cursor begins.
    pub fn line_start(&self) -> usize {
        self.text[..self.cursor()]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    /// Offset where the line holding the cursor ends (before its `\n`).
    pub fn line_end(&self) -> usize {
        let cursor = self.cursor();
        self.text[cursor..]
            .find('\n')
            .map(|i| cursor + i)
            .unwrap_or(self.text.len())
    }

    /// Current line from its start up to the cursor.
    pub fn line_before_cursor(&self) -> Result<&str, EditorError> {
        self.validate()?;
        Ok(&self.text[self.line_start()..self.cursor()])
    }

    pub fn selected_text(&self) -> &str {
        &self.text[self.selection.start..self.selection.end]
    }

    /// Replace `start..end` with `insert` and set the resulting selection.
    pub fn splice(&self, start: usize, end: usize, insert: &str, selection: Selection) -> TextState {
        let mut text = String::with_capacity(self.text.len() + insert.len());
        text.push_str(&self.text[..start]);
        text.push_str(insert);
        text.push_str(&self.text[end..]);
        TextState {
            text,
            selection,
            active: self.active,
        }
    }

    /// Type `insert` over the selection, leaving the cursor after it.
    pub fn insert(&mut self, insert: &str) {
        let start = self.selection.start;
        let cursor = start + insert.len();
        *self = self.splice(start, self.selection.end, insert, Selection::collapsed(cursor));
    }

    /// Returns `true` if anything was removed.
    pub fn delete_backward(&mut self) -> bool {
        if !self.selection.is_empty() {
            self.insert("");
            return true;
        }
        let cursor = self.cursor();
        if cursor == 0 {
            return false;
        }
        let prev = prev_char_boundary(&self.text, cursor);
        *self = self.splice(prev, cursor, "", Selection::collapsed(prev));
        true
    }

    /// Returns `true` if anything was removed.
    pub fn delete_forward(&mut self) -> bool {
        if !self.selection.is_empty() {
            self.insert("");
            return true;
        }
        let cursor = self.cursor();
        if cursor >= self.text.len() {
            return false;
        }
        let next = next_char_boundary(&self.text, cursor);
        *self = self.splice(cursor, next, "", Selection::collapsed(cursor));
        true
    }

    fn move_to(&mut self, pos: usize) -> bool {
        self.select(Selection::collapsed(pos))
    }

    fn extend_to(&mut self, to: usize) -> bool {
        let (selection, active) = self.selection.extend(self.active, to);
        self.active = active;
        self.select(selection)
    }

    fn select(&mut self, selection: Selection) -> bool {
        let moved = self.selection != selection;
        self.selection = selection;
        moved
    }

    /// Move up (`-1`) or down (`1`) one logical line, keeping the column
    /// in characters where the target line is long enough.
    pub fn move_vertically(&mut self, direction: i8) -> bool {
        let line_start = self.line_start();
        let column = self.text[line_start..self.cursor()].chars().count();
        let target_start = if direction < 0 {
            if line_start == 0 {
                return false;
            }
            self.text[..line_start - 1]
                .rfind('\n')
                .map(|i| i + 1)
                .unwrap_or(0)
        } else {
            let line_end = self.line_end();
            if line_end >= self.text.len() {
                return false;
            }
            line_end + 1
        };
        let target_line = self.text[target_start..].split('\n').next().unwrap_or("");
        let offset = target_line
            .char_indices()
            .nth(column)
            .map(|(i, _)| i)
            .unwrap_or(target_line.len());
        self.move_to(target_start + offset)
    }

    /// Default handling for a key the engine did not intercept.
    /// Returns `true` if text or cursor changed.
    pub fn apply_default(&mut self, input: &KeyInput) -> bool {
        if self.validate().is_err() {
            return false;
        }
        if let Some(c) = input.inserted_char() {
            let mut buf = [0u8; 4];
            self.insert(c.encode_utf8(&mut buf));
            return true;
        }
        if input.has_platform_modifier() {
            return false;
        }
        match input.key {
            Key::Enter => {
                self.insert("\n");
                true
            }
            Key::Backspace => self.delete_backward(),
            Key::Delete => self.delete_forward(),
            Key::Left if input.modifiers.shift => {
                let to = prev_char_boundary(&self.text, self.selection.head(self.active));
                self.extend_to(to)
            }
            Key::Right if input.modifiers.shift => {
                let to = next_char_boundary(&self.text, self.selection.head(self.active));
                self.extend_to(to)
            }
            Key::Left => {
                let pos = if self.selection.is_empty() {
                    prev_char_boundary(&self.text, self.cursor())
                } else {
                    self.selection.start
                };
                self.move_to(pos)
            }
            Key::Right => {
                let pos = if self.selection.is_empty() {
                    next_char_boundary(&self.text, self.selection.end)
                } else {
                    self.selection.end
                };
                self.move_to(pos)
            }
            Key::Home => {
                let pos = self.line_start();
                self.move_to(pos)
            }
            Key::End => {
                let pos = self.line_end();
                self.move_to(pos)
            }
            Key::Up => self.move_vertically(-1),
            Key::Down => self.move_vertically(1),
            _ => false,
        }
    }
}

/// Byte offset of the character boundary before `pos` in `text`.
pub fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset of the character boundary after `pos` in `text`.
pub fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_before_cursor_on_second_line() {
        let state = TextState::with_selection("first\n/todo rest", 11, 11);
        assert_eq!(state.line_before_cursor().unwrap(), "/todo");
        assert_eq!(state.line_start(), 6);
        assert_eq!(state.line_end(), 16);
    }

    #[test]
    fn test_invalid_selection_is_ambiguous() {
        let reversed = TextState::with_selection("abc", 2, 1);
        assert!(matches!(
            reversed.line_before_cursor(),
            Err(EditorError::AmbiguousCursorContext(_))
        ));
        let past_end = TextState::with_selection("abc", 0, 9);
        assert!(past_end.validate().is_err());
        let mid_char = TextState::with_selection("☐", 1, 1);
        assert!(mid_char.validate().is_err());
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut state = TextState::with_selection("hello world", 6, 11);
        state.insert("there");
        assert_eq!(state.text, "hello there");
        assert_eq!(state.selection, Selection::collapsed(11));
    }

    #[test]
    fn test_backspace_removes_whole_multibyte_char() {
        let mut state = TextState::new("a☐");
        assert!(state.delete_backward());
        assert_eq!(state.text, "a");
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn test_backspace_at_start_does_nothing() {
        let mut state = TextState::with_selection("abc", 0, 0);
        assert!(!state.delete_backward());
        assert_eq!(state.text, "abc");
    }

    #[test]
    fn test_delete_forward() {
        let mut state = TextState::with_selection("abc", 1, 1);
        assert!(state.delete_forward());
        assert_eq!(state.text, "ac");
        assert_eq!(state.cursor(), 1);
    }

    #[test]
    fn test_vertical_movement_keeps_column() {
        let mut state = TextState::with_selection("abcd\nxy\n1234", 3, 3);
        assert!(state.move_vertically(1));
        assert_eq!(state.cursor(), 7); // clamped to end of "xy"
        assert!(state.move_vertically(1));
        assert_eq!(state.cursor(), 10); // column 2 of "1234"
        assert!(!state.move_vertically(1));
        assert!(state.move_vertically(-1));
        assert_eq!(state.cursor(), 7);
    }

    #[test]
    fn test_default_keys() {
        let mut state = TextState::new("");
        for c in "hi".chars() {
            state.apply_default(&KeyInput::plain(Key::Char(c)));
        }
        state.apply_default(&KeyInput::plain(Key::Enter));
        assert_eq!(state.text, "hi\n");
        assert!(!state.apply_default(&KeyInput::plain(Key::Home)));
        assert_eq!(state.cursor(), 3);
        assert!(state.apply_default(&KeyInput::plain(Key::Left)));
        assert_eq!(state.cursor(), 2);
        assert!(state.apply_default(&KeyInput::plain(Key::Home)));
        assert_eq!(state.cursor(), 0);
        assert!(!state.apply_default(&KeyInput::ctrl(Key::Char('z'))));
    }

    #[test]
    fn test_shift_arrows_grow_selection() {
        let mut state = TextState::with_selection("a☐b", 1, 1);
        let shift = |key| KeyInput::new(key, crate::core::key::Modifiers::SHIFT);
        assert!(state.apply_default(&shift(Key::Right)));
        assert_eq!(state.selected_text(), "☐");
        assert!(state.apply_default(&shift(Key::Right)));
        assert_eq!(state.selected_text(), "☐b");
        assert!(!state.apply_default(&shift(Key::Right)));
        assert!(state.apply_default(&KeyInput::plain(Key::Left)));
        assert_eq!(state.selection, Selection::collapsed(1));
    }

    #[test]
    fn test_shift_arrows_shrink_from_the_moving_end() {
        let shift = |key| KeyInput::new(key, crate::core::key::Modifiers::SHIFT);
        let mut state = TextState::new("abc");
        state.apply_default(&shift(Key::Left));
        state.apply_default(&shift(Key::Left));
        assert_eq!(state.selection, Selection::new(1, 3));
        assert!(state.apply_default(&shift(Key::Right)));
        assert_eq!(state.selection, Selection::new(2, 3));

        // Crossing the anchor flips direction
        state.apply_default(&shift(Key::Right));
        assert_eq!(state.selection, Selection::collapsed(3));
        let mut state = TextState::with_selection("abc", 1, 1);
        state.apply_default(&shift(Key::Right));
        state.apply_default(&shift(Key::Left));
        state.apply_default(&shift(Key::Left));
        assert_eq!(state.selection, Selection::new(0, 1));
        assert_eq!(state.active, ActiveEnd::Start);
    }

    #[test]
    fn test_default_handling_ignores_invalid_selection() {
        let mut state = TextState::with_selection("ab", 5, 5);
        assert!(!state.apply_default(&KeyInput::plain(Key::Char('x'))));
        assert_eq!(state.text, "ab");
    }

    #[test]
    fn test_char_boundaries() {
        let text = "a☐b";
        assert_eq!(next_char_boundary(text, 1), 4);
        assert_eq!(prev_char_boundary(text, 4), 1);
        assert_eq!(next_char_boundary(text, 5), 5);
    }
}
