//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::document::Document;
use crate::core::key::{Key, KeyInput};
use crate::core::state::{App, Surface};

/// Key press for one typed character; `\n` is Enter.
pub fn key_for(c: char) -> KeyInput {
    match c {
        '\n' => KeyInput::plain(Key::Enter),
        c => KeyInput::plain(Key::Char(c)),
    }
}

/// Type `text` into a surface one key at a time.
pub fn type_keys(surface: &mut Surface, text: &str) {
    for c in text.chars() {
        surface.key(&key_for(c));
    }
}

/// Creates a raw-mode test App holding `text`.
pub fn raw_app(text: &str) -> App {
    App::new(Surface::raw(text))
}

/// Creates a block-mode test App holding one empty paragraph.
pub fn blocks_app() -> App {
    App::new(Surface::blocks(Document::new()))
}
