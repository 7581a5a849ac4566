//! Cursor placement and scrolling for the raw editor.
//!
//! `ViewportState` owns the scroll offset and the last computed screen
//! position of the cursor. All methods take the buffer and cursor byte offset
//! explicitly; the text itself belongs to the core `TextState`.

use super::text_wrap::{
    CONTENT_X_OFFSET, CONTENT_Y_OFFSET, display_width, inner_width, wrap_line_count, wrap_options,
};
use ratatui::layout::Rect;

/// Scroll state that persists between frames.
#[derive(Debug, Default)]
pub struct ViewportState {
    /// First wrapped line shown (0 when content fits in the viewport)
    pub scroll_offset: u16,
    /// Cursor position in screen coordinates from the last render
    pub cursor: Option<(u16, u16)>,
}

/// Text before `pos`, or all of it if `pos` is not a valid boundary.
fn before(buffer: &str, pos: usize) -> &str {
    buffer.get(..pos).unwrap_or(buffer)
}

impl ViewportState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Which wrapped line (0-based) the cursor is on.
    pub fn cursor_line(buffer: &str, pos: usize, content_width: u16) -> u16 {
        let width = inner_width(content_width);
        if width == 0 {
            return 0;
        }

        let text_before_cursor = before(buffer, pos);
        let lines = textwrap::wrap(text_before_cursor, wrap_options(width));
        let mut cursor_line = lines.len().saturating_sub(1) as u16;

        // If cursor is right after a newline that textwrap didn't represent, add one
        if text_before_cursor.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
            cursor_line += 1;
        }

        cursor_line
    }

    /// Update scroll offset to keep the cursor inside `visible` rows.
    pub fn scroll_to_cursor(&mut self, buffer: &str, pos: usize, content_width: u16, visible: u16) {
        let total_lines = wrap_line_count(buffer, inner_width(content_width));
        if total_lines <= visible {
            self.scroll_offset = 0;
            return;
        }

        let cursor_line = Self::cursor_line(buffer, pos, content_width);
        if cursor_line < self.scroll_offset {
            self.scroll_offset = cursor_line;
        } else if cursor_line >= self.scroll_offset + visible {
            self.scroll_offset = cursor_line.saturating_sub(visible - 1);
        }
    }

    /// Screen position for the cursor based on the wrapped layout.
    /// Returns (column, row).
    pub fn screen_pos(&self, buffer: &str, pos: usize, area: Rect) -> (u16, u16) {
        let width = inner_width(area.width);
        let origin = (area.x + CONTENT_X_OFFSET, area.y + CONTENT_Y_OFFSET);
        if width == 0 {
            return origin;
        }

        let text_before_cursor = before(buffer, pos);
        let cursor_line = Self::cursor_line(buffer, pos, area.width);

        // Measure from the last newline so trailing spaces count; textwrap trims them.
        let last_newline = text_before_cursor.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let logical_line_to_cursor = &text_before_cursor[last_newline..];
        let wrapped = textwrap::wrap(logical_line_to_cursor, wrap_options(width));

        let trailing_spaces =
            logical_line_to_cursor.len() - logical_line_to_cursor.trim_end_matches(' ').len();
        let cursor_col = wrapped
            .last()
            .map(|seg| display_width(seg))
            .unwrap_or(0)
            .saturating_add(trailing_spaces as u16);

        let visible_line = cursor_line.saturating_sub(self.scroll_offset);
        (
            (origin.0 + cursor_col).min(area.right().saturating_sub(1)),
            origin.1 + visible_line,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        width: 24,
        height: 6,
    };

    #[test]
    fn cursor_at_start_is_origin() {
        let vp = ViewportState::new();
        assert_eq!(vp.screen_pos("", 0, AREA), (2, 1));
    }

    #[test]
    fn cursor_after_trailing_space_counts_it() {
        let vp = ViewportState::new();
        let text = "☐ ";
        assert_eq!(vp.screen_pos(text, text.len(), AREA), (4, 1));
    }

    #[test]
    fn cursor_after_newline_moves_to_next_row() {
        let vp = ViewportState::new();
        let text = "## Title\n";
        assert_eq!(vp.screen_pos(text, text.len(), AREA), (2, 2));
    }

    #[test]
    fn cursor_line_counts_logical_lines() {
        assert_eq!(ViewportState::cursor_line("a\nb\nc", 4, 80), 2);
    }

    #[test]
    fn scroll_follows_cursor_down_and_back_up() {
        let text = "1\n2\n3\n4\n5\n6";
        let mut vp = ViewportState::new();
        vp.scroll_to_cursor(text, text.len(), 80, 3);
        assert_eq!(vp.scroll_offset, 3);
        vp.scroll_to_cursor(text, 0, 80, 3);
        assert_eq!(vp.scroll_offset, 0);
    }

    #[test]
    fn content_that_fits_never_scrolls() {
        let mut vp = ViewportState {
            scroll_offset: 4,
            cursor: None,
        };
        vp.scroll_to_cursor("short", 5, 80, 3);
        assert_eq!(vp.scroll_offset, 0);
    }

    #[test]
    fn invalid_position_does_not_panic() {
        let vp = ViewportState::new();
        // Byte 1 is inside the checkbox glyph.
        let _ = vp.screen_pos("☐ x", 1, AREA);
    }
}
