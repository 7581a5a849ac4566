//! Pure text wrapping utilities and dimensional constants for the raw editor.
//!
//! These are stateless helpers with no dependency on `RawEditor` or
//! `ViewportState`.

use unicode_width::UnicodeWidthStr;

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Offset from the area's left edge to the first text column (border + padding)
pub(super) const CONTENT_X_OFFSET: u16 = 2;
/// Offset from the area's top edge to the first text row (border)
pub(super) const CONTENT_Y_OFFSET: u16 = 1;

/// Build textwrap options configured for the editor's inner width.
pub(super) fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Calculate the inner content width after subtracting border/padding overhead.
/// Returns 0 if the area is too narrow.
pub(super) fn inner_width(content_width: u16) -> u16 {
    content_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Rows available for text inside an area of the given height.
pub(super) fn visible_rows(area_height: u16) -> u16 {
    area_height.saturating_sub(VERTICAL_OVERHEAD).max(1)
}

/// Count wrapped lines for the given text, accounting for trailing newlines
/// that textwrap may not represent as empty lines.
pub(super) fn wrap_line_count(text: &str, width: u16) -> u16 {
    if width == 0 || text.is_empty() {
        return 1;
    }

    let lines = textwrap::wrap(text, wrap_options(width));
    let mut count = (lines.len() as u16).max(1);

    if text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        count += 1;
    }

    count
}

/// Terminal columns taken by `s`. Checkbox glyphs are one column wide.
pub(super) fn display_width(s: &str) -> u16 {
    u16::try_from(s.width()).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_line_count_empty_string() {
        assert_eq!(wrap_line_count("", 80), 1);
    }

    #[test]
    fn wrap_line_count_zero_width() {
        assert_eq!(wrap_line_count("hello", 0), 1);
    }

    #[test]
    fn wrap_line_count_wraps_long_text() {
        // 10 chars into a 5-wide column -> 2 lines
        assert_eq!(wrap_line_count("aaaaaaaaaa", 5), 2);
    }

    #[test]
    fn wrap_line_count_trailing_newline_adds_line() {
        assert_eq!(wrap_line_count("☐ task\n", 80), 2);
    }

    #[test]
    fn wrap_line_count_explicit_newlines() {
        assert_eq!(wrap_line_count("## a\n☐ b\nc", 80), 3);
    }

    #[test]
    fn inner_width_saturates() {
        assert_eq!(inner_width(3), 0);
        assert_eq!(inner_width(20), 16);
    }

    #[test]
    fn visible_rows_never_zero() {
        assert_eq!(visible_rows(1), 1);
        assert_eq!(visible_rows(10), 8);
    }

    #[test]
    fn display_width_counts_columns_not_bytes() {
        assert_eq!(display_width("☐ x"), 3);
        assert_eq!(display_width("café"), 4);
    }
}
