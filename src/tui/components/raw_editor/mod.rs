//! # RawEditor Component
//!
//! Draws the raw-mode buffer: wrapped text filling the body, the cursor,
//! and a scrollbar once the text outgrows the viewport.
//!
//! The text and selection are props (owned by the core `TextState`). Scroll
//! offset and the last cursor position live in `ViewportState`, which
//! persists in `TuiState` between frames.

mod cursor;
mod text_wrap;

pub use cursor::ViewportState;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{
    Block, BorderType, Padding, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};

use crate::core::text::TextState;
use crate::tui::component::Component;

use text_wrap::{inner_width, visible_rows, wrap_line_count, wrap_options};

/// Transient render wrapper for the raw buffer.
pub struct RawEditor<'a> {
    state: &'a TextState,
    viewport: &'a mut ViewportState,
}

impl<'a> RawEditor<'a> {
    pub fn new(state: &'a TextState, viewport: &'a mut ViewportState) -> Self {
        Self { state, viewport }
    }

    /// The wrapped lines currently scrolled into view.
    fn visible_text(&self, area: Rect) -> String {
        let width = inner_width(area.width);
        if width == 0 {
            return String::new();
        }

        let lines = textwrap::wrap(&self.state.text, wrap_options(width));
        let start = (self.viewport.scroll_offset as usize).min(lines.len());
        let end = (start + visible_rows(area.height) as usize).min(lines.len());
        lines[start..end].join("\n")
    }

    fn title(&self) -> String {
        let selection = self.state.selection;
        if selection.is_empty() {
            " Raw ".to_string()
        } else {
            let selected = self.state.selected_text().chars().count();
            format!(" Raw | {selected} selected ")
        }
    }

    fn render_scrollbar(&self, frame: &mut Frame, area: Rect) {
        let total_lines = wrap_line_count(&self.state.text, inner_width(area.width));
        let visible = visible_rows(area.height);
        if total_lines <= visible {
            return;
        }

        // ScrollbarState content_length is max scrollable position, not total items
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(total_lines.saturating_sub(visible) as usize)
            .position(self.viewport.scroll_offset as usize);

        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }
}

impl Component for RawEditor<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let text = &self.state.text;
        let pos = self.state.cursor();
        self.viewport
            .scroll_to_cursor(text, pos, area.width, visible_rows(area.height));

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(self.title())
            .padding(Padding::horizontal(1));

        let body = Paragraph::new(self.visible_text(area))
            .block(block)
            .style(Style::default().fg(Color::White));

        frame.render_widget(body, area);
        self.render_scrollbar(frame, area);

        self.viewport.cursor = Some(self.viewport.screen_pos(text, pos, area));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(state: &TextState, viewport: &mut ViewportState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| RawEditor::new(state, viewport).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_renders_text_and_records_cursor() {
        let state = TextState::new("## Title\n☐ Task");
        let mut viewport = ViewportState::new();
        let screen = draw(&state, &mut viewport, 30, 6);
        assert!(screen.contains("## Title"));
        assert!(screen.contains("☐ Task"));
        assert_eq!(viewport.cursor, Some((8, 2)));
    }

    #[test]
    fn test_title_shows_selection_size() {
        let state = TextState::with_selection("hello world", 0, 5);
        let mut viewport = ViewportState::new();
        let screen = draw(&state, &mut viewport, 30, 4);
        assert!(screen.contains("5 selected"));
    }

    #[test]
    fn test_long_buffer_scrolls_to_cursor() {
        let text: String = (1..=20).map(|i| format!("line {i}\n")).collect();
        let state = TextState::new(text.trim_end());
        let mut viewport = ViewportState::new();
        let screen = draw(&state, &mut viewport, 30, 6);
        assert!(screen.contains("line 20"));
        assert!(!screen.contains("line 1 "));
        assert!(viewport.scroll_offset > 0);
    }
}
