//! # Preview Component
//!
//! Side pane showing the export rendered back from Markdown, so what you
//! see is what `Ctrl+S` writes. Toggled with `Ctrl+P`; PageUp/PageDown
//! scroll it.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::markdown;

const SCROLL_STEP: u16 = 5;

/// Persistent state for the preview pane.
#[derive(Debug, Default)]
pub struct PreviewState {
    pub scroll: u16,
}

/// Events emitted by the preview pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewEvent {
    Scrolled(u16),
}

impl EventHandler for PreviewState {
    type Event = PreviewEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<PreviewEvent> {
        let next = match event {
            TuiEvent::ScrollPreviewUp => self.scroll.saturating_sub(SCROLL_STEP),
            TuiEvent::ScrollPreviewDown => self.scroll.saturating_add(SCROLL_STEP),
            _ => return None,
        };
        (next != self.scroll).then(|| {
            self.scroll = next;
            PreviewEvent::Scrolled(next)
        })
    }
}

/// Transient render wrapper for the preview pane.
pub struct Preview<'a> {
    markdown: &'a str,
    state: &'a mut PreviewState,
}

impl<'a> Preview<'a> {
    pub fn new(markdown: &'a str, state: &'a mut PreviewState) -> Self {
        Self { markdown, state }
    }
}

impl Component for Preview<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Preview ");
        let body = Paragraph::new(markdown::render(self.markdown, Color::Gray))
            .block(block)
            .wrap(Wrap { trim: false });

        // Wrapped rows minus the two border rows; never scroll past the last one
        let content_rows = (body.line_count(area.width) as u16).saturating_sub(2);
        self.state.scroll = self.state.scroll.min(content_rows.saturating_sub(1));
        let body = body.scroll((self.state.scroll, 0));
        frame.render_widget(body, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_renders_task_glyphs() {
        let mut state = PreviewState::default();
        let mut terminal = Terminal::new(TestBackend::new(30, 8)).unwrap();
        terminal
            .draw(|f| Preview::new("## Title\n\n- [ ] Task", &mut state).render(f, f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Preview"));
        assert!(text.contains("## Title"));
        assert!(text.contains("☐ Task"));
    }

    #[test]
    fn test_page_keys_scroll() {
        let mut state = PreviewState::default();
        assert_eq!(state.handle_event(&TuiEvent::ScrollPreviewUp), None);
        assert_eq!(
            state.handle_event(&TuiEvent::ScrollPreviewDown),
            Some(PreviewEvent::Scrolled(SCROLL_STEP))
        );
        assert_eq!(state.handle_event(&TuiEvent::Resize), None);
    }

    #[test]
    fn test_scroll_clamped_to_content() {
        let mut state = PreviewState { scroll: 50 };
        let mut terminal = Terminal::new(TestBackend::new(30, 8)).unwrap();
        terminal
            .draw(|f| Preview::new("one\n\ntwo", &mut state).render(f, f.area()))
            .unwrap();
        assert_eq!(state.scroll, 2);
    }
}
