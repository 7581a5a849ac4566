//! # TitleBar Component
//!
//! Top status bar: which surface is open, whether the document is saved,
//! and the latest status message.
//!
//! Stateless and props-in-struct, so it can be driven through the
//! `Component` trait like everything else:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(app.mode(), app.dirty, app.saved_at, app.status_message.clone());
//! title_bar.render(frame, title_area);
//! ```
//!
//! The save indicator reads, in priority order:
//!
//! 1. **Dirty**: `● unsaved`
//! 2. **Saved this session**: `saved 14:02:11` (local time)
//! 3. **Nothing yet**: omitted

use chrono::{DateTime, Local, Utc};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::Mode;
use crate::tui::component::Component;

pub struct TitleBar {
    pub mode: Mode,
    /// Content changed since the last successful save
    pub dirty: bool,
    pub saved_at: Option<DateTime<Utc>>,
    pub status_message: String,
}

impl TitleBar {
    pub fn new(
        mode: Mode,
        dirty: bool,
        saved_at: Option<DateTime<Utc>>,
        status_message: String,
    ) -> Self {
        Self {
            mode,
            dirty,
            saved_at,
            status_message,
        }
    }

    fn save_indicator(&self) -> Option<Span<'static>> {
        if self.dirty {
            Some(Span::styled("● unsaved", Style::default().fg(Color::Yellow)))
        } else {
            self.saved_at.map(|t| {
                Span::styled(
                    format!("saved {}", t.with_timezone(&Local).format("%H:%M:%S")),
                    Style::default().fg(Color::Green),
                )
            })
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let sep = || Span::styled(" | ", Style::default().fg(Color::DarkGray));
        let mut spans = vec![
            Span::styled("Blackboard", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" [{}]", self.mode.label())),
        ];
        if let Some(indicator) = self.save_indicator() {
            spans.push(sep());
            spans.push(indicator);
        }
        if !self.status_message.is_empty() {
            spans.push(sep());
            spans.push(Span::raw(self.status_message.clone()));
        }
        frame.render_widget(Line::from(spans), area);
    }
}
