//! # Suggestion Popup Component
//!
//! Floating list of slash commands drawn just under the cursor row while the
//! core menu is open. It owns no state: the core `MenuView` says what is
//! listed and which item is highlighted, and arrow/Enter/Escape handling
//! stays in the core.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState};

use crate::core::suggestion::MenuView;

const MAX_WIDTH: u16 = 44;
const TRIGGER_COLUMN: usize = 7;

/// Transient render wrapper for the open menu.
pub struct SuggestionPopup<'a> {
    view: &'a MenuView,
    /// Screen cell of the text cursor
    cursor: (u16, u16),
}

impl<'a> SuggestionPopup<'a> {
    pub fn new(view: &'a MenuView, cursor: (u16, u16)) -> Self {
        Self { view, cursor }
    }

    /// Rect for the popup inside `bounds`: below the cursor row if it fits,
    /// above it otherwise, shifted left to stay on screen.
    pub fn placement(&self, bounds: Rect) -> Rect {
        let height = (self.view.items.len() as u16 + 2).min(bounds.height);
        let width = MAX_WIDTH.min(bounds.width);
        let (col, row) = self.cursor;

        let below = row.saturating_add(1);
        let y = if below + height <= bounds.bottom() {
            below
        } else {
            row.saturating_sub(height).max(bounds.y)
        };
        let x = col.min(bounds.right().saturating_sub(width)).max(bounds.x);
        Rect::new(x, y, width, height)
    }

    pub fn render(&mut self, frame: &mut Frame, bounds: Rect) {
        if !self.view.is_open || self.view.items.is_empty() {
            return;
        }
        let area = self.placement(bounds);

        // Clear underlying content
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Commands ");

        let inner_width = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = self
            .view
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let style = if i == self.view.selected_index {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let trigger = format!("{:<width$}", item.trigger, width = TRIGGER_COLUMN);
                let rest = inner_width.saturating_sub(TRIGGER_COLUMN);
                let label = truncate_str(&format!("{}  {}", item.label, item.description), rest);
                ListItem::new(Line::from(vec![
                    Span::styled(
                        trigger,
                        if i == self.view.selected_index {
                            style
                        } else {
                            Style::default().fg(Color::Cyan)
                        },
                    ),
                    Span::styled(format!("{label:<rest$}"), style),
                ]))
            })
            .collect();

        let mut list_state = ListState::default().with_selected(Some(self.view.selected_index));
        frame.render_stateful_widget(List::new(items).block(block), area, &mut list_state);
    }
}

/// Truncate a string to fit within `max_width` chars, adding "..." if needed.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        ".".repeat(max_width)
    } else {
        let kept: String = s.chars().take(max_width - 3).collect();
        format!("{kept}...")
    }
}
