//! # Suggestion Menu
//!
//! The slash-command menu as an explicit state machine instead of loose
//! `open` / `selected` flags.
//!
//! ```text
//!            Filter (matches)                 Next / Previous
//!   Closed ───────────────────▶ Open ◀──────────────────────┐
//!     ▲                          │  └───────────────────────┘
//!     │   Filter (no match)      │
//!     └──── Dismiss / Commit ────┘
//! ```
//!
//! `transition` is the only way the state changes. Renderers read a
//! `MenuView`, never the enum itself.

use crate::core::trigger::{self, Trigger};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SuggestionMenu {
    #[default]
    Closed,
    Open {
        items: Vec<&'static Trigger>,
        selected: usize,
        /// Offset of the start of the line the `/` was typed on.
        anchor: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuEvent<'a> {
    /// Text changed: `line` is the current line up to the cursor.
    Filter { line: &'a str, anchor: usize },
    Next,
    Previous,
    /// Jump straight to an item (clamped to the list).
    Select(usize),
    Dismiss,
}

impl SuggestionMenu {
    pub fn transition(self, event: MenuEvent<'_>) -> SuggestionMenu {
        match (self, event) {
            (previous, MenuEvent::Filter { line, anchor }) => {
                let items = trigger::matching(line);
                if items.is_empty() {
                    return SuggestionMenu::Closed;
                }
                let selected = match previous {
                    SuggestionMenu::Open {
                        items: old, selected, ..
                    } if old == items => selected,
                    _ => 0,
                };
                SuggestionMenu::Open {
                    items,
                    selected,
                    anchor,
                }
            }
            (SuggestionMenu::Open { items, selected, anchor }, MenuEvent::Next) => {
                let selected = (selected + 1) % items.len();
                SuggestionMenu::Open {
                    items,
                    selected,
                    anchor,
                }
            }
            (SuggestionMenu::Open { items, selected, anchor }, MenuEvent::Previous) => {
                let selected = (selected + items.len() - 1) % items.len();
                SuggestionMenu::Open {
                    items,
                    selected,
                    anchor,
                }
            }
            (SuggestionMenu::Open { items, anchor, .. }, MenuEvent::Select(index)) => {
                let selected = index.min(items.len() - 1);
                SuggestionMenu::Open {
                    items,
                    selected,
                    anchor,
                }
            }
            (_, MenuEvent::Dismiss) => SuggestionMenu::Closed,
            (closed, _) => closed,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, SuggestionMenu::Open { .. })
    }

    /// Currently highlighted trigger, if the menu is open.
    pub fn selected(&self) -> Option<&'static Trigger> {
        match self {
            SuggestionMenu::Open {
                items, selected, ..
            } => items.get(*selected).copied(),
            SuggestionMenu::Closed => None,
        }
    }

    pub fn view(&self) -> MenuView {
        match self {
            SuggestionMenu::Closed => MenuView::default(),
            SuggestionMenu::Open {
                items,
                selected,
                anchor,
            } => MenuView {
                is_open: true,
                items: items
                    .iter()
                    .map(|t| MenuItem {
                        trigger: t.key,
                        label: t.label,
                        description: t.description,
                    })
                    .collect(),
                selected_index: *selected,
                anchor: *anchor,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub trigger: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

/// Read-only snapshot handed to whatever draws the menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuView {
    pub is_open: bool,
    pub items: Vec<MenuItem>,
    pub selected_index: usize,
    pub anchor: usize,
}
