//! Slash-command triggers.
//!
//! The table is static and ordered; the order is the menu order and the
//! order `ArrowUp`/`ArrowDown` cycle through.

use crate::core::document::{BlockKind, HeadingLevel};

pub const CHECKBOX_UNCHECKED: char = '☐';
pub const CHECKBOX_CHECKED: char = '☑';

#[derive(Debug, PartialEq, Eq)]
pub struct Trigger {
    /// What the user types, e.g. `/todo`.
    pub key: &'static str,
    /// Text that replaces the key in raw mode.
    pub replacement: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    /// Kind the focused block becomes in block mode.
    pub kind: BlockKind,
}

pub static TRIGGERS: [Trigger; 4] = [
    Trigger {
        key: "/todo",
        replacement: "☐ ",
        label: "To-do",
        description: "Checklist item with a checkbox",
        kind: BlockKind::ChecklistItem { checked: false },
    },
    Trigger {
        key: "/h1",
        replacement: "# ",
        label: "Heading 1",
        description: "Large section heading",
        kind: BlockKind::Heading {
            level: HeadingLevel::H1,
        },
    },
    Trigger {
        key: "/h2",
        replacement: "## ",
        label: "Heading 2",
        description: "Medium section heading",
        kind: BlockKind::Heading {
            level: HeadingLevel::H2,
        },
    },
    Trigger {
        key: "/h3",
        replacement: "### ",
        label: "Heading 3",
        description: "Small section heading",
        kind: BlockKind::Heading {
            level: HeadingLevel::H3,
        },
    },
];

/// Trigger whose key equals `line` exactly. No prefix or fuzzy matching:
/// `/todo x` matches nothing.
pub fn find_exact(line: &str) -> Option<&'static Trigger> {
    TRIGGERS.iter().find(|t| t.key == line)
}

/// Triggers whose key starts with `prefix`, in table order.
/// Empty unless `prefix` itself starts with `/`.
pub fn matching(prefix: &str) -> Vec<&'static Trigger> {
    if !prefix.starts_with('/') {
        return Vec::new();
    }
    TRIGGERS.iter().filter(|t| t.key.starts_with(prefix)).collect()
}
