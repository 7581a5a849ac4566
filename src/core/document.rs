//! # Document Model
//!
//! A document is an ordered list of typed blocks. Each block carries styled
//! inline spans and its own ordered children, so the whole thing is a strict
//! tree (ownership rules out cycles).
//!
//! ```text
//! Document
//! └── blocks: Vec<Block>
//!     ├── kind: BlockKind          // heading, paragraph, list items...
//!     ├── content: Vec<InlineSpan> // text runs + bold/italic/underline
//!     └── children: Vec<Block>     // nested blocks, unbounded depth
//! ```
//!
//! Blocks are addressed by a `BlockPath`: the index at each level from the
//! root down, e.g. `[2, 0]` is the first child of the third top-level block.
//!
//! The serde shape is the persisted JSON form:
//! `{"type": "heading", "level": 2, "content": [...], "children": [...]}`.

use serde::{Deserialize, Serialize};

use crate::core::trigger::{CHECKBOX_CHECKED, CHECKBOX_UNCHECKED};

/// Index path from the document root to a block.
pub type BlockPath = Vec<usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn depth(self) -> usize {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(HeadingLevel::H1),
            2 => Ok(HeadingLevel::H2),
            3 => Ok(HeadingLevel::H3),
            other => Err(format!("heading level must be 1-3, got {other}")),
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.depth() as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockKind {
    Heading {
        level: HeadingLevel,
    },
    Paragraph,
    BulletItem,
    NumberedItem,
    ChecklistItem {
        #[serde(default)]
        checked: bool,
    },
    /// Any block type this build does not know. Kept so stored documents
    /// written by richer editors still load.
    #[serde(other)]
    Other,
}

impl BlockKind {
    /// Kind of the block that Enter splits off this one. List kinds carry
    /// on (checklists start unchecked); anything else becomes a paragraph.
    pub fn continuation(self) -> BlockKind {
        match self {
            BlockKind::ChecklistItem { .. } => BlockKind::ChecklistItem { checked: false },
            BlockKind::BulletItem | BlockKind::NumberedItem => self,
            _ => BlockKind::Paragraph,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Styles {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// Which style flag a chord or command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Bold,
    Italic,
    Underline,
}

impl Styles {
    pub fn has(&self, style: Style) -> bool {
        match style {
            Style::Bold => self.bold,
            Style::Italic => self.italic,
            Style::Underline => self.underline,
        }
    }

    pub fn set(&mut self, style: Style, on: bool) {
        match style {
            Style::Bold => self.bold = on,
            Style::Italic => self.italic = on,
            Style::Underline => self.underline = on,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineSpan {
    pub text: String,
    #[serde(default)]
    pub styles: Styles,
}

impl InlineSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            styles: Styles::default(),
        }
    }

    pub fn styled(text: impl Into<String>, styles: Styles) -> Self {
        Self {
            text: text.into(),
            styles,
        }
    }

    /// Length in characters (the unit structured offsets are counted in).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(flatten)]
    pub kind: BlockKind,
    #[serde(default)]
    pub content: Vec<InlineSpan>,
    #[serde(default)]
    pub children: Vec<Block>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            content: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Block with a single unstyled span (no span at all for empty text).
    pub fn with_text(kind: BlockKind, text: &str) -> Self {
        let content = if text.is_empty() {
            Vec::new()
        } else {
            vec![InlineSpan::plain(text)]
        };
        Self {
            kind,
            content,
            children: Vec::new(),
        }
    }

    pub fn paragraph(text: &str) -> Self {
        Self::with_text(BlockKind::Paragraph, text)
    }

    pub fn child(mut self, block: Block) -> Self {
        self.children.push(block);
        self
    }

    /// Concatenated text of all spans, styles ignored.
    pub fn plain_text(&self) -> String {
        self.content.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn char_len(&self) -> usize {
        self.content.iter().map(InlineSpan::char_len).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Fresh session document: one empty paragraph.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::new(BlockKind::Paragraph)],
        }
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Lift raw editor text into blocks, one block per non-blank line.
    ///
    /// `# `, `## ` and `### ` prefixes become headings; every other line is a
    /// paragraph holding the line verbatim, so checkbox glyphs and inline
    /// delimiters typed in raw mode survive export unchanged.
    pub fn from_raw_text(text: &str) -> Self {
        let blocks: Vec<Block> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| match heading_prefix(line) {
                Some((level, rest)) => Block::with_text(BlockKind::Heading { level }, rest),
                None => Block::paragraph(line),
            })
            .collect();
        if blocks.is_empty() {
            Self::new()
        } else {
            Self { blocks }
        }
    }

    /// Lift raw editor text for editing as blocks.
    ///
    /// Unlike [`Document::from_raw_text`] this reads list markers back:
    /// `☐ `/`☑ ` lines become checklist items, `- ` bullets and `N. `
    /// numbered items. Every two leading spaces nest a line one level under
    /// the block above it.
    pub fn from_editor_text(text: &str) -> Self {
        let mut blocks = Vec::new();
        for line in text.lines().filter(|line| !line.trim().is_empty()) {
            let body = line.trim_start_matches(' ');
            let depth = (line.len() - body.len()) / 2;
            let block = match heading_prefix(line) {
                Some((level, rest)) => Block::with_text(BlockKind::Heading { level }, rest),
                None => list_item(body).unwrap_or_else(|| Block::paragraph(body)),
            };
            push_at_depth(&mut blocks, block, depth);
        }
        if blocks.is_empty() {
            Self::new()
        } else {
            Self { blocks }
        }
    }

    pub fn block(&self, path: &[usize]) -> Option<&Block> {
        let (first, rest) = path.split_first()?;
        let mut block = self.blocks.get(*first)?;
        for idx in rest {
            block = block.children.get(*idx)?;
        }
        Some(block)
    }

    pub fn block_mut(&mut self, path: &[usize]) -> Option<&mut Block> {
        let (first, rest) = path.split_first()?;
        let mut block = self.blocks.get_mut(*first)?;
        for idx in rest {
            block = block.children.get_mut(*idx)?;
        }
        Some(block)
    }

    /// The sibling list a path points into, and the index within it.
    pub fn siblings_mut(&mut self, path: &[usize]) -> Option<(&mut Vec<Block>, usize)> {
        let (last, parent) = path.split_last()?;
        let list = if parent.is_empty() {
            &mut self.blocks
        } else {
            &mut self.block_mut(parent)?.children
        };
        (*last < list.len()).then_some((list, *last))
    }

    /// Paths of every block in pre-order (the order they appear on screen).
    pub fn visual_order(&self) -> Vec<BlockPath> {
        fn walk(blocks: &[Block], prefix: &mut BlockPath, out: &mut Vec<BlockPath>) {
            for (i, block) in blocks.iter().enumerate() {
                prefix.push(i);
                out.push(prefix.clone());
                walk(&block.children, prefix, out);
                prefix.pop();
            }
        }
        let mut out = Vec::new();
        walk(&self.blocks, &mut Vec::new(), &mut out);
        out
    }
}

fn list_item(line: &str) -> Option<Block> {
    let mut chars = line.chars();
    let checked = match chars.next()? {
        CHECKBOX_UNCHECKED => false,
        CHECKBOX_CHECKED => true,
        _ => {
            if let Some(rest) = line.strip_prefix("- ") {
                return Some(Block::with_text(BlockKind::BulletItem, rest));
            }
            let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            let rest = line[digits..].strip_prefix(". ").filter(|_| digits > 0)?;
            return Some(Block::with_text(BlockKind::NumberedItem, rest));
        }
    };
    let rest = chars.as_str();
    Some(Block::with_text(
        BlockKind::ChecklistItem { checked },
        rest.strip_prefix(' ').unwrap_or(rest),
    ))
}

/// Append `block` `depth` levels down the last-child chain, or as deep as
/// that chain goes.
fn push_at_depth(siblings: &mut Vec<Block>, block: Block, depth: usize) {
    match siblings.last_mut() {
        Some(parent) if depth > 0 => push_at_depth(&mut parent.children, block, depth - 1),
        _ => siblings.push(block),
    }
}

fn heading_prefix(line: &str) -> Option<(HeadingLevel, &str)> {
    [
        ("### ", HeadingLevel::H3),
        ("## ", HeadingLevel::H2),
        ("# ", HeadingLevel::H1),
    ]
    .into_iter()
    .find_map(|(prefix, level)| line.strip_prefix(prefix).map(|rest| (level, rest)))
}
