//! # BlockView Component
//!
//! Draws the block tree one row per block: indentation for nesting, a
//! prefix for the block kind, then its spans with their styles applied.
//! The selection inside the focused block is shown reversed.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{self, BorderType, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::blocks::BlockEditor;
use crate::core::document::{Block, BlockKind, HeadingLevel, Styles};
use crate::core::text::Selection;
use crate::core::trigger::{CHECKBOX_CHECKED, CHECKBOX_UNCHECKED};
use crate::tui::component::Component;

const INDENT: &str = "  ";
/// Border + padding on the left, border on top.
const CONTENT_X_OFFSET: u16 = 2;
const CONTENT_Y_OFFSET: u16 = 1;

/// Scroll state that persists between frames.
#[derive(Debug, Default)]
pub struct BlockViewState {
    pub scroll_offset: u16,
    /// Cursor position in screen coordinates from the last render
    pub cursor: Option<(u16, u16)>,
}

/// Transient render wrapper for the block editor.
pub struct BlockView<'a> {
    editor: &'a BlockEditor,
    state: &'a mut BlockViewState,
}

impl<'a> BlockView<'a> {
    pub fn new(editor: &'a BlockEditor, state: &'a mut BlockViewState) -> Self {
        Self { editor, state }
    }
}

/// Marker drawn before a block's text.
pub fn kind_prefix(kind: BlockKind) -> String {
    match kind {
        BlockKind::Heading { level } => format!("{} ", "#".repeat(level.depth())),
        BlockKind::BulletItem => "• ".to_string(),
        BlockKind::NumberedItem => "1. ".to_string(),
        BlockKind::ChecklistItem { checked: false } => format!("{CHECKBOX_UNCHECKED} "),
        BlockKind::ChecklistItem { checked: true } => format!("{CHECKBOX_CHECKED} "),
        BlockKind::Paragraph | BlockKind::Other => String::new(),
    }
}

fn base_style(kind: BlockKind) -> Style {
    match kind {
        BlockKind::Heading {
            level: HeadingLevel::H1,
        } => Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        BlockKind::Heading { .. } => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        BlockKind::ChecklistItem { checked: true } => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT),
        _ => Style::default().fg(Color::Gray),
    }
}

fn span_style(base: Style, styles: Styles) -> Style {
    let mut style = base;
    if styles.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if styles.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if styles.underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    style
}

/// One screen row for `block`. `selection` is given only for the focused block.
fn block_line(block: &Block, depth: usize, selection: Option<Selection>) -> Line<'static> {
    let base = base_style(block.kind);
    let mut spans = vec![
        Span::raw(INDENT.repeat(depth)),
        Span::styled(kind_prefix(block.kind), Style::default().fg(Color::DarkGray)),
    ];

    let mut offset = 0;
    for span in &block.content {
        let style = span_style(base, span.styles);
        let len = span.char_len();
        match selection {
            Some(sel) if sel.start < sel.end && sel.start < offset + len && sel.end > offset => {
                // Split the span into before / selected / after pieces.
                let from = sel.start.saturating_sub(offset);
                let to = (sel.end - offset).min(len);
                let chars: Vec<char> = span.text.chars().collect();
                let piece = |a: usize, b: usize| chars[a..b].iter().collect::<String>();
                if from > 0 {
                    spans.push(Span::styled(piece(0, from), style));
                }
                spans.push(Span::styled(
                    piece(from, to),
                    style.add_modifier(Modifier::REVERSED),
                ));
                if to < len {
                    spans.push(Span::styled(piece(to, len), style));
                }
            }
            _ => spans.push(Span::styled(span.text.clone(), style)),
        }
        offset += len;
    }
    Line::from(spans)
}

impl Component for BlockView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let document = self.editor.document();
        let focus = self.editor.focus();
        let selection = self.editor.selection();

        let order = document.visual_order();
        let mut focused_row = 0;
        let mut cursor_col = 0;
        let lines: Vec<Line> = order
            .iter()
            .enumerate()
            .filter_map(|(row, path)| {
                let block = document.block(path)?;
                let depth = path.len().saturating_sub(1);
                let is_focused = path.as_slice() == focus;
                if is_focused {
                    focused_row = row;
                    let text_before: String =
                        block.plain_text().chars().take(selection.start).collect();
                    cursor_col = INDENT.repeat(depth).width()
                        + kind_prefix(block.kind).width()
                        + text_before.width();
                }
                Some(block_line(block, depth, is_focused.then_some(selection)))
            })
            .collect();

        // Keep the focused row in view
        let visible = area.height.saturating_sub(2).max(1);
        let row = u16::try_from(focused_row).unwrap_or(u16::MAX);
        if row < self.state.scroll_offset {
            self.state.scroll_offset = row;
        } else if row >= self.state.scroll_offset + visible {
            self.state.scroll_offset = row - visible + 1;
        }

        let title = if selection.is_empty() {
            " Blocks ".to_string()
        } else {
            format!(" Blocks | {} selected ", selection.end.saturating_sub(selection.start))
        };
        let frame_block = widgets::Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title)
            .padding(Padding::horizontal(1));

        let body = Paragraph::new(lines)
            .block(frame_block)
            .scroll((self.state.scroll_offset, 0));
        frame.render_widget(body, area);

        let col = u16::try_from(cursor_col).unwrap_or(u16::MAX);
        self.state.cursor = Some((
            (area.x + CONTENT_X_OFFSET)
                .saturating_add(col)
                .min(area.right().saturating_sub(2)),
            area.y + CONTENT_Y_OFFSET + (row - self.state.scroll_offset),
        ));
    }
}
