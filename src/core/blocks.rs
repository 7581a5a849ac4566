//! # Block Editor (structured variant)
//!
//! The same command rules as the raw engine, applied to a tree of typed
//! blocks instead of one flat string.
//!
//! ```text
//! BlockEditor
//! ├── document: Document     // the block tree being edited
//! ├── focus: BlockPath       // which block the cursor is in
//! ├── selection: Selection   // char offsets into the focused block's text
//! └── menu: SuggestionMenu   // slash-command menu
//! ```
//!
//! All text edits go through [`OffsetMap`]: an absolute offset into the
//! block's flattened text is turned into a `(span, local)` position before
//! anything is cut, and span lists are rebuilt on a copy that only replaces
//! the original once every lookup succeeded.

use log::{debug, warn};

use crate::core::document::{Block, BlockKind, BlockPath, Document, InlineSpan, Style};
use crate::core::engine::{KeyOutcome, chord_style, is_toggle_chord};
use crate::core::error::EditorError;
use crate::core::key::{Key, KeyInput};
use crate::core::offset_map::{OffsetMap, byte_index};
use crate::core::suggestion::{MenuEvent, MenuView, SuggestionMenu};
use crate::core::text::{ActiveEnd, Selection};
use crate::core::trigger::{self, Trigger};

// ============================================================================
// Span list operations
// ============================================================================

/// Cut the span list so a boundary sits exactly at `offset`. Returns the index
/// of the first span starting at or after `offset`.
fn split_spans_at(spans: &mut Vec<InlineSpan>, offset: usize) -> Result<usize, EditorError> {
    if spans.is_empty() && offset == 0 {
        return Ok(0);
    }
    let pos = OffsetMap::from_spans(spans).locate(offset)?;
    let span = &spans[pos.node];
    if pos.offset == 0 {
        return Ok(pos.node);
    }
    if pos.offset == span.char_len() {
        return Ok(pos.node + 1);
    }
    let cut = byte_index(&span.text, pos.offset);
    let tail = InlineSpan::styled(&span.text[cut..], span.styles);
    spans[pos.node].text.truncate(cut);
    spans.insert(pos.node + 1, tail);
    Ok(pos.node + 1)
}

/// Drop empty spans and merge neighbours with identical styles.
fn normalize(spans: Vec<InlineSpan>) -> Vec<InlineSpan> {
    let mut out: Vec<InlineSpan> = Vec::with_capacity(spans.len());
    for span in spans.into_iter().filter(|s| !s.text.is_empty()) {
        match out.last_mut() {
            Some(last) if last.styles == span.styles => last.text.push_str(&span.text),
            _ => out.push(span),
        }
    }
    out
}

/// Both ends are mapped up front so a bad range fails before any cut.
fn check_range(spans: &[InlineSpan], start: usize, end: usize) -> Result<(), EditorError> {
    if spans.is_empty() && start == 0 && end == 0 {
        return Ok(());
    }
    OffsetMap::from_spans(spans).locate_range(start, end).map(|_| ())
}

pub fn delete_range(
    spans: &[InlineSpan],
    start: usize,
    end: usize,
) -> Result<Vec<InlineSpan>, EditorError> {
    check_range(spans, start, end)?;
    let mut out = spans.to_vec();
    let first = split_spans_at(&mut out, start)?;
    let last = split_spans_at(&mut out, end)?;
    out.drain(first..last);
    Ok(normalize(out))
}

/// Insert at `offset`, inheriting the styles of the span the offset maps to.
pub fn insert_text(
    spans: &[InlineSpan],
    offset: usize,
    text: &str,
) -> Result<Vec<InlineSpan>, EditorError> {
    if spans.is_empty() {
        if offset != 0 {
            return Err(EditorError::UnmappableOffset { offset, len: 0 });
        }
        return Ok(normalize(vec![InlineSpan::plain(text)]));
    }
    let pos = OffsetMap::from_spans(spans).locate(offset)?;
    let mut out = spans.to_vec();
    let span = &mut out[pos.node];
    let at = byte_index(&span.text, pos.offset);
    span.text.insert_str(at, text);
    Ok(normalize(out))
}

/// Set `style` on every run in `start..end`, or clear it if every run
/// already has it.
pub fn toggle_style(
    spans: &[InlineSpan],
    start: usize,
    end: usize,
    style: Style,
) -> Result<Vec<InlineSpan>, EditorError> {
    check_range(spans, start, end)?;
    let mut out = spans.to_vec();
    let first = split_spans_at(&mut out, start)?;
    let last = split_spans_at(&mut out, end)?;
    let on = !out[first..last].iter().all(|s| s.styles.has(style));
    for span in &mut out[first..last] {
        span.styles.set(style, on);
    }
    Ok(normalize(out))
}

/// Split into the runs before and after `offset`.
pub fn split_at(
    spans: &[InlineSpan],
    offset: usize,
) -> Result<(Vec<InlineSpan>, Vec<InlineSpan>), EditorError> {
    check_range(spans, offset, offset)?;
    let mut head = spans.to_vec();
    let at = split_spans_at(&mut head, offset)?;
    let tail = head.split_off(at);
    Ok((normalize(head), normalize(tail)))
}

// ============================================================================
// Editor
// ============================================================================

#[derive(Debug)]
pub struct BlockEditor {
    document: Document,
    focus: BlockPath,
    selection: Selection,
    /// End of a non-empty selection that Shift+arrows move.
    active: ActiveEnd,
    menu: SuggestionMenu,
}

impl Default for BlockEditor {
    fn default() -> Self {
        Self::new(Document::new())
    }
}

impl BlockEditor {
    /// Focus starts at the end of the first block.
    pub fn new(mut document: Document) -> Self {
        if document.blocks.is_empty() {
            document = Document::new();
        }
        let len = document.blocks[0].char_len();
        Self {
            document,
            focus: vec![0],
            selection: Selection::collapsed(len),
            active: ActiveEnd::End,
            menu: SuggestionMenu::Closed,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn focus(&self) -> &[usize] {
        &self.focus
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn menu(&self) -> MenuView {
        self.menu.view()
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu.is_open()
    }

    /// Move focus and selection. Invalid targets are accepted here and
    /// rejected when the next key arrives.
    pub fn set_cursor(&mut self, focus: BlockPath, selection: Selection) {
        self.focus = focus;
        self.selection = selection;
        self.active = ActiveEnd::End;
    }

    fn focused(&self) -> Result<&Block, EditorError> {
        let block = self.document.block(&self.focus).ok_or_else(|| {
            EditorError::AmbiguousCursorContext(format!("no block at {:?}", self.focus))
        })?;
        let Selection { start, end } = self.selection;
        if start > end || end > block.char_len() {
            return Err(EditorError::AmbiguousCursorContext(format!(
                "selection {start}..{end} outside block of length {}",
                block.char_len()
            )));
        }
        Ok(block)
    }

    fn focused_mut(&mut self) -> Result<&mut Block, EditorError> {
        self.focused()?;
        self.document.block_mut(&self.focus).ok_or_else(|| {
            EditorError::AmbiguousCursorContext(format!("no block at {:?}", self.focus))
        })
    }

    /// Text of the focused block up to the cursor.
    pub fn line_before_cursor(&self) -> Result<String, EditorError> {
        let block = self.focused()?;
        Ok(block.plain_text().chars().take(self.selection.start).collect())
    }

    // ── Command rules ───────────────────────────────────────────────────

    pub fn handle_key(&mut self, input: &KeyInput) -> KeyOutcome {
        let line = match self.line_before_cursor() {
            Ok(line) => line,
            Err(e) => {
                debug!("Passing {:?} through: {}", input.key, e);
                return KeyOutcome::PassThrough;
            }
        };

        if self.menu.is_open() {
            return self.handle_menu_key(input);
        }

        if is_toggle_chord(input) {
            return self.toggle_checked();
        }

        if input.is_activation()
            && let Some(t) = trigger::find_exact(&line)
        {
            return self.apply_trigger(t);
        }

        if input.key == Key::Enter
            && !input.has_platform_modifier()
            && matches!(self.focused().map(|b| b.kind), Ok(BlockKind::ChecklistItem { .. }))
        {
            return self.split_focused(Some(BlockKind::ChecklistItem { checked: false }));
        }

        if let Some(style) = chord_style(input) {
            return self.apply_style(style);
        }

        KeyOutcome::PassThrough
    }

    fn handle_menu_key(&mut self, input: &KeyInput) -> KeyOutcome {
        if input.has_platform_modifier() {
            return KeyOutcome::PassThrough;
        }
        let event = match input.key {
            Key::Down => MenuEvent::Next,
            Key::Up => MenuEvent::Previous,
            Key::Escape => MenuEvent::Dismiss,
            Key::Enter | Key::Char(' ') => {
                let Some(t) = self.menu.selected() else {
                    return KeyOutcome::PassThrough;
                };
                self.menu = SuggestionMenu::Closed;
                return self.apply_trigger(t);
            }
            _ => return KeyOutcome::PassThrough,
        };
        self.menu = std::mem::take(&mut self.menu).transition(event);
        KeyOutcome::Intercepted
    }

    /// Remove the typed command and convert the block's kind.
    fn apply_trigger(&mut self, t: &Trigger) -> KeyOutcome {
        let end = self.selection.end;
        let result = self
            .focused_mut()
            .and_then(|block| Ok((delete_range(&block.content, 0, end)?, block)));
        match result {
            Ok((content, block)) => {
                debug!("Block converted by {}", t.key);
                block.content = content;
                block.kind = t.kind;
                self.selection = Selection::collapsed(0);
                KeyOutcome::Edited
            }
            Err(e) => {
                warn!("Trigger {} aborted: {}", t.key, e);
                KeyOutcome::Intercepted
            }
        }
    }

    fn toggle_checked(&mut self) -> KeyOutcome {
        match self.focused_mut() {
            Ok(Block {
                kind: BlockKind::ChecklistItem { checked },
                ..
            }) => {
                *checked = !*checked;
                KeyOutcome::Edited
            }
            _ => KeyOutcome::Intercepted,
        }
    }

    fn apply_style(&mut self, style: Style) -> KeyOutcome {
        if self.selection.is_empty() {
            return KeyOutcome::Intercepted;
        }
        let Selection { start, end } = self.selection;
        let result = self
            .focused_mut()
            .and_then(|block| Ok((toggle_style(&block.content, start, end, style)?, block)));
        match result {
            Ok((content, block)) => {
                block.content = content;
                KeyOutcome::Edited
            }
            Err(e) => {
                warn!("{style:?} toggle aborted: {e}");
                KeyOutcome::Intercepted
            }
        }
    }

    /// Split the focused block at the cursor; the tail becomes a new sibling
    /// right after it and takes the focus.
    fn split_focused(&mut self, kind: Option<BlockKind>) -> KeyOutcome {
        let Selection { start, end } = self.selection;
        let split = self.focused().and_then(|block| {
            let content = delete_range(&block.content, start, end)?;
            let (head, tail) = split_at(&content, start)?;
            Ok((head, tail, block.kind))
        });
        let (head, tail, current) = match split {
            Ok(parts) => parts,
            Err(e) => {
                warn!("Split aborted: {e}");
                return KeyOutcome::Intercepted;
            }
        };
        let kind = kind.unwrap_or(current.continuation());
        let Some((siblings, idx)) = self.document.siblings_mut(&self.focus) else {
            return KeyOutcome::Intercepted;
        };
        siblings[idx].content = head;
        siblings.insert(
            idx + 1,
            Block {
                kind,
                content: tail,
                children: Vec::new(),
            },
        );
        if let Some(last) = self.focus.last_mut() {
            *last += 1;
        }
        self.selection = Selection::collapsed(0);
        KeyOutcome::Edited
    }

    // ── Menu commands ───────────────────────────────────────────────────

    pub fn refresh_suggestions(&mut self) {
        let menu = std::mem::take(&mut self.menu);
        self.menu = match self.line_before_cursor() {
            Ok(line) if self.selection.is_empty() => {
                menu.transition(MenuEvent::Filter { line: &line, anchor: 0 })
            }
            _ => menu.transition(MenuEvent::Dismiss),
        };
    }

    pub fn select(&mut self, index: usize) -> KeyOutcome {
        if !self.menu.is_open() || self.focused().is_err() {
            return KeyOutcome::PassThrough;
        }
        let menu = std::mem::take(&mut self.menu).transition(MenuEvent::Select(index));
        match menu.selected() {
            Some(t) => self.apply_trigger(t),
            None => KeyOutcome::PassThrough,
        }
    }

    pub fn close_menu(&mut self) {
        self.menu = std::mem::take(&mut self.menu).transition(MenuEvent::Dismiss);
    }

    // ── Default editing ─────────────────────────────────────────────────

    /// Default handling for a key the command rules passed through.
    /// Returns `true` if the document, focus, or selection changed.
    pub fn apply_default(&mut self, input: &KeyInput) -> bool {
        if self.focused().is_err() {
            return false;
        }
        if let Some(c) = input.inserted_char() {
            let mut buf = [0u8; 4];
            return self.insert(c.encode_utf8(&mut buf));
        }
        if input.has_platform_modifier() {
            return false;
        }
        match input.key {
            Key::Enter => self.split_focused(None) == KeyOutcome::Edited,
            Key::Backspace => self.backspace(),
            Key::Delete => self.delete_forward(),
            Key::Tab if input.modifiers.shift => self.outdent(),
            Key::Tab => self.indent(),
            Key::Left if input.modifiers.shift => {
                let head = self.selection.head(self.active);
                self.extend_selection(head.saturating_sub(1))
            }
            Key::Right if input.modifiers.shift => {
                let head = self.selection.head(self.active);
                let len = self.focused().map(Block::char_len).unwrap_or(0);
                self.extend_selection((head + 1).min(len))
            }
            Key::Left => self.move_horizontally(-1),
            Key::Right => self.move_horizontally(1),
            Key::Home => self.move_within(0),
            Key::End => {
                let len = self.focused().map(Block::char_len).unwrap_or(0);
                self.move_within(len)
            }
            Key::Up => self.move_vertically(-1),
            Key::Down => self.move_vertically(1),
            _ => false,
        }
    }

    /// Type text over the selection.
    pub fn insert(&mut self, text: &str) -> bool {
        let Selection { start, end } = self.selection;
        let result = self.focused_mut().and_then(|block| {
            let content = delete_range(&block.content, start, end)?;
            Ok((insert_text(&content, start, text)?, block))
        });
        match result {
            Ok((content, block)) => {
                block.content = content;
                self.selection = Selection::collapsed(start + text.chars().count());
                true
            }
            Err(e) => {
                warn!("Insert aborted: {e}");
                false
            }
        }
    }

    fn replace_focused_content(&mut self, start: usize, end: usize, cursor: usize) -> bool {
        let result = self
            .focused_mut()
            .and_then(|block| Ok((delete_range(&block.content, start, end)?, block)));
        match result {
            Ok((content, block)) => {
                block.content = content;
                self.selection = Selection::collapsed(cursor);
                true
            }
            Err(e) => {
                warn!("Delete aborted: {e}");
                false
            }
        }
    }

    fn backspace(&mut self) -> bool {
        let Selection { start, end } = self.selection;
        if start != end {
            return self.replace_focused_content(start, end, start);
        }
        if start > 0 {
            return self.replace_focused_content(start - 1, start, start - 1);
        }
        let Ok(block) = self.focused_mut() else {
            return false;
        };
        if block.kind != BlockKind::Paragraph {
            block.kind = BlockKind::Paragraph;
            return true;
        }
        if !block.children.is_empty() {
            return false;
        }
        self.merge_into_previous()
    }

    /// Append the focused (childless) block to the block before it on screen.
    fn merge_into_previous(&mut self) -> bool {
        let order = self.document.visual_order();
        let Some(pos) = order.iter().position(|p| *p == self.focus) else {
            return false;
        };
        let Some(prev) = pos.checked_sub(1).map(|i| order[i].clone()) else {
            return false;
        };
        let Some((siblings, idx)) = self.document.siblings_mut(&self.focus) else {
            return false;
        };
        let removed = siblings.remove(idx);
        let Some(target) = self.document.block_mut(&prev) else {
            return false;
        };
        let cursor = target.char_len();
        target.content.extend(removed.content);
        target.content = normalize(std::mem::take(&mut target.content));
        self.focus = prev;
        self.selection = Selection::collapsed(cursor);
        true
    }

    fn delete_forward(&mut self) -> bool {
        let Selection { start, end } = self.selection;
        if start != end {
            return self.replace_focused_content(start, end, start);
        }
        let len = self.focused().map(Block::char_len).unwrap_or(0);
        if start >= len {
            return false;
        }
        self.replace_focused_content(start, start + 1, start)
    }

    fn move_within(&mut self, pos: usize) -> bool {
        self.set_selection(Selection::collapsed(pos))
    }

    fn extend_selection(&mut self, to: usize) -> bool {
        let (selection, active) = self.selection.extend(self.active, to);
        self.active = active;
        self.set_selection(selection)
    }

    fn set_selection(&mut self, selection: Selection) -> bool {
        let moved = self.selection != selection;
        self.selection = selection;
        moved
    }

    fn move_horizontally(&mut self, direction: i8) -> bool {
        let Selection { start, end } = self.selection;
        if start != end {
            return self.move_within(if direction < 0 { start } else { end });
        }
        let len = self.focused().map(Block::char_len).unwrap_or(0);
        match direction {
            d if d < 0 && start > 0 => self.move_within(start - 1),
            d if d > 0 && start < len => self.move_within(start + 1),
            d => {
                // Wrap onto the neighbouring block.
                let Some(path) = self.neighbour(d) else {
                    return false;
                };
                let target_len = self.document.block(&path).map(Block::char_len).unwrap_or(0);
                self.focus = path;
                self.selection = Selection::collapsed(if d < 0 { target_len } else { 0 });
                true
            }
        }
    }

    fn move_vertically(&mut self, direction: i8) -> bool {
        let Some(path) = self.neighbour(direction) else {
            return false;
        };
        let target_len = self.document.block(&path).map(Block::char_len).unwrap_or(0);
        let column = self.selection.start.min(target_len);
        self.focus = path;
        self.selection = Selection::collapsed(column);
        true
    }

    fn neighbour(&self, direction: i8) -> Option<BlockPath> {
        let order = self.document.visual_order();
        let pos = order.iter().position(|p| *p == self.focus)?;
        let target = if direction < 0 {
            pos.checked_sub(1)?
        } else {
            pos + 1
        };
        order.get(target).cloned()
    }

    /// Nest the focused block as the last child of its previous sibling.
    pub fn indent(&mut self) -> bool {
        let Some(&idx) = self.focus.last() else {
            return false;
        };
        if idx == 0 {
            return false;
        }
        let Some((siblings, idx)) = self.document.siblings_mut(&self.focus) else {
            return false;
        };
        let block = siblings.remove(idx);
        let new_parent = &mut siblings[idx - 1];
        new_parent.children.push(block);
        let child_idx = new_parent.children.len() - 1;
        let depth = self.focus.len();
        self.focus[depth - 1] = idx - 1;
        self.focus.push(child_idx);
        true
    }

    /// Move the focused block out of its parent, right after it.
    pub fn outdent(&mut self) -> bool {
        if self.focus.len() < 2 {
            return false;
        }
        let Some((siblings, idx)) = self.document.siblings_mut(&self.focus) else {
            return false;
        };
        let block = siblings.remove(idx);
        let parent_path = self.focus[..self.focus.len() - 1].to_vec();
        let Some((parent_siblings, parent_idx)) = self.document.siblings_mut(&parent_path) else {
            return false;
        };
        parent_siblings.insert(parent_idx + 1, block);
        let mut focus = parent_path;
        if let Some(last) = focus.last_mut() {
            *last = parent_idx + 1;
        }
        self.focus = focus;
        true
    }
}
