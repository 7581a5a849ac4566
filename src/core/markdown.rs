//! Markdown serializer.
//!
//! Pure function of the document: same tree in, same bytes out.
//!
//! | kind          | line                                   | terminator |
//! |---------------|----------------------------------------|------------|
//! | heading       | `#`×level + first span text, no indent | `\n\n`     |
//! | paragraph     | indent + styled spans                  | `\n\n`     |
//! | bullet item   | indent + `- ` + text                   | `\n`       |
//! | numbered item | indent + `1. ` + text                  | `\n`       |
//! | checklist     | indent + `- [x] ` / `- [ ] ` + text    | `\n`       |
//! | other         | indent + text, skipped when empty      | `\n\n`     |
//!
//! Indent is two spaces per nesting level. Children follow their parent at
//! the next level. The final string is trimmed.
//!
//! [`editor_text`] is the same layout for opening a block document in raw
//! mode: checklist items keep the `☐`/`☑` glyphs the raw engine toggles.

use crate::core::document::{Block, BlockKind, Document, InlineSpan};
use crate::core::trigger::{CHECKBOX_CHECKED, CHECKBOX_UNCHECKED};

const INDENT: &str = "  ";

/// How checklist items are marked.
#[derive(Debug, Clone, Copy)]
enum Checkbox {
    /// `- [ ] ` / `- [x] `
    TaskList,
    /// `☐ ` / `☑ `
    Glyph,
}

pub fn serialize(document: &Document) -> String {
    render(document, Checkbox::TaskList)
}

/// Raw editor text for a block document.
pub fn editor_text(document: &Document) -> String {
    render(document, Checkbox::Glyph)
}

fn render(document: &Document, checkbox: Checkbox) -> String {
    let mut out = String::new();
    for block in &document.blocks {
        write_block(&mut out, block, 0, checkbox);
    }
    out.trim().to_string()
}

fn write_block(out: &mut String, block: &Block, depth: usize, checkbox: Checkbox) {
    let indent = INDENT.repeat(depth);
    match block.kind {
        BlockKind::Heading { level } => {
            let text = block.content.first().map(|s| s.text.as_str()).unwrap_or("");
            out.push_str(&"#".repeat(level.depth()));
            out.push(' ');
            out.push_str(text);
            out.push_str("\n\n");
        }
        BlockKind::Paragraph => {
            out.push_str(&indent);
            for span in &block.content {
                out.push_str(&styled(span));
            }
            out.push_str("\n\n");
        }
        BlockKind::BulletItem => {
            out.push_str(&format!("{indent}- {}\n", block.plain_text()));
        }
        BlockKind::NumberedItem => {
            out.push_str(&format!("{indent}1. {}\n", block.plain_text()));
        }
        BlockKind::ChecklistItem { checked } => {
            let marker = match (checkbox, checked) {
                (Checkbox::TaskList, true) => "- [x]".to_string(),
                (Checkbox::TaskList, false) => "- [ ]".to_string(),
                (Checkbox::Glyph, true) => CHECKBOX_CHECKED.to_string(),
                (Checkbox::Glyph, false) => CHECKBOX_UNCHECKED.to_string(),
            };
            out.push_str(&format!("{indent}{marker} {}\n", block.plain_text()));
        }
        BlockKind::Other => {
            let text = block.plain_text();
            if !text.is_empty() {
                out.push_str(&format!("{indent}{text}\n\n"));
            }
        }
    }

    for child in &block.children {
        write_block(out, child, depth + 1, checkbox);
    }
}

/// Bold wraps first, then italic around that, then underline outermost.
fn styled(span: &InlineSpan) -> String {
    let mut text = span.text.clone();
    if span.styles.bold {
        text = format!("**{text}**");
    }
    if span.styles.italic {
        text = format!("*{text}*");
    }
    if span.styles.underline {
        text = format!("__{text}__");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::{HeadingLevel, Styles};

    fn heading(level: HeadingLevel, text: &str) -> Block {
        Block::with_text(BlockKind::Heading { level }, text)
    }

    fn todo(checked: bool, text: &str) -> Block {
        Block::with_text(BlockKind::ChecklistItem { checked }, text)
    }

    #[test]
    fn test_heading_then_checklist() {
        let doc = Document::from_blocks(vec![heading(HeadingLevel::H2, "Title"), todo(false, "Task")]);
        assert_eq!(serialize(&doc), "## Title\n\n- [ ] Task");
    }

    #[test]
    fn test_every_kind() {
        let doc = Document::from_blocks(vec![
            heading(HeadingLevel::H1, "One"),
            Block::paragraph("Body"),
            Block::with_text(BlockKind::BulletItem, "dot"),
            Block::with_text(BlockKind::NumberedItem, "first"),
            Block::with_text(BlockKind::NumberedItem, "second"),
            todo(true, "done"),
            Block::with_text(BlockKind::Other, "quoted"),
        ]);
        assert_eq!(
            serialize(&doc),
            "# One\n\nBody\n\n- dot\n1. first\n1. second\n- [x] done\nquoted"
        );
    }

    #[test]
    fn test_nested_child_is_indented() {
        let doc = Document::from_blocks(vec![
            todo(false, "parent text").child(Block::paragraph("parent's child text")),
        ]);
        assert_eq!(serialize(&doc), "- [ ] parent text\n  parent's child text");
    }

    #[test]
    fn test_deep_nesting_indents_per_level() {
        let doc = Document::from_blocks(vec![
            Block::with_text(BlockKind::BulletItem, "a").child(
                Block::with_text(BlockKind::BulletItem, "b")
                    .child(Block::with_text(BlockKind::BulletItem, "c")),
            ),
            Block::with_text(BlockKind::BulletItem, "d"),
        ]);
        assert_eq!(serialize(&doc), "- a\n  - b\n    - c\n- d");
    }

    #[test]
    fn test_heading_uses_first_span_and_ignores_depth() {
        let mut h = heading(HeadingLevel::H3, "Head");
        h.content.push(InlineSpan::plain(" tail"));
        let doc = Document::from_blocks(vec![Block::paragraph("p").child(h)]);
        assert_eq!(serialize(&doc), "p\n\n### Head");
    }

    #[test]
    fn test_paragraph_style_nesting_order() {
        let all = Styles {
            bold: true,
            italic: true,
            underline: true,
        };
        let mut p = Block::paragraph("a ");
        p.content.push(InlineSpan::styled("b", all));
        let doc = Document::from_blocks(vec![p]);
        assert_eq!(serialize(&doc), "a __***b***__");
    }

    #[test]
    fn test_list_items_drop_styles() {
        let bold = Styles {
            bold: true,
            ..Styles::default()
        };
        let mut item = Block::new(BlockKind::BulletItem);
        item.content.push(InlineSpan::styled("loud", bold));
        assert_eq!(serialize(&Document::from_blocks(vec![item])), "- loud");
    }

    #[test]
    fn test_empty_blocks() {
        assert_eq!(serialize(&Document::new()), "");
        let doc = Document::from_blocks(vec![
            Block::new(BlockKind::Other),
            Block::paragraph(""),
            todo(false, ""),
        ]);
        assert_eq!(serialize(&doc), "- [ ]");
    }

    #[test]
    fn test_editor_text_uses_checkbox_glyphs() {
        let doc = Document::from_blocks(vec![
            heading(HeadingLevel::H2, "Title"),
            todo(false, "open").child(todo(true, "done")),
            Block::with_text(BlockKind::BulletItem, "dot"),
        ]);
        assert_eq!(editor_text(&doc), "## Title\n\n☐ open\n  ☑ done\n- dot");
        assert_eq!(serialize(&doc), "## Title\n\n- [ ] open\n  - [x] done\n- dot");
    }

    #[test]
    fn test_deterministic() {
        let doc = Document::from_blocks(vec![
            heading(HeadingLevel::H2, "Title"),
            todo(true, "x").child(todo(false, "y")),
        ]);
        assert_eq!(serialize(&doc), serialize(&doc.clone()));
    }
}
