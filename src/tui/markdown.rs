//! Markdown → ratatui `Text` for the preview pane.
//!
//! The input is always our own export, so only the constructs the serializer
//! emits get real treatment: `#`-`###` headings, `**bold**`, `*italic*`,
//! `__underline__`, bullet and numbered lists, and `- [ ]` task items.
//! Anything else falls through as plain text.
//!
//! CommonMark reads `__x__` as strong emphasis. The source offsets from
//! `into_offset_iter` tell the two delimiters apart so underline survives.

use std::ops::Range;

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::core::trigger::{CHECKBOX_CHECKED, CHECKBOX_UNCHECKED};

/// Render exported Markdown as styled, owned `Text`.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut preview = PreviewText::new(base_fg);
    for (event, range) in Parser::new_ext(content, opts).into_offset_iter() {
        preview.apply(event, delimiter_at(content, range));
    }
    preview.lines.into()
}

/// First two source bytes of an event's range, used to spot `__`.
fn delimiter_at(content: &str, range: Range<usize>) -> &str {
    content.get(range.start..range.start + 2).unwrap_or("")
}

/// One open list: numbered lists remember the next number.
#[derive(Debug, Clone, Copy)]
enum ListKind {
    Bullet,
    Numbered(u64),
}

struct PreviewText {
    lines: Vec<Line<'static>>,
    base_fg: Color,
    /// Inline modifiers, innermost last. Patched together on each span.
    inline: Vec<Style>,
    lists: Vec<ListKind>,
    /// Set on a checked task marker until its item ends.
    checked_item: bool,
    /// A blank separator is owed before the next top-level block.
    gap: bool,
}

impl PreviewText {
    fn new(base_fg: Color) -> Self {
        Self {
            lines: Vec::new(),
            base_fg,
            inline: Vec::new(),
            lists: Vec::new(),
            checked_item: false,
            gap: false,
        }
    }

    fn current_style(&self) -> Style {
        let base = if self.checked_item {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(self.base_fg)
        };
        self.inline.iter().fold(base, |acc, s| acc.patch(*s))
    }

    fn start_line(&mut self) {
        if self.gap {
            self.lines.push(Line::default());
            self.gap = false;
        }
        self.lines.push(Line::default());
    }

    fn push(&mut self, span: Span<'static>) {
        match self.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.lines.push(Line::from(span)),
        }
    }

    fn apply(&mut self, event: Event<'_>, delimiter: &str) {
        match event {
            Event::Start(tag) => self.open(tag, delimiter),
            Event::End(tag) => self.close(tag),
            Event::Text(text) | Event::Code(text) => {
                let style = self.current_style();
                self.push(Span::styled(text.into_string(), style));
            }
            Event::SoftBreak | Event::HardBreak => self.push(Span::raw(" ")),
            Event::TaskListMarker(checked) => {
                let (glyph, color) = if checked {
                    (CHECKBOX_CHECKED, Color::Green)
                } else {
                    (CHECKBOX_UNCHECKED, self.base_fg)
                };
                self.push(Span::styled(format!("{glyph} "), Style::default().fg(color)));
                self.checked_item = checked;
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>, delimiter: &str) {
        match tag {
            // Loose list items wrap their text in a paragraph; the item
            // already started the line.
            Tag::Paragraph if self.lists.is_empty() => self.start_line(),
            Tag::Heading { level, .. } => {
                self.start_line();
                let style = heading_style(level, self.base_fg);
                self.push(Span::styled(format!("{} ", heading_marker(level)), style));
                self.inline.push(style);
            }
            Tag::List(start) => {
                self.lists.push(match start {
                    Some(n) => ListKind::Numbered(n),
                    None => ListKind::Bullet,
                });
            }
            Tag::Item => {
                if self.lists.len() > 1 {
                    self.lines.push(Line::default());
                } else {
                    self.start_line();
                }
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(ListKind::Numbered(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}- "),
                };
                self.push(Span::styled(marker, Style::default().fg(Color::DarkGray)));
            }
            Tag::Emphasis => self.inline.push(Style::new().add_modifier(Modifier::ITALIC)),
            Tag::Strong if delimiter == "__" => {
                self.inline.push(Style::new().add_modifier(Modifier::UNDERLINED))
            }
            Tag::Strong => self.inline.push(Style::new().add_modifier(Modifier::BOLD)),
            _ => {}
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph if self.lists.is_empty() => self.gap = true,
            TagEnd::Heading(_) => {
                self.inline.pop();
                self.gap = true;
            }
            TagEnd::Item => self.checked_item = false,
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.gap = true;
                }
            }
            TagEnd::Emphasis | TagEnd::Strong => {
                self.inline.pop();
            }
            _ => {}
        }
    }
}

fn heading_marker(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "#",
        HeadingLevel::H2 => "##",
        HeadingLevel::H3 => "###",
        HeadingLevel::H4 => "####",
        HeadingLevel::H5 => "#####",
        HeadingLevel::H6 => "######",
    }
}

fn heading_style(level: HeadingLevel, base_fg: Color) -> Style {
    let style = Style::default().fg(base_fg).add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => style.fg(Color::Cyan),
        HeadingLevel::H2 => style.fg(Color::Blue),
        _ => style,
    }
}
