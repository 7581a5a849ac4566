use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::core::export::Export;
use crate::core::state::{App, Surface};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{BlockView, Preview, RawEditor, SuggestionPopup, TitleBar};

const EDITING_HELP: &[(&str, &str)] = &[
    ("Ctrl+Enter", "toggle ☐"),
    ("Ctrl+B/I/U", "style"),
    ("Ctrl+P", "preview"),
    ("Ctrl+S", "export"),
    ("Ctrl+Q", "quit"),
];

const MENU_HELP: &[(&str, &str)] = &[
    ("↑↓", "choose"),
    ("Enter/Space", "insert"),
    ("Esc", "close"),
];

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min, Percentage};
    let [title_area, body_area, help_area] =
        Layout::vertical([Length(1), Min(0), Length(1)]).areas(frame.area());

    TitleBar::new(
        app.mode(),
        app.dirty,
        app.saved_at,
        app.status_message.clone(),
    )
    .render(frame, title_area);

    let editor_area = match tui.preview.as_mut() {
        Some(preview) => {
            let [left, right] =
                Layout::horizontal([Percentage(55), Percentage(45)]).areas(body_area);
            let markdown = app.surface.export(Export::today()).markdown;
            Preview::new(&markdown, preview).render(frame, right);
            left
        }
        None => body_area,
    };

    let cursor = match &app.surface {
        Surface::Raw { text, .. } => {
            RawEditor::new(text, &mut tui.raw_viewport).render(frame, editor_area);
            tui.raw_viewport.cursor
        }
        Surface::Blocks(editor) => {
            BlockView::new(editor, &mut tui.block_view).render(frame, editor_area);
            tui.block_view.cursor
        }
    };
    if let Some(pos) = cursor {
        frame.set_cursor_position(pos);
    }

    let menu = app.surface.menu();
    if menu.is_open
        && let Some(pos) = cursor
    {
        SuggestionPopup::new(&menu, pos).render(frame, body_area);
    }

    draw_help(
        frame,
        help_area,
        if menu.is_open { MENU_HELP } else { EDITING_HELP },
    );
}

fn draw_help(frame: &mut Frame, area: Rect, entries: &[(&str, &str)]) {
    let key_style = Style::default().fg(Color::Cyan);
    let desc_style = Style::default().fg(Color::DarkGray);
    let spans: Vec<Span> = entries
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(format!(" {key} "), key_style),
                Span::styled(format!("{desc} "), desc_style),
            ]
        })
        .collect();
    frame.render_widget(Line::from(spans), area);
}
