mod alert;
mod chat_popup;
mod context;
pub mod layout;
mod quiz;
mod revision;

pub use alert::draw_alert;
pub use chat_popup::{draw_chat_popup, message_lines};
pub use context::draw_context;
pub use layout::{calculate_app_chunks, centered_rect, drawer_rect};
pub use quiz::{draw_quiz, question_lines};
pub use revision::{chapter_color, chapter_lines, draw_revision};

use crate::app::App;
use crate::models::Tab;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| Line::from(format!(" {} ", tab.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" StudyBot "),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let ai = if app.has_ai() {
        Span::styled(
            format!(" AI: {} ", app.config.model),
            Style::default().fg(Color::Black).bg(Color::Green),
        )
    } else {
        Span::styled(
            " AI offline ",
            Style::default().fg(Color::Black).bg(Color::Red),
        )
    };
    let context = if app.global_context.is_empty() {
        Span::from("  default course  ")
    } else {
        Span::from("  custom context  ")
    };

    let line = Line::from(vec![
        ai,
        context,
        Span::styled(
            "Tab switch · Ctrl+T chat · Ctrl+B chapters · Ctrl+C quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let layout = calculate_app_chunks(f.area());

    draw_tabs(f, app, layout.tabs_area);
    match app.tab {
        Tab::Revision => draw_revision(f, app, layout.body_area),
        Tab::Quiz => draw_quiz(f, app, layout.body_area),
        Tab::Context => draw_context(f, app, layout.body_area),
    }
    draw_status(f, app, layout.status_area);

    if app.chat.open {
        draw_chat_popup(f, &mut app.chat);
    }
    if let Some(message) = &app.alert {
        draw_alert(f, message);
    }
}
