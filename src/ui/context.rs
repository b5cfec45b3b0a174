use crate::app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

fn status_line(app: &App) -> Line<'static> {
    if app.analyzing_upload {
        Line::from(Span::styled(
            "Analyzing your documents...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ))
    } else if app.generating_course() {
        Line::from(Span::styled(
            "Generating the course...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ))
    } else if !app.has_ai() {
        Line::from(Span::styled(
            "AI offline: set OPENROUTER_API_KEY to analyze documents.",
            Style::default().fg(Color::Red),
        ))
    } else {
        Line::from(Span::styled(
            "Ready.",
            Style::default().fg(Color::Green),
        ))
    }
}

pub fn draw_context(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let context_text = if app.global_context.is_empty() {
        Text::from(Span::styled(
            "No learning context yet. Upload course files below to build one.",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(app.global_context.clone())
    };
    let context = Paragraph::new(context_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Global learning context "),
        );
    f.render_widget(context, chunks[0]);

    let input_text = if app.upload_input.is_empty() {
        Text::from(Span::styled(
            "notes.md slides.pdf ...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(app.upload_input.as_str())
    };
    let input = Paragraph::new(input_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Files to upload (space separated) ")
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(input, chunks[1]);

    if !app.chat.open && app.alert.is_none() {
        let width = chunks[1].width.saturating_sub(3) as usize;
        let col = app.upload_input.chars().count().min(width) as u16;
        f.set_cursor_position((chunks[1].x + 1 + col, chunks[1].y + 1));
    }

    f.render_widget(Paragraph::new(status_line(app)), chunks[2]);

    let help = Paragraph::new(Line::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::from(" upload  "),
        Span::styled("Ctrl+X", Style::default().fg(Color::Cyan)),
        Span::from(" reset context"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[3]);
}
