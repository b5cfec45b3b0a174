use crate::app::App;
use crate::models::{Difficulty, Question};
use crate::utils::markdown::render_markdown;
use crate::utils::{calculate_max_scroll, estimate_text_height};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    }
}

/// Lines for one question card. The answer shows only once revealed.
pub fn question_lines(
    index: usize,
    question: &Question,
    revealed: bool,
    selected: bool,
) -> Vec<Line<'static>> {
    let marker = if selected { "▶ " } else { "  " };
    let mut header = vec![
        Span::styled(
            format!("{}Q{} ", marker, index + 1),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("[{}]", question.difficulty.label()),
            Style::default().fg(difficulty_color(question.difficulty)),
        ),
    ];
    if let Some(kind) = question.kind {
        header.push(Span::styled(
            format!(" [{}]", kind.label()),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut lines = vec![Line::from(header)];
    let question_style = if selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    for line in question.question.lines() {
        lines.push(Line::from(Span::styled(format!("    {}", line), question_style)));
    }

    if revealed {
        lines.push(Line::from(Span::styled(
            "    Answer:",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )));
        for line in render_markdown(&question.answer) {
            let mut spans = vec![Span::from("    ")];
            spans.extend(line.spans);
            lines.push(Line::from(spans));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "    (Enter to reveal the answer)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));
    lines
}

pub fn draw_quiz(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let mode = if app.use_ai {
        Span::styled(
            " AI questions ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            " Static questions ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    };
    let subject = if app.global_context.is_empty() {
        "no learning context".to_string()
    } else {
        crate::quiz::extract_subject(Some(&app.global_context))
    };
    let header = Paragraph::new(Line::from(vec![
        mode,
        Span::from(format!("  {}  ", subject)),
        Span::styled("a", Style::default().fg(Color::Cyan)),
        Span::from(" toggle AI  "),
        Span::styled("r", Style::default().fg(Color::Cyan)),
        Span::from(" reload"),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Quiz "));
    f.render_widget(header, chunks[0]);

    let body = chunks[1];
    if app.quiz_loading {
        let loading = Paragraph::new(Span::styled(
            "Loading questions...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(loading, body);
        return;
    }

    if let Some(error) = &app.quiz_error {
        let text = Text::from(vec![
            Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press r to retry."),
        ]);
        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, body);
        return;
    }

    let text_width = body.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut selected_offset = 0;
    for (index, question) in app.questions.iter().enumerate() {
        if index == app.selected_question {
            selected_offset = lines
                .iter()
                .map(|l| estimate_text_height(&l.to_string(), text_width))
                .sum::<usize>();
        }
        lines.extend(question_lines(
            index,
            question,
            app.revealed.contains(&index),
            index == app.selected_question,
        ));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No questions yet. Press r to load.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let content_height: usize = lines
        .iter()
        .map(|l| estimate_text_height(&l.to_string(), text_width))
        .sum();
    let max_scroll = calculate_max_scroll(content_height, body.height.saturating_sub(2) as usize);
    let scroll = (selected_offset.min(u16::MAX as usize) as u16).min(max_scroll);

    let title = format!(" {} questions ", app.questions.len());
    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(paragraph, body);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QuestionId, QuestionKind};

    fn question() -> Question {
        Question {
            id: QuestionId::Number(1),
            question: "What does `len` return?".to_string(),
            answer: "The **number** of elements.".to_string(),
            difficulty: Difficulty::Hard,
            kind: Some(QuestionKind::Code),
        }
    }

    #[test]
    fn test_hidden_answer() {
        let text: Vec<String> = question_lines(0, &question(), false, false)
            .iter()
            .map(|l| l.to_string())
            .collect();
        assert!(text[0].contains("Q1"));
        assert!(text[0].contains("[Hard]"));
        assert!(text[0].contains("[code]"));
        assert!(!text.iter().any(|l| l.contains("number of elements")));
    }

    #[test]
    fn test_revealed_answer() {
        let text: Vec<String> = question_lines(2, &question(), true, true)
            .iter()
            .map(|l| l.to_string())
            .collect();
        assert!(text[0].starts_with("▶ Q3"));
        assert!(text.iter().any(|l| l == "    The number of elements."));
    }
}
