use crate::app::ChatPanel;
use crate::models::{ChatMessage, ChatRole};
use crate::ui::layout::{calculate_chat_chunks, drawer_rect};
use crate::utils::markdown::render_markdown;
use crate::utils::{
    calculate_max_scroll, calculate_wrapped_cursor_position, estimate_text_height,
    truncate_string,
};
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Transcript lines for the drawer. User text stays verbatim; assistant
/// replies go through the markup renderer.
pub fn message_lines(messages: &[ChatMessage]) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for msg in messages {
        match msg.role {
            ChatRole::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )));
                for attachment in &msg.attachments {
                    lines.push(Line::from(Span::styled(
                        format!("  📎 {}", attachment.name),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                for line in msg.text.lines() {
                    lines.push(Line::from(format!("  {}", line)));
                }
            }
            ChatRole::Assistant => {
                lines.push(Line::from(Span::styled(
                    "StudyBot:",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )));
                for line in render_markdown(&msg.text) {
                    let mut spans: Vec<Span<'static>> = vec![Span::from("  ")];
                    spans.extend(line.spans);
                    lines.push(Line::from(spans));
                }
                if msg.is_streaming {
                    let cursor = Span::styled("▍", Style::default().fg(Color::Green));
                    match lines.last_mut() {
                        Some(last) if !msg.text.is_empty() => last.spans.push(cursor),
                        _ => lines.push(Line::from(vec![Span::from("  "), cursor])),
                    }
                }
            }
        }
        lines.push(Line::from(""));
    }

    lines
}

pub fn draw_chat_popup(f: &mut Frame, chat: &mut ChatPanel) {
    let area = drawer_rect(45, f.area());
    f.render_widget(Clear, area);

    let layout = calculate_chat_chunks(area, !chat.attachments.is_empty());

    let mut message_lines = message_lines(&chat.messages);
    let streaming = chat.messages.last().is_some_and(|m| m.is_streaming);
    if chat.is_busy() && !streaming {
        message_lines.push(Line::from(Span::styled(
            "StudyBot is thinking...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let visible_height = layout.messages_area.height.saturating_sub(2) as usize;
    let text_width = layout.messages_area.width.saturating_sub(2) as usize;
    let content_height: usize = message_lines
        .iter()
        .map(|line| estimate_text_height(&line.to_string(), text_width))
        .sum();
    chat.max_scroll = calculate_max_scroll(content_height, visible_height);
    chat.scroll_y = if chat.follow {
        chat.max_scroll
    } else {
        chat.scroll_y.min(chat.max_scroll)
    };

    let messages_widget = Paragraph::new(Text::from(message_lines))
        .wrap(Wrap { trim: false })
        .scroll((chat.scroll_y, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" StudyBot · contextual assistant ")
                .border_style(Style::default().fg(Color::Magenta)),
        );
    f.render_widget(messages_widget, layout.messages_area);

    if !chat.attachments.is_empty() {
        let width = (layout.attachments_area.width as usize / chat.attachments.len().max(1))
            .saturating_sub(4)
            .max(6);
        let mut spans = Vec::new();
        for (index, attachment) in chat.attachments.iter().enumerate() {
            spans.push(Span::styled(
                format!(" 📎{} {} ", index + 1, truncate_string(&attachment.name, width)),
                Style::default().fg(Color::Black).bg(Color::Gray),
            ));
            spans.push(Span::from(" "));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), layout.attachments_area);
    }

    // The attach prompt replaces the message box while open.
    let (input_title, buffer, cursor, placeholder) = match &chat.attach_input {
        Some(paths) => (
            " Attach files (space separated paths) ",
            paths.as_str(),
            paths.len(),
            "notes.md slides.pdf ...",
        ),
        None => (
            " Message ",
            chat.input_buffer.as_str(),
            chat.cursor_position,
            "Ask a question about your course...",
        ),
    };
    let input_text = if buffer.is_empty() {
        Text::from(Span::styled(placeholder, Style::default().fg(Color::DarkGray)))
    } else {
        Text::from(buffer)
    };
    let input_widget = Paragraph::new(input_text).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(input_title)
            .border_style(if chat.is_busy() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Yellow)
            }),
    );
    f.render_widget(input_widget, layout.input_area);

    let input_width = layout.input_area.width.saturating_sub(2) as usize;
    let (line, col) = calculate_wrapped_cursor_position(buffer, cursor, input_width.max(1));
    if line == 0 {
        f.set_cursor_position((
            layout.input_area.x + 1 + col as u16,
            layout.input_area.y + 1,
        ));
    }

    let help = Paragraph::new(Line::from(vec![
        Span::styled("Enter", key_style()),
        Span::from(" Send  "),
        Span::styled("Ctrl+O", key_style()),
        Span::from(" Attach  "),
        Span::styled("Ctrl+D", key_style()),
        Span::from(" Drop file  "),
        Span::styled("Ctrl+L", key_style()),
        Span::from(" Reset  "),
        Span::styled("Esc", key_style()),
        Span::from(" Close"),
    ]))
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, layout.help_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attachment;

    fn message(role: ChatRole, text: &str, is_streaming: bool) -> ChatMessage {
        ChatMessage {
            id: 0,
            role,
            text: text.to_string(),
            attachments: Vec::new(),
            is_streaming,
        }
    }

    #[test]
    fn test_message_lines_labels_roles() {
        let lines = message_lines(&[
            message(ChatRole::User, "What is **BFS**?", false),
            message(ChatRole::Assistant, "A **graph** traversal.", false),
        ]);
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(text[0], "You:");
        // User input is not rendered as markup.
        assert_eq!(text[1], "  What is **BFS**?");
        assert_eq!(text[3], "StudyBot:");
        assert_eq!(text[4], "  A graph traversal.");
    }

    #[test]
    fn test_message_lines_lists_attachments() {
        let mut msg = message(ChatRole::User, "summarize", false);
        msg.attachments.push(Attachment {
            mime_type: "application/pdf".to_string(),
            data: String::new(),
            name: "slides.pdf".to_string(),
        });
        let text: Vec<String> = message_lines(&[msg]).iter().map(|l| l.to_string()).collect();
        assert_eq!(text[1], "  📎 slides.pdf");
    }

    #[test]
    fn test_streaming_cursor() {
        let empty = message_lines(&[message(ChatRole::Assistant, "", true)]);
        assert_eq!(empty[1].to_string(), "  ▍");

        let partial = message_lines(&[message(ChatRole::Assistant, "Hel", true)]);
        assert_eq!(partial[1].to_string(), "  Hel▍");

        let done = message_lines(&[message(ChatRole::Assistant, "Hello", false)]);
        assert_eq!(done[1].to_string(), "  Hello");
    }
}
