use crate::app::App;
use crate::models::Chapter;
use crate::ui::layout::calculate_revision_chunks;
use crate::utils::markdown::{parse_inline, render_markdown};
use crate::utils::{calculate_max_scroll, estimate_text_height, truncate_string};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

/// Terminal color for a chapter's display token, matched by keyword.
pub fn chapter_color(token: &str) -> Color {
    let token = token.to_lowercase();
    [
        ("blue", Color::Blue),
        ("purple", Color::Magenta),
        ("indigo", Color::Magenta),
        ("green", Color::Green),
        ("emerald", Color::Green),
        ("orange", Color::LightRed),
        ("red", Color::Red),
        ("yellow", Color::Yellow),
        ("amber", Color::Yellow),
        ("pink", Color::LightMagenta),
        ("teal", Color::Cyan),
        ("cyan", Color::Cyan),
    ]
    .into_iter()
    .find(|(keyword, _)| token.contains(keyword))
    .map(|(_, color)| color)
    .unwrap_or(Color::Gray)
}

pub fn chapter_lines(chapter: &Chapter) -> Vec<Line<'static>> {
    let accent = chapter_color(&chapter.color);
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{}  {}", chapter.icon.glyph(), chapter.title),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for section in &chapter.sections {
        lines.push(Line::from(Span::styled(
            section.subtitle.clone(),
            Style::default()
                .fg(accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )));
        for point in &section.points {
            let mut spans = vec![Span::from("  • ")];
            spans.extend(parse_inline(point));
            lines.push(Line::from(spans));
        }
        if let Some(code) = &section.code {
            lines.push(Line::from(""));
            lines.extend(render_markdown(&format!("```\n{}\n```", code)));
        }
        lines.push(Line::from(""));
    }

    lines
}

fn draw_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let width = area.width.saturating_sub(8) as usize;
    let items: Vec<ListItem> = app
        .chapters
        .iter()
        .map(|chapter| {
            let selected = chapter.id == app.current_chapter_id;
            let style = if selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(chapter_color(&chapter.color))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::from(format!(" {} ", chapter.icon.glyph())),
                Span::from(truncate_string(&chapter.title, width)),
            ]))
            .style(style)
        })
        .collect();

    let title = if app.global_context.is_empty() {
        " Chapters "
    } else {
        " Chapters (your course) "
    };
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

pub fn draw_revision(f: &mut Frame, app: &mut App, area: Rect) {
    let layout = calculate_revision_chunks(area, app.sidebar_open);
    if let Some(sidebar) = layout.sidebar_area {
        draw_sidebar(f, app, sidebar);
    }

    let mut lines = Vec::new();
    if app.generating_course() {
        lines.push(Line::from(Span::styled(
            "Generating a course from your learning context...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::from(""));
    }

    let position = app
        .chapters
        .iter()
        .position(|c| c.id == app.current_chapter_id)
        .unwrap_or(0);
    if let Some(chapter) = app.current_chapter() {
        lines.extend(chapter_lines(chapter));
    }

    let content = layout.content_area;
    let text_width = content.width.saturating_sub(2) as usize;
    let content_height: usize = lines
        .iter()
        .map(|line| estimate_text_height(&line.to_string(), text_width))
        .sum();
    let max_scroll = calculate_max_scroll(content_height, content.height.saturating_sub(2) as usize);
    app.chapter_scroll = app.chapter_scroll.min(max_scroll);

    let title = format!(" Chapter {}/{} ", position + 1, app.chapters.len());
    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .scroll((app.chapter_scroll, 0))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(paragraph, content);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_chapters;

    #[test]
    fn test_chapter_color() {
        assert_eq!(chapter_color("bg-blue-100 text-blue-700"), Color::Blue);
        assert_eq!(chapter_color("bg-purple-100"), Color::Magenta);
        assert_eq!(chapter_color("BG-GREEN-100"), Color::Green);
        assert_eq!(chapter_color("something else"), Color::Gray);
    }

    #[test]
    fn test_chapter_lines_include_sections_and_code() {
        let chapter = &default_chapters()[0];
        let text: Vec<String> = chapter_lines(chapter).iter().map(|l| l.to_string()).collect();

        assert!(text[0].ends_with(&chapter.title));
        assert!(text.iter().any(|l| l == &chapter.sections[0].subtitle));
        assert!(text.iter().any(|l| l.starts_with("  • Model design")));
        assert!(
            text.iter()
                .any(|l| l.contains("AutoModelForCausalLM.from_pretrained"))
        );
    }
}
