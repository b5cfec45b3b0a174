use lazy_static::lazy_static;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use regex::Regex;

lazy_static! {
    static ref NUMBERED_RE: Regex = Regex::new(r"^(\d+)\.\s+(.*)$").unwrap();
    static ref INLINE_RE: Regex = Regex::new(r"\*\*(.+?)\*\*|`([^`]+)`|\*(.+?)\*").unwrap();
}

fn code_style() -> Style {
    Style::default().fg(Color::LightGreen).bg(Color::Black)
}

fn heading_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Render chat and course markup into ratatui lines.
///
/// Supports fenced code blocks, `**bold**`, `` `code` ``, `*italic*`,
/// `#`-headings and `-`, `*` or numbered list items. Anything else passes
/// through as plain text.
pub fn render_markdown(content: &str) -> Vec<Line<'static>> {
    let mut result: Vec<Line<'static>> = Vec::new();
    let mut in_code = false;

    for line in content.lines() {
        let trimmed = line.trim();

        if let Some(lang) = trimmed.strip_prefix("```") {
            if !in_code && !lang.trim().is_empty() {
                result.push(Line::from(Span::styled(
                    format!(" {} ", lang.trim()),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            in_code = !in_code;
            continue;
        }

        if in_code {
            result.push(Line::from(Span::styled(format!("  {}", line), code_style())));
            continue;
        }

        let heading = trimmed
            .strip_prefix("### ")
            .or_else(|| trimmed.strip_prefix("## "))
            .or_else(|| trimmed.strip_prefix("# "));
        if let Some(heading) = heading {
            result.push(Line::from(Span::styled(heading.to_string(), heading_style())));
            continue;
        }

        if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            let mut spans = vec![Span::from("  • ")];
            spans.extend(parse_inline(item));
            result.push(Line::from(spans));
            continue;
        }

        if let Some(caps) = NUMBERED_RE.captures(trimmed) {
            let mut spans = vec![Span::from(format!("  {}. ", &caps[1]))];
            spans.extend(parse_inline(&caps[2]));
            result.push(Line::from(spans));
            continue;
        }

        if trimmed.is_empty() {
            result.push(Line::from(""));
        } else {
            result.push(Line::from(parse_inline(line)));
        }
    }

    result
}

/// Inline markup only: **bold**, `code`, *italic*.
pub fn parse_inline(text: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in INLINE_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            spans.push(Span::from(text[last..whole.start()].to_string()));
        }

        if let Some(bold) = caps.get(1) {
            spans.push(Span::styled(
                bold.as_str().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        } else if let Some(code) = caps.get(2) {
            spans.push(Span::styled(code.as_str().to_string(), code_style()));
        } else if let Some(italic) = caps.get(3) {
            spans.push(Span::styled(
                italic.as_str().to_string(),
                Style::default().add_modifier(Modifier::ITALIC),
            ));
        }
        last = whole.end();
    }

    if last < text.len() {
        spans.push(Span::from(text[last..].to_string()));
    }
    if spans.is_empty() {
        spans.push(Span::from(text.to_string()));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_plain_text() {
        let result = render_markdown("Hello world");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].to_string(), "Hello world");
    }

    #[test]
    fn test_bold_is_styled() {
        let result = render_markdown("**bold**");
        assert_eq!(result[0].spans.len(), 1);
        assert!(result[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_italic_and_code() {
        let line = &render_markdown("*soft* and `np.dot`")[0];
        assert!(line.spans[0].style.add_modifier.contains(Modifier::ITALIC));
        assert_eq!(line.spans[0].content, "soft");
        assert_eq!(line.spans[1].content, " and ");
        assert_eq!(line.spans[2].content, "np.dot");
        assert_eq!(line.spans[2].style.fg, Some(Color::LightGreen));
    }

    #[test]
    fn test_mixed_inline() {
        let line = &render_markdown("Hello **bold** and *italic* world")[0];
        assert_eq!(line.spans.len(), 5);
        assert_eq!(line.spans[0].content, "Hello ");
        assert_eq!(line.spans[1].content, "bold");
        assert_eq!(line.spans[4].content, " world");
    }

    #[test]
    fn test_lists() {
        let result = render_markdown("- Item 1\n* Item 2\n1. First");
        assert_eq!(result.len(), 3);
        assert!(result[0].to_string().starts_with("  • Item 1"));
        assert!(result[1].to_string().contains("Item 2"));
        assert_eq!(result[2].to_string(), "  1. First");
    }

    #[test]
    fn test_bold_in_list() {
        let line = &render_markdown("- **Model design**: pick one")[0];
        assert_eq!(line.spans[1].content, "Model design");
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_headings() {
        let result = render_markdown("# One\n## Two\n### Three");
        assert_eq!(joined(&result), "One\nTwo\nThree");
        assert!(result[2].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_fenced_code_block() {
        let input = "Try this:\n```python\nx = 2 * y * z\n```\nDone";
        let result = render_markdown(input);
        assert_eq!(result.len(), 4);
        assert_eq!(result[1].to_string(), " python ");
        // Markup inside the fence stays literal.
        assert_eq!(result[2].to_string(), "  x = 2 * y * z");
        assert_eq!(result[2].spans[0].style.fg, Some(Color::LightGreen));
        assert_eq!(result[3].to_string(), "Done");
    }

    #[test]
    fn test_unterminated_fence_runs_to_end() {
        let result = render_markdown("```\n- not a list");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].to_string(), "  - not a list");
    }

    #[test]
    fn test_empty_lines_kept() {
        let result = render_markdown("Line 1\n\nLine 2");
        assert_eq!(result.len(), 3);
        assert_eq!(result[1].to_string(), "");
    }
}
