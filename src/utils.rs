pub mod markdown;

use unicode_width::UnicodeWidthChar;

/// Char-aware truncation with a trailing ellipsis.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Simulate how text wraps with trimming (matching ratatui Wrap { trim: true }).
/// Returns (line_text, start_byte, end_byte) for each visual line.
fn simulate_wrapped_lines(text: &str, max_width: usize) -> Vec<(String, usize, usize)> {
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;
    let mut line_start = 0;

    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            lines.push((current_line.trim_end().to_string(), line_start, idx));
            current_line.clear();
            current_width = 0;
            line_start = idx + 1;
            continue;
        }

        let width = ch.width().unwrap_or(1);
        if current_width + width > max_width && current_width > 0 {
            lines.push((current_line.trim_end().to_string(), line_start, idx));
            current_line = ch.to_string();
            current_width = width;
            line_start = idx;
        } else {
            current_line.push(ch);
            current_width += width;
        }
    }

    if !current_line.is_empty() || text.ends_with('\n') {
        lines.push((current_line.trim_end().to_string(), line_start, text.len()));
    }

    lines
}

/// (line, column) of a cursor byte index inside wrapped text.
pub fn calculate_wrapped_cursor_position(
    text: &str,
    cursor_index: usize,
    max_width: usize,
) -> (usize, usize) {
    if text.is_empty() || cursor_index == 0 {
        return (0, 0);
    }

    let wrapped = simulate_wrapped_lines(text, max_width);

    for (line_idx, (_, start, end)) in wrapped.iter().enumerate() {
        if cursor_index >= *start && cursor_index <= *end {
            let col = text[*start..cursor_index].chars().count();
            return (line_idx, col);
        }
    }

    match wrapped.last() {
        Some((last, _, end)) if cursor_index >= *end => {
            (wrapped.len() - 1, last.chars().count())
        }
        _ => (0, 0),
    }
}

/// Rows a block of text occupies once wrapped at `width`.
pub fn estimate_text_height(text: &str, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    if text.is_empty() {
        return 1;
    }
    simulate_wrapped_lines(text, width).len().max(1)
}

pub fn calculate_max_scroll(content_height: usize, viewport_height: usize) -> u16 {
    content_height
        .saturating_sub(viewport_height)
        .min(u16::MAX as usize) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_no_truncation() {
        assert_eq!(truncate_string("Short string", 20), "Short string");
        assert_eq!(truncate_string("", 20), "");
    }

    #[test]
    fn test_truncate_string_with_truncation() {
        let result = truncate_string("This is a very long string that should be truncated", 20);
        assert_eq!(result, "This is a very lo...");
        assert_eq!(result.chars().count(), 20);
    }

    #[test]
    fn test_truncate_string_multibyte() {
        assert_eq!(truncate_string("Mémoire effacée totalement", 10), "Mémoire...");
    }

    #[test]
    fn test_cursor_position_single_line() {
        assert_eq!(calculate_wrapped_cursor_position("", 0, 10), (0, 0));
        assert_eq!(calculate_wrapped_cursor_position("Hello", 3, 10), (0, 3));
    }

    #[test]
    fn test_cursor_position_wraps() {
        let text = "This is a long line that should wrap";
        assert_eq!(calculate_wrapped_cursor_position(text, 15, 10), (1, 5));
    }

    #[test]
    fn test_cursor_position_beyond_text() {
        assert_eq!(calculate_wrapped_cursor_position("Hi", 10, 10), (0, 2));
    }

    #[test]
    fn test_cursor_position_exact_boundary() {
        let text = "0123456789A";
        assert_eq!(calculate_wrapped_cursor_position(text, 10, 10), (0, 10));
        assert_eq!(calculate_wrapped_cursor_position(text, 11, 10), (1, 1));
    }

    #[test]
    fn test_cursor_position_with_newlines() {
        assert_eq!(calculate_wrapped_cursor_position("Line 1\nLine 2", 8, 20), (1, 1));
    }

    #[test]
    fn test_cursor_position_counts_chars_not_bytes() {
        // "é" is two bytes
        let text = "é a";
        assert_eq!(calculate_wrapped_cursor_position(text, text.len(), 20), (0, 3));
    }

    #[test]
    fn test_explicit_newlines_split_lines() {
        let lines = simulate_wrapped_lines("Line 1\nLine 2\nLine 3", 20);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].0, "Line 3");
    }

    #[test]
    fn test_estimate_text_height() {
        assert_eq!(estimate_text_height("", 10), 1);
        assert_eq!(estimate_text_height("short", 10), 1);
        assert_eq!(estimate_text_height("0123456789abc", 10), 2);
        assert_eq!(estimate_text_height("a\nb\nc", 10), 3);
        assert_eq!(estimate_text_height("anything", 0), 0);
    }

    #[test]
    fn test_calculate_max_scroll() {
        assert_eq!(calculate_max_scroll(5, 10), 0);
        assert_eq!(calculate_max_scroll(25, 10), 15);
    }
}
