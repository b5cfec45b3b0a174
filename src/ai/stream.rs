use serde_json::Value;

/// Incremental decoder for `data: <json>` server-sent-event lines.
///
/// Network chunks do not respect line boundaries, so bytes are buffered until
/// a newline arrives. Lines that are not data lines, the `[DONE]` sentinel and
/// frames that fail to parse are skipped.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning the content deltas of every completed line.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut deltas = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(delta) = parse_data_line(line.trim_end_matches(['\r', '\n'])) {
                deltas.push(delta);
            }
        }
        deltas
    }

    /// Flush a final line that arrived without a trailing newline.
    pub fn finish(mut self) -> Vec<String> {
        if self.buffer.is_empty() {
            return Vec::new();
        }
        let rest = std::mem::take(&mut self.buffer);
        let line = String::from_utf8_lossy(&rest);
        parse_data_line(line.trim_end_matches(['\r', '\n']))
            .into_iter()
            .collect()
    }
}

/// Extract `choices[0].delta.content` from a single SSE line.
pub fn parse_data_line(line: &str) -> Option<String> {
    let data = line.strip_prefix("data: ")?;
    if data == "[DONE]" {
        return None;
    }

    let json: Value = serde_json::from_str(data).ok()?;
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("delta"))
        .and_then(|d| d.get("content"))
        .and_then(|c| c.as_str())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_line_content() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#;
        assert_eq!(parse_data_line(line), Some("Hello".to_string()));
    }

    #[test]
    fn test_parse_data_line_done() {
        assert_eq!(parse_data_line("data: [DONE]"), None);
    }

    #[test]
    fn test_parse_data_line_ignores_other_lines() {
        assert_eq!(parse_data_line(": OPENROUTER PROCESSING"), None);
        assert_eq!(parse_data_line("event: message"), None);
        assert_eq!(parse_data_line(""), None);
    }

    #[test]
    fn test_parse_data_line_invalid_json() {
        assert_eq!(parse_data_line("data: {invalid json}"), None);
    }

    #[test]
    fn test_parse_data_line_role_only_delta() {
        let line = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_data_line(line), None);
    }

    #[test]
    fn test_decoder_joins_frames_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        let first = decoder.push(b"data: {\"choices\":[{\"delta\":{\"con");
        assert!(first.is_empty());
        let second = decoder.push(b"tent\":\"Hi\"}}]}\n\ndata: [DONE]\n");
        assert_eq!(second, vec!["Hi".to_string()]);
    }

    #[test]
    fn test_decoder_multiple_lines_in_one_chunk() {
        let mut decoder = SseDecoder::new();
        let chunk = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"A\"}}]}\n",
            "\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"B\"}}]}\r\n",
        );
        assert_eq!(decoder.push(chunk.as_bytes()), vec!["A", "B"]);
    }

    #[test]
    fn test_decoder_keeps_multibyte_characters_intact() {
        let line = "data: {\"choices\":[{\"delta\":{\"content\":\"é\"}}]}\n".as_bytes();
        let split = line.iter().position(|b| *b == 0xC3).unwrap() + 1;
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(&line[..split]).is_empty());
        assert_eq!(decoder.push(&line[split..]), vec!["é".to_string()]);
    }

    #[test]
    fn test_finish_flushes_unterminated_line() {
        let mut decoder = SseDecoder::new();
        assert!(
            decoder
                .push(br#"data: {"choices":[{"delta":{"content":"end"}}]}"#)
                .is_empty()
        );
        assert_eq!(decoder.finish(), vec!["end".to_string()]);
    }
}
