use crate::error::AiError;
use crate::models::{Chapter, ChapterIcon, Difficulty, Question, QuestionId, QuestionKind, Section};
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_CHAPTER_COLOR: &str = "bg-gray-100 text-gray-700";

/// Strip markdown fences and surrounding chatter from a JSON reply.
pub fn clean_json_response(response: &str) -> String {
    let mut cleaned = response.trim().to_string();

    if cleaned.starts_with("```") {
        let lines: Vec<&str> = cleaned.lines().collect();
        if lines.len() > 2 {
            cleaned = lines[1..lines.len() - 1].join("\n");
        }
    }

    let start = match (cleaned.find('['), cleaned.find('{')) {
        (Some(a), Some(o)) => Some(a.min(o)),
        (a, o) => a.or(o),
    };
    if let Some(start) = start {
        let closer = if cleaned[start..].starts_with('[') {
            ']'
        } else {
            '}'
        };
        if let Some(end) = cleaned.rfind(closer)
            && end > start
        {
            cleaned = cleaned[start..=end].to_string();
        }
    }

    cleaned.trim().to_string()
}

/// Parse a reply that should be a JSON array. Models sometimes wrap the array
/// in an object (`{"questions": [...]}`); the first array field is used then.
fn parse_array(response: &str) -> Result<Vec<Value>, AiError> {
    let cleaned = clean_json_response(response);
    let value: Value = serde_json::from_str(&cleaned).map_err(|e| {
        AiError::Parse(format!("{}\nRaw: {}\nCleaned: {}", e, response, cleaned))
    })?;

    match value {
        Value::Array(items) => Ok(items),
        Value::Object(map) => map
            .into_iter()
            .find_map(|(_, v)| match v {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .ok_or_else(|| AiError::Parse(format!("no array in response: {}", cleaned))),
        other => Err(AiError::Parse(format!("expected an array, got {}", other))),
    }
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    answer: String,
    #[serde(default)]
    difficulty: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Turn a model reply into a question batch. Ids are `ai-{stamp}-{index}`,
/// unique within the batch even when two batches share a timestamp.
pub fn parse_questions(response: &str, stamp: i64) -> Result<Vec<Question>, AiError> {
    let items = parse_array(response)?;

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let raw: RawQuestion =
                serde_json::from_value(item).map_err(|e| AiError::Parse(e.to_string()))?;
            Ok(Question {
                id: QuestionId::Text(format!("ai-{}-{}", stamp, index)),
                question: raw.question,
                answer: raw.answer,
                difficulty: Difficulty::from_label(&raw.difficulty),
                kind: raw.kind.as_deref().and_then(QuestionKind::from_label),
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct RawChapter {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    content: Vec<Section>,
}

/// Turn a model reply into a chapter set with sequential ids starting at 1.
/// Items without a usable title are dropped.
pub fn parse_chapters(response: &str) -> Result<Vec<Chapter>, AiError> {
    let items = parse_array(response)?;

    let raws: Vec<RawChapter> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    Ok(raws
        .into_iter()
        .filter_map(|raw| {
            let title = raw.title.filter(|t| !t.trim().is_empty())?;
            Some((title, raw.color, raw.content))
        })
        .enumerate()
        .map(|(index, (title, color, sections))| Chapter {
            id: index as u32 + 1,
            icon: icon_for_title(&title),
            title,
            color: color
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CHAPTER_COLOR.to_string()),
            sections,
        })
        .collect())
}

/// Keyword match on the lowercased title; the first matching rule wins.
pub fn icon_for_title(title: &str) -> ChapterIcon {
    let t = title.to_lowercase();
    if t.contains("code") || t.contains("python") || t.contains("impl") {
        ChapterIcon::Code
    } else if t.contains("base") || t.contains("intro") {
        ChapterIcon::Book
    } else if t.contains("math") || t.contains("calc") {
        ChapterIcon::Lightning
    } else if t.contains("ex") || t.contains("tp") {
        ChapterIcon::Pen
    } else {
        ChapterIcon::Layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_json_response_simple() {
        let json = r#"[{"a":1}]"#;
        assert_eq!(clean_json_response(json), json);
    }

    #[test]
    fn test_clean_json_response_markdown() {
        let json = "```json\n[{\"question\": \"q\"}]\n```";
        assert_eq!(clean_json_response(json), r#"[{"question": "q"}]"#);
    }

    #[test]
    fn test_clean_json_response_with_text() {
        let json = r#"Here you go: [{"a": 1}, {"b": 2}] good luck"#;
        assert_eq!(clean_json_response(json), r#"[{"a": 1}, {"b": 2}]"#);
    }

    #[test]
    fn test_clean_json_response_object() {
        let json = r#"Sure! {"questions": []}"#;
        assert_eq!(clean_json_response(json), r#"{"questions": []}"#);
    }

    #[test]
    fn test_parse_questions() {
        let reply = r#"[
            {"question": "What is a vector?", "answer": "An element of a vector space.", "difficulty": "Easy", "type": "theory"},
            {"question": "Write a dot product.", "answer": "sum(a*b for a, b in zip(x, y))", "difficulty": "Difficile", "type": "code"},
            {"question": "Rank of I_3?", "answer": "3", "difficulty": "Moyen"}
        ]"#;
        let questions = parse_questions(reply, 1700000000000).unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(
            questions[0].id,
            QuestionId::Text("ai-1700000000000-0".to_string())
        );
        assert_eq!(questions[0].difficulty, Difficulty::Easy);
        assert_eq!(questions[1].difficulty, Difficulty::Hard);
        assert_eq!(questions[1].kind, Some(QuestionKind::Code));
        assert_eq!(questions[2].kind, None);
    }

    #[test]
    fn test_parse_questions_ids_unique_within_batch() {
        let reply = r#"[{"question":"a","answer":"1"},{"question":"b","answer":"2"},{"question":"c","answer":"3"}]"#;
        let first = parse_questions(reply, 42).unwrap();
        let second = parse_questions(reply, 42).unwrap();
        for batch in [&first, &second] {
            let ids: std::collections::HashSet<_> = batch.iter().map(|q| q.id.clone()).collect();
            assert_eq!(ids.len(), batch.len());
        }
    }

    #[test]
    fn test_parse_questions_wrapped_in_object() {
        let reply = r#"{"questions": [{"question": "q", "answer": "a", "difficulty": "Hard"}]}"#;
        let questions = parse_questions(reply, 1).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_parse_questions_invalid() {
        assert!(parse_questions("I cannot help with that.", 1).is_err());
        assert!(parse_questions(r#"[{"question": "missing answer"}]"#, 1).is_err());
    }

    #[test]
    fn test_parse_chapters() {
        let reply = r#"```json
[
  {"title": "Introduction to Vectors", "color": "bg-blue-100 text-blue-700",
   "content": [{"subtitle": "Definition", "points": ["**Vector**: an ordered tuple"]}]},
  {"title": "Python Implementation", "content": [{"subtitle": "NumPy", "points": [], "code": "np.dot(a, b)"}]},
  {"color": "bg-red-100"}
]
```"#;
        let chapters = parse_chapters(reply).unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].id, 1);
        assert_eq!(chapters[0].icon, ChapterIcon::Book);
        assert_eq!(chapters[1].id, 2);
        assert_eq!(chapters[1].icon, ChapterIcon::Code);
        assert_eq!(chapters[1].color, DEFAULT_CHAPTER_COLOR);
        assert_eq!(
            chapters[1].sections[0].code.as_deref(),
            Some("np.dot(a, b)")
        );
    }

    #[test]
    fn test_icon_for_title() {
        assert_eq!(icon_for_title("Code Review"), ChapterIcon::Code);
        assert_eq!(icon_for_title("PYTHON tricks"), ChapterIcon::Code);
        assert_eq!(icon_for_title("Implementation"), ChapterIcon::Code);
        assert_eq!(icon_for_title("Database basics"), ChapterIcon::Book);
        assert_eq!(icon_for_title("Intro"), ChapterIcon::Book);
        assert_eq!(icon_for_title("Mathematics"), ChapterIcon::Lightning);
        assert_eq!(icon_for_title("Calculus"), ChapterIcon::Lightning);
        assert_eq!(icon_for_title("Exercises"), ChapterIcon::Pen);
        assert_eq!(icon_for_title("TP 3"), ChapterIcon::Pen);
        assert_eq!(icon_for_title("Graph Theory"), ChapterIcon::Layers);
    }
}
