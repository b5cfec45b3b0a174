use crate::models::Attachment;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

pub const SYSTEM_INSTRUCTION: &str = r#"You are "StudyBot", a teaching assistant.

INTERACTION RULES:
- If the user sends a document, use it as the primary source of truth.
- Be concise and pedagogical.
- Use Markdown formatting."#;

pub const CONTEXT_ENGINE_PROMPT: &str = r#"You are the Context Engine of an adaptive learning application.

Your task is to dynamically generate and update the GLOBAL LEARNING CONTEXT based on the provided documents.

Your responsibilities:
1. Identify the academic domain
2. Extract the main topics and subtopics
3. Detect the current learning focus
4. Produce an exam-oriented context
5. Keep the context concise and reusable

Rules:
- The context MUST change when the content changes
- Do NOT reuse previous context if new information is provided
- Avoid generic or static domains
- Focus on what the student should be examined on

Return ONLY a structured context in this format:

Domain: [Domain Name]
Main Topics:
- [Topic 1]
- ...

Subtopics:
- [Subtopic 1]
- ...

Exam Focus:
- [Specific Concept to Test]
- ...

Difficulty Level:
(beginner | intermediate | advanced)"#;

pub fn context_engine_prompt(attachments: &[Attachment], max_chars: usize) -> String {
    format!(
        "{}\n\nDOCUMENTS:\n{}",
        CONTEXT_ENGINE_PROMPT,
        document_digest(attachments, max_chars)
    )
}

pub fn explain_context_prompt(context: &str) -> String {
    format!(
        r#"You are the Context Explanation Engine of an adaptive learning application.

Your role is to explain to the user what the application has understood
as the CURRENT LEARNING CONTEXT.

Input Context:
{context}

Instructions:
- Explain the context in a clear, student-friendly way
- Be concise and structured
- Focus on exam preparation
- Do NOT introduce new topics
- Do NOT repeat raw technical data

Return the result in the following format:

📘 Current Learning Domain:
<short description>

🎯 Active Topics:
- ...
- ...

🧠 What you should focus on:
- ...

❓ Typical exam questions:
- ...

⚠️ Common mistakes to avoid:
- ..."#
    )
}

pub fn course_material_prompt(context: &str) -> String {
    format!(
        r#"LEARNING CONTEXT:
{context}

TASK: You are an instructional designer. Build a structured course of 3 to 5 chapters based strictly on the structured context above.

CONSTRAINTS:
- Use the "Main Topics" and "Subtopics" of the context to define the chapters.
- Each chapter has a title, a color (Tailwind CSS classes such as "bg-blue-100 text-blue-700") and content.
- Content includes key points and, when relevant, a short code snippet (Python or pseudocode).
- Answer ONLY with a JSON array, no text before or after. Format:
[
  {{
    "title": "...",
    "color": "bg-blue-100 text-blue-700",
    "content": [
      {{ "subtitle": "...", "points": ["...", "..."], "code": "optional" }}
    ]
  }}
]"#
    )
}

pub fn quiz_prompt(subject: &str, context: Option<&str>) -> String {
    let context_instruction = match context {
        Some(context) => format!(
            "SUBJECT: {subject}\n\nKNOWLEDGE BASE:\n{context}\n\nGenerate questions based EXCLUSIVELY on these topics."
        ),
        None => format!("Cannot generate questions without context. {subject}"),
    };

    format!(
        r#"{context_instruction}

TASK: Generate 3 difficult, technical exam questions.

CONSTRAINTS:
- At least one question must ask to write or analyze code (when relevant to the subject).
- At least one question must be conceptual or mathematical.
- Answers must be concise, pedagogical and precise.

Answer ONLY with a JSON array (no text before or after). Format:
[
  {{
    "question": "...",
    "answer": "...",
    "difficulty": "Easy|Medium|Hard",
    "type": "code|theory"
  }}
]"#
    )
}

/// Render attachments for the context engine. Text documents are decoded and
/// inlined up to `max_chars` each; binary documents are listed by name.
pub fn document_digest(attachments: &[Attachment], max_chars: usize) -> String {
    let mut digest = String::new();

    for attachment in attachments {
        digest.push_str(&format!(
            "--- Document: {} ({}) ---\n",
            attachment.name, attachment.mime_type
        ));

        let text = is_textual(&attachment.mime_type)
            .then(|| STANDARD.decode(&attachment.data).ok())
            .flatten()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned());

        match text {
            Some(text) => {
                let truncated: String = text.chars().take(max_chars).collect();
                digest.push_str(&truncated);
                if text.chars().count() > max_chars {
                    digest.push_str("\n[... truncated]");
                }
            }
            None => digest.push_str("[binary content not inlined]"),
        }
        digest.push_str("\n\n");
    }

    digest
}

fn is_textual(mime_type: &str) -> bool {
    mime_type.starts_with("text/")
        || matches!(
            mime_type,
            "application/json" | "application/javascript" | "application/x-python"
        )
}
