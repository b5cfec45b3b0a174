use crate::ai::prompts::quiz_prompt;
use crate::ai::{ChatBackend, ChatTurn, parse_questions};
use crate::error::QuizError;
use crate::logger;
use crate::models::Question;
use crate::quiz::QuestionProvider;
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;

pub const NO_CONTEXT_SUBJECT: &str =
    "Please provide a learning context to generate relevant questions.";

lazy_static::lazy_static! {
    static ref DOMAIN_RE: Regex = Regex::new(r"(?i)Domain:\s*(.+)").unwrap();
}

/// Subject label for the prompt: the `Domain:` value when present, else the
/// first line of the context.
pub fn extract_subject(context: Option<&str>) -> String {
    let Some(context) = context.filter(|c| !c.is_empty()) else {
        return NO_CONTEXT_SUBJECT.to_string();
    };

    if let Some(caps) = DOMAIN_RE.captures(context) {
        return caps[1].trim().to_string();
    }

    context.lines().next().unwrap_or_default().trim().to_string()
}

/// Questions generated by the remote model from the learning context.
pub struct AiQuestionProvider {
    backend: Option<Arc<dyn ChatBackend>>,
    temperature: f32,
}

impl AiQuestionProvider {
    pub fn new(backend: Option<Arc<dyn ChatBackend>>, temperature: f32) -> Self {
        Self {
            backend,
            temperature,
        }
    }
}

#[async_trait]
impl QuestionProvider for AiQuestionProvider {
    async fn get_questions(&self, context: Option<&str>) -> Result<Vec<Question>, QuizError> {
        let backend = self.backend.as_ref().ok_or(QuizError::MissingCredentials)?;

        let context = context.filter(|c| !c.is_empty());
        let subject = extract_subject(context);
        let messages = vec![ChatTurn::user(quiz_prompt(&subject, context))];

        let stamp = chrono::Utc::now().timestamp_millis();
        let result = backend
            .complete(messages, self.temperature)
            .await
            .and_then(|reply| parse_questions(&reply, stamp));

        result.map_err(|e| {
            logger::log(&format!("AI question provider error: {}", e));
            QuizError::Generation
        })
    }
}
