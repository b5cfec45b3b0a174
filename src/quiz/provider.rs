use crate::ai::ChatBackend;
use crate::config::Config;
use crate::error::QuizError;
use crate::models::Question;
use crate::quiz::{AiQuestionProvider, StaticQuestionProvider};
use async_trait::async_trait;
use std::sync::Arc;

/// Supplies a batch of quiz questions, optionally steered by the learning
/// context.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    async fn get_questions(&self, context: Option<&str>) -> Result<Vec<Question>, QuizError>;
}

/// Pick the provider for the current quiz mode.
pub fn provider_for(
    use_ai: bool,
    backend: Option<Arc<dyn ChatBackend>>,
    config: &Config,
) -> Arc<dyn QuestionProvider> {
    if use_ai {
        Arc::new(AiQuestionProvider::new(backend, config.quiz_temperature))
    } else {
        Arc::new(StaticQuestionProvider::new(config.static_delay))
    }
}
