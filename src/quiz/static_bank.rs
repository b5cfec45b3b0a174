use crate::error::QuizError;
use crate::models::{Difficulty, Question, QuestionId};
use crate::quiz::QuestionProvider;
use async_trait::async_trait;
use std::time::Duration;

const STATIC_BANK: [(&str, &str, Difficulty); 7] = [
    (
        "What is the main advantage of neuro-symbolic AI over classic deep learning?",
        "It combines the learning ability of neural networks with the explainability and reasoning of symbolic logic.",
        Difficulty::Medium,
    ),
    (
        "How do Spiking Neural Networks (SNN) differ from traditional ANNs?",
        "They process information as timed impulses (spikes), which mimics the biological brain more closely and uses far less energy.",
        Difficulty::Hard,
    ),
    (
        "What is the main responsibility of an MLOps engineer?",
        "Industrializing models: automated deployment (CI/CD), production monitoring and model lifecycle management.",
        Difficulty::Easy,
    ),
    (
        "What is the 'data drift' an AI engineer has to monitor?",
        "The distribution of real production data moving away from the training distribution, which degrades performance.",
        Difficulty::Medium,
    ),
    (
        "What does a Liquid Neural Network bring compared to a classic RNN?",
        "It keeps adapting in real time after training, which makes it more robust in changing environments.",
        Difficulty::Hard,
    ),
    (
        "In GPU optimization, what is a CUDA kernel?",
        "A low-level function executed directly on the GPU to massively parallelize matrix computations.",
        Difficulty::Hard,
    ),
    (
        "What is the goal of knowledge distillation?",
        "Transferring the knowledge of a large model (teacher) to a smaller one (student) to cut inference cost while keeping performance.",
        Difficulty::Medium,
    ),
];

/// The fixed built-in question set, ids 1 to 7.
pub fn static_questions() -> Vec<Question> {
    STATIC_BANK
        .iter()
        .enumerate()
        .map(|(i, (question, answer, difficulty))| Question {
            id: QuestionId::Number(i as u32 + 1),
            question: question.to_string(),
            answer: answer.to_string(),
            difficulty: *difficulty,
            kind: None,
        })
        .collect()
}

/// Hardcoded provider. Ignores the context and answers after a fixed delay.
#[derive(Debug, Clone)]
pub struct StaticQuestionProvider {
    delay: Duration,
}

impl StaticQuestionProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl QuestionProvider for StaticQuestionProvider {
    async fn get_questions(&self, _context: Option<&str>) -> Result<Vec<Question>, QuizError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(static_questions())
    }
}
