mod ai;
mod provider;
mod static_bank;

pub use ai::{AiQuestionProvider, NO_CONTEXT_SUBJECT, extract_subject};
pub use provider::{QuestionProvider, provider_for};
pub use static_bank::{StaticQuestionProvider, static_questions};
