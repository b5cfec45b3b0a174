pub mod ai;
pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod input;
pub mod logger;
pub mod models;
pub mod quiz;
pub mod ui;
pub mod upload;
pub mod utils;

// Re-exports for convenience
pub use ai::{ChatBackend, ChatService, OpenRouterClient};
pub use app::App;
pub use catalog::default_chapters;
pub use config::{Cli, Config};
pub use error::{AiError, QuizError, UploadError};
pub use models::{AppEvent, Attachment, Chapter, ChatMessage, Question};
pub use quiz::{QuestionProvider, provider_for};
pub use utils::markdown::render_markdown;
