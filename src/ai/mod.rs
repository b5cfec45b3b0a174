pub mod client;
pub mod parse;
pub mod prompts;
pub mod service;
pub mod stream;

// Public API exports
pub use client::{ChatBackend, ChatTurn, ChunkReceiver, OpenRouterClient};
pub use parse::{clean_json_response, icon_for_title, parse_chapters, parse_questions};
pub use service::{ChatService, ReplyStream};
pub use stream::SseDecoder;
