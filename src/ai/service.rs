use crate::ai::client::{ChatBackend, ChatTurn};
use crate::ai::parse::parse_chapters;
use crate::ai::prompts::{
    SYSTEM_INSTRUCTION, context_engine_prompt, course_material_prompt, explain_context_prompt,
};
use crate::config::Config;
use crate::error::AiError;
use crate::logger;
use crate::models::{Attachment, Chapter};
use futures::Stream;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::sync::mpsc;

pub const MISSING_KEY_REPLY: &str = "Error: missing API key or service unavailable.";
pub const ATTACHMENT_NOTE: &str =
    "\n\n[Attachments provided but not directly processed in streaming mode]";
pub const EXPLAIN_FALLBACK: &str = "Unable to explain the context.";

/// A streamed assistant reply: finite, lazy and not restartable.
///
/// Failures never surface as a separate channel; they arrive as a final
/// inline `[Connection error: ...]` chunk.
#[derive(Debug)]
pub struct ReplyStream {
    rx: mpsc::Receiver<String>,
}

#[cfg(test)]
impl ReplyStream {
    /// Drain the stream into the full reply text.
    pub async fn into_text(mut self) -> String {
        let mut text = String::new();
        while let Some(chunk) = self.rx.recv().await {
            text.push_str(&chunk);
        }
        text
    }
}

impl Stream for ReplyStream {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<String>> {
        self.rx.poll_recv(cx)
    }
}

/// Chat and context operations over the remote model. Owns the conversation
/// history used to build follow-up chat requests.
pub struct ChatService {
    backend: Option<Arc<dyn ChatBackend>>,
    history: Arc<Mutex<Vec<ChatTurn>>>,
    temperature: f32,
    max_document_chars: usize,
}

impl ChatService {
    pub fn new(backend: Option<Arc<dyn ChatBackend>>, config: &Config) -> Self {
        Self {
            backend,
            history: Arc::new(Mutex::new(Vec::new())),
            temperature: config.chat_temperature,
            max_document_chars: config.max_document_chars,
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn send_message_stream(&self, message: &str, attachments: &[Attachment]) -> ReplyStream {
        let (tx, rx) = mpsc::channel(64);

        let Some(backend) = self.backend.clone() else {
            let _ = tx.try_send(MISSING_KEY_REPLY.to_string());
            return ReplyStream { rx };
        };

        let mut content = message.to_string();
        if !attachments.is_empty() {
            content.push_str(ATTACHMENT_NOTE);
        }

        let messages = {
            let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
            history.push(ChatTurn::user(content));
            let mut messages = Vec::with_capacity(history.len() + 1);
            messages.push(ChatTurn::system(SYSTEM_INSTRUCTION));
            messages.extend(history.iter().cloned());
            messages
        };

        let history = Arc::clone(&self.history);
        let temperature = self.temperature;
        tokio::spawn(async move {
            let mut reply = String::new();
            let mut failure = None;

            match backend.stream(messages, temperature).await {
                Ok(mut chunks) => {
                    while let Some(item) = chunks.recv().await {
                        match item {
                            Ok(delta) => {
                                reply.push_str(&delta);
                                // A dropped receiver still lets the reply land in history.
                                let _ = tx.send(delta).await;
                            }
                            Err(e) => {
                                failure = Some(e);
                                break;
                            }
                        }
                    }
                }
                Err(e) => failure = Some(e),
            }

            match failure {
                Some(e) => {
                    logger::log(&format!("Chat error: {}", e));
                    let _ = tx.send(format!("\n\n[Connection error: {}]", e)).await;
                }
                None if !reply.is_empty() => {
                    history
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .push(ChatTurn::assistant(reply));
                }
                None => {}
            }
        });

        ReplyStream { rx }
    }

    /// Summarize the uploaded documents into a structured learning context.
    /// Returns an empty string when nothing could be extracted.
    pub async fn analyze_document_for_context(&self, attachments: &[Attachment]) -> String {
        if attachments.is_empty() {
            return String::new();
        }
        let Some(backend) = &self.backend else {
            logger::log("Context analysis skipped: no API key");
            return String::new();
        };

        let messages = vec![
            ChatTurn::system(SYSTEM_INSTRUCTION),
            ChatTurn::user(context_engine_prompt(attachments, self.max_document_chars)),
        ];

        match backend.complete(messages, self.temperature).await {
            Ok(summary) => {
                logger::log(&format!("New context extracted: {}", summary));
                summary.trim().to_string()
            }
            Err(e) => {
                logger::log(&format!("Context analysis error: {}", e));
                String::new()
            }
        }
    }

    pub async fn explain_learning_context(&self, context: &str) -> String {
        if context.is_empty() {
            return String::new();
        }
        let Some(backend) = &self.backend else {
            return String::new();
        };

        let messages = vec![
            ChatTurn::system(SYSTEM_INSTRUCTION),
            ChatTurn::user(explain_context_prompt(context)),
        ];

        match backend.complete(messages, self.temperature).await {
            Ok(text) => text,
            Err(AiError::EmptyResponse) => {
                logger::log("Context explanation came back empty");
                EXPLAIN_FALLBACK.to_string()
            }
            Err(e) => {
                logger::log(&format!("Context explanation error: {}", e));
                String::new()
            }
        }
    }

    /// Generate 3-5 chapters from the context. Any failure yields an empty
    /// set so the caller keeps its current chapters.
    pub async fn generate_learning_material(&self, context: &str) -> Vec<Chapter> {
        if context.is_empty() {
            return Vec::new();
        }
        let Some(backend) = &self.backend else {
            return Vec::new();
        };

        let messages = vec![
            ChatTurn::system(SYSTEM_INSTRUCTION),
            ChatTurn::user(course_material_prompt(context)),
        ];

        let result = backend
            .complete(messages, self.temperature)
            .await
            .and_then(|reply| parse_chapters(&reply));

        match result {
            Ok(chapters) => chapters,
            Err(e) => {
                logger::log(&format!("Course generation error: {}", e));
                Vec::new()
            }
        }
    }

    pub fn clear_history(&self) {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    pub fn history(&self) -> Vec<ChatTurn> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
