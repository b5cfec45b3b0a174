use crate::ai::{ChatBackend, ChatService};
use crate::catalog::default_chapters;
use crate::config::Config;
use crate::logger;
use crate::models::{
    AppEvent, Attachment, Chapter, ChatMessage, ChatRole, ContextOrigin, Question, Tab,
};
use crate::quiz::provider_for;
use crate::upload::read_attachments;
use futures::StreamExt;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

pub const WELCOME_MESSAGE: &str = "Hello! I'm StudyBot 🤖. Attach your course files (PDF, TXT) so I can help you revise, or just ask me a question.";
pub const CLEARED_MESSAGE: &str = "Memory cleared. You can send new documents.";
pub const GENERIC_ERROR: &str = "An error occurred";
pub const UPLOAD_ALERT: &str = "Error while analyzing the files.";

/// Chat drawer state. Message ids are local to the panel.
#[derive(Debug)]
pub struct ChatPanel {
    pub open: bool,
    pub messages: Vec<ChatMessage>,
    pub input_buffer: String,
    pub cursor_position: usize,
    pub attachments: Vec<Attachment>,
    /// Path entry line, present while the attach prompt is open.
    pub attach_input: Option<String>,
    pub is_typing: bool,
    /// Attached documents are being turned into a learning context.
    pub analyzing: bool,
    pub scroll_y: u16,
    pub max_scroll: u16,
    /// Keep the view pinned to the newest message.
    pub follow: bool,
    next_id: u64,
}

impl ChatPanel {
    fn new() -> Self {
        let mut panel = Self {
            open: false,
            messages: Vec::new(),
            input_buffer: String::new(),
            cursor_position: 0,
            attachments: Vec::new(),
            attach_input: None,
            is_typing: false,
            analyzing: false,
            scroll_y: 0,
            max_scroll: 0,
            follow: true,
            next_id: 0,
        };
        panel.push(ChatRole::Assistant, WELCOME_MESSAGE.to_string(), Vec::new(), false);
        panel
    }

    fn push(
        &mut self,
        role: ChatRole,
        text: String,
        attachments: Vec<Attachment>,
        is_streaming: bool,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id,
            role,
            text,
            attachments,
            is_streaming,
        });
        self.follow = true;
        id
    }

    fn message_mut(&mut self, id: u64) -> Option<&mut ChatMessage> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    /// A reply is streaming or an attachment analysis is pending.
    pub fn is_busy(&self) -> bool {
        self.is_typing || self.analyzing
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_y = self.scroll_y.saturating_sub(lines);
        self.follow = false;
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_y = (self.scroll_y + lines).min(self.max_scroll);
        self.follow = self.scroll_y >= self.max_scroll;
    }
}

/// Application state controller. Owns every collection the UI renders;
/// background work reports back through `AppEvent`s.
pub struct App {
    pub config: Config,
    pub tab: Tab,
    pub chapters: Vec<Chapter>,
    pub current_chapter_id: u32,
    pub chapter_scroll: u16,
    pub sidebar_open: bool,

    pub use_ai: bool,
    pub questions: Vec<Question>,
    pub revealed: HashSet<usize>,
    pub selected_question: usize,
    pub quiz_loading: bool,
    pub quiz_error: Option<String>,

    pub global_context: String,
    pub analyzing_upload: bool,
    pub upload_input: String,
    pub alert: Option<String>,
    pub chat: ChatPanel,
    pub should_quit: bool,

    backend: Option<Arc<dyn ChatBackend>>,
    service: Arc<ChatService>,
    events: UnboundedSender<AppEvent>,
    quiz_deps: (Tab, bool, String),
    quiz_generation: u64,
    quiz_fetches: u64,
    pending_course_jobs: usize,
    next_course_job: u64,
    /// Steps of the current upload still in flight. `analyzing_upload`
    /// clears once both are done.
    upload_course_job: Option<u64>,
    upload_explaining: bool,
}

impl App {
    pub fn new(
        config: Config,
        backend: Option<Arc<dyn ChatBackend>>,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        let service = Arc::new(ChatService::new(backend.clone(), &config));
        let use_ai = config.start_in_ai_mode;

        Self {
            tab: Tab::Revision,
            chapters: default_chapters(),
            current_chapter_id: 1,
            chapter_scroll: 0,
            sidebar_open: true,
            use_ai,
            questions: Vec::new(),
            revealed: HashSet::new(),
            selected_question: 0,
            quiz_loading: false,
            quiz_error: None,
            global_context: String::new(),
            analyzing_upload: false,
            upload_input: String::new(),
            alert: None,
            chat: ChatPanel::new(),
            should_quit: false,
            backend,
            service,
            events,
            quiz_deps: (Tab::Revision, use_ai, String::new()),
            quiz_generation: 0,
            quiz_fetches: 0,
            pending_course_jobs: 0,
            next_course_job: 0,
            upload_course_job: None,
            upload_explaining: false,
            config,
        }
    }

    pub fn has_ai(&self) -> bool {
        self.service.is_available()
    }

    pub fn generating_course(&self) -> bool {
        self.pending_course_jobs > 0
    }

    /// Number of quiz fetches started so far.
    pub fn quiz_fetches(&self) -> u64 {
        self.quiz_fetches
    }

    pub fn current_chapter(&self) -> Option<&Chapter> {
        self.chapters
            .iter()
            .find(|c| c.id == self.current_chapter_id)
            .or_else(|| self.chapters.first())
    }

    // ---- tabs & quiz ----

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.sync_quiz();
    }

    pub fn set_use_ai(&mut self, use_ai: bool) {
        self.use_ai = use_ai;
        self.sync_quiz();
    }

    pub fn toggle_ai(&mut self) {
        self.set_use_ai(!self.use_ai);
    }

    /// Start a fetch when the quiz dependencies changed while the quiz tab
    /// is showing.
    pub fn sync_quiz(&mut self) {
        let deps = (self.tab, self.use_ai, self.global_context.clone());
        if deps == self.quiz_deps {
            return;
        }
        self.quiz_deps = deps;
        if self.tab == Tab::Quiz {
            self.load_questions();
        }
    }

    pub fn load_questions(&mut self) {
        self.questions.clear();
        self.revealed.clear();
        self.selected_question = 0;
        self.quiz_error = None;
        self.quiz_loading = true;
        self.quiz_generation += 1;
        self.quiz_fetches += 1;

        let generation = self.quiz_generation;
        let provider = provider_for(self.use_ai, self.backend.clone(), &self.config);
        let context = (!self.global_context.is_empty()).then(|| self.global_context.clone());
        let tx = self.events.clone();

        logger::log(&format!(
            "Loading questions (generation {}, ai: {})",
            generation, self.use_ai
        ));

        tokio::spawn(async move {
            let result = provider.get_questions(context.as_deref()).await;
            let _ = tx.send(AppEvent::QuestionsLoaded { generation, result });
        });
    }

    pub fn toggle_reveal(&mut self, index: usize) {
        if index >= self.questions.len() {
            return;
        }
        if !self.revealed.remove(&index) {
            self.revealed.insert(index);
        }
    }

    pub fn select_next_question(&mut self) {
        if self.selected_question + 1 < self.questions.len() {
            self.selected_question += 1;
        }
    }

    pub fn select_prev_question(&mut self) {
        self.selected_question = self.selected_question.saturating_sub(1);
    }

    // ---- chapters ----

    pub fn select_chapter(&mut self, id: u32) {
        if self.chapters.iter().any(|c| c.id == id) {
            self.current_chapter_id = id;
            self.chapter_scroll = 0;
        }
    }

    fn current_chapter_index(&self) -> usize {
        self.chapters
            .iter()
            .position(|c| c.id == self.current_chapter_id)
            .unwrap_or(0)
    }

    pub fn next_chapter(&mut self) {
        let index = self.current_chapter_index();
        if let Some(next) = self.chapters.get(index + 1) {
            let id = next.id;
            self.select_chapter(id);
        }
    }

    pub fn prev_chapter(&mut self) {
        let index = self.current_chapter_index();
        if index > 0 {
            let id = self.chapters[index - 1].id;
            self.select_chapter(id);
        }
    }

    // ---- learning context ----

    /// Replace the global context. An empty context restores the built-in
    /// course; anything else regenerates chapters in the background.
    pub fn submit_context(&mut self, context: String) {
        self.apply_context(context);
    }

    /// Returns the id of the course job started for a non-empty context.
    fn apply_context(&mut self, context: String) -> Option<u64> {
        self.global_context = context;

        let job = if self.global_context.is_empty() {
            self.chapters = default_chapters();
            self.current_chapter_id = 1;
            self.chapter_scroll = 0;
            None
        } else {
            self.pending_course_jobs += 1;
            self.next_course_job += 1;
            let job = self.next_course_job;
            let service = Arc::clone(&self.service);
            let context = self.global_context.clone();
            let tx = self.events.clone();
            tokio::spawn(async move {
                let chapters = service.generate_learning_material(&context).await;
                let _ = tx.send(AppEvent::CourseGenerated {
                    job,
                    context,
                    chapters,
                });
            });
            Some(job)
        };

        self.sync_quiz();
        job
    }

    fn finish_upload_step(&mut self) {
        if self.upload_course_job.is_none() && !self.upload_explaining {
            self.analyzing_upload = false;
        }
    }

    /// Read the files, derive a learning context from them and apply it.
    pub fn upload_files(&mut self, paths: Vec<PathBuf>) {
        self.analyzing_upload = true;
        let service = Arc::clone(&self.service);
        let tx = self.events.clone();

        tokio::spawn(async move {
            let result = match read_attachments(&paths).await {
                Ok(attachments) => Ok(service.analyze_document_for_context(&attachments).await),
                Err(e) => {
                    logger::log(&format!("Upload error: {}", e));
                    Err(e.to_string())
                }
            };
            let _ = tx.send(AppEvent::ContextAnalyzed {
                origin: ContextOrigin::Upload,
                result,
            });
        });
    }

    fn spawn_explanation(&self, origin: ContextOrigin, context: String) {
        let service = Arc::clone(&self.service);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let text = service.explain_learning_context(&context).await;
            let _ = tx.send(AppEvent::ContextExplained { origin, text });
        });
    }

    // ---- chat ----

    pub fn toggle_chat(&mut self) {
        self.chat.open = !self.chat.open;
    }

    pub fn chat_send(&mut self) {
        if (self.chat.input_buffer.trim().is_empty() && self.chat.attachments.is_empty())
            || self.chat.is_busy()
        {
            return;
        }

        let text = std::mem::take(&mut self.chat.input_buffer);
        self.chat.cursor_position = 0;
        let attachments = std::mem::take(&mut self.chat.attachments);

        let reply = self.service.send_message_stream(&text, &attachments);
        self.chat.push(ChatRole::User, text, attachments, false);
        let id = self.chat.push(ChatRole::Assistant, String::new(), Vec::new(), true);
        self.chat.is_typing = true;

        let tx = self.events.clone();
        tokio::spawn(async move {
            let mut reply = reply;
            while let Some(text) = reply.next().await {
                let _ = tx.send(AppEvent::ChatChunk { id, text });
            }
            let _ = tx.send(AppEvent::ChatDone { id });
        });
    }

    pub fn chat_attach(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = read_attachments(&paths).await.map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::ChatAttachmentsRead(result));
        });
    }

    pub fn chat_remove_attachment(&mut self, index: usize) {
        if index < self.chat.attachments.len() {
            self.chat.attachments.remove(index);
        }
    }

    pub fn clear_chat(&mut self) {
        self.service.clear_history();
        self.chat.messages.clear();
        self.chat.push(ChatRole::Assistant, CLEARED_MESSAGE.to_string(), Vec::new(), false);
        self.chat.attachments.clear();
        self.chat.scroll_y = 0;
        self.submit_context(String::new());
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    // ---- background results ----

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::QuestionsLoaded { generation, result } => {
                if generation != self.quiz_generation {
                    logger::log(&format!("Dropping stale question batch {}", generation));
                    return;
                }
                self.quiz_loading = false;
                match result {
                    Ok(questions) => self.questions = questions,
                    Err(e) => {
                        let message = e.to_string();
                        self.quiz_error = Some(if message.is_empty() {
                            GENERIC_ERROR.to_string()
                        } else {
                            message
                        });
                    }
                }
            }
            AppEvent::CourseGenerated {
                job,
                context,
                chapters,
            } => {
                self.pending_course_jobs = self.pending_course_jobs.saturating_sub(1);
                if self.upload_course_job == Some(job) {
                    self.upload_course_job = None;
                    self.finish_upload_step();
                }
                if context != self.global_context {
                    logger::log("Dropping course generated for an outdated context");
                    return;
                }
                if !chapters.is_empty() {
                    self.chapters = chapters;
                    self.current_chapter_id = 1;
                    self.chapter_scroll = 0;
                    self.set_tab(Tab::Revision);
                }
            }
            AppEvent::ContextAnalyzed { origin, result } => match (origin, result) {
                (ContextOrigin::Upload, Ok(summary)) => {
                    if summary.is_empty() {
                        self.analyzing_upload = false;
                    } else {
                        self.upload_course_job = self.apply_context(summary.clone());
                        self.upload_explaining = true;
                        self.spawn_explanation(origin, summary);
                    }
                }
                (ContextOrigin::Upload, Err(_)) => {
                    self.analyzing_upload = false;
                    self.alert = Some(UPLOAD_ALERT.to_string());
                }
                (ContextOrigin::Chat, Ok(summary)) if !summary.is_empty() => {
                    self.submit_context(summary.clone());
                    self.spawn_explanation(origin, summary);
                }
                (ContextOrigin::Chat, _) => self.chat.analyzing = false,
            },
            AppEvent::ContextExplained { origin, text } => match origin {
                ContextOrigin::Upload => {
                    logger::log(&format!("Context explanation: {}", text));
                    self.upload_explaining = false;
                    self.finish_upload_step();
                }
                ContextOrigin::Chat => {
                    if !text.is_empty() {
                        self.chat.push(ChatRole::Assistant, text, Vec::new(), false);
                    }
                    self.chat.analyzing = false;
                }
            },
            AppEvent::ChatAttachmentsRead(Ok(attachments)) => {
                self.chat.attachments.extend(attachments.iter().cloned());
                self.chat.analyzing = true;

                let service = Arc::clone(&self.service);
                let tx = self.events.clone();
                tokio::spawn(async move {
                    let summary = service.analyze_document_for_context(&attachments).await;
                    let _ = tx.send(AppEvent::ContextAnalyzed {
                        origin: ContextOrigin::Chat,
                        result: Ok(summary),
                    });
                });
            }
            AppEvent::ChatAttachmentsRead(Err(message)) => {
                logger::log(&format!("Attachment error: {}", message));
                self.alert = Some(message);
            }
            AppEvent::ChatChunk { id, text } => {
                if let Some(message) = self.chat.message_mut(id) {
                    message.text.push_str(&text);
                }
            }
            AppEvent::ChatDone { id } => {
                if let Some(message) = self.chat.message_mut(id) {
                    message.is_streaming = false;
                }
                self.chat.is_typing = false;
            }
        }
    }
}
