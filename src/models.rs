use crate::error::QuizError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Revision,
    Quiz,
    Context,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Revision, Tab::Quiz, Tab::Context];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Revision => "Revision",
            Tab::Quiz => "Quiz",
            Tab::Context => "Context",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Revision => 0,
            Tab::Quiz => 1,
            Tab::Context => 2,
        }
    }

    pub fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterIcon {
    Code,
    Book,
    Lightning,
    Pen,
    Layers,
}

impl ChapterIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            ChapterIcon::Code => "</>",
            ChapterIcon::Book => "📖",
            ChapterIcon::Lightning => "⚡",
            ChapterIcon::Pen => "✎",
            ChapterIcon::Layers => "☰",
        }
    }
}

/// One titled block of a chapter: bullet points plus an optional code snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub subtitle: String,
    #[serde(default)]
    pub points: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// A course chapter ("fiche"). Chapter sets are always swapped as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub id: u32,
    pub title: String,
    pub color: String,
    pub icon: ChapterIcon,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Lenient label parsing; models answer in English or French.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "easy" | "facile" => Difficulty::Easy,
            "hard" | "difficult" | "difficile" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Theory,
    Code,
}

impl QuestionKind {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "code" => Some(QuestionKind::Code),
            "theory" | "theorie" | "théorie" => Some(QuestionKind::Theory),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::Theory => "theory",
            QuestionKind::Code => "code",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QuestionId {
    Number(u32),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{}", n),
            QuestionId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
    pub kind: Option<QuestionKind>,
}

/// An uploaded file, base64-encoded without any `data:` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub mime_type: String,
    pub data: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub text: String,
    pub attachments: Vec<Attachment>,
    pub is_streaming: bool,
}

/// Which flow asked for a context analysis. The uploader and the chat drawer
/// share the analysis but deliver the explanation differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextOrigin {
    Upload,
    Chat,
}

/// Results of background tasks, applied by the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    QuestionsLoaded {
        generation: u64,
        result: Result<Vec<Question>, QuizError>,
    },
    CourseGenerated {
        job: u64,
        context: String,
        chapters: Vec<Chapter>,
    },
    ContextAnalyzed {
        origin: ContextOrigin,
        result: Result<String, String>,
    },
    ContextExplained {
        origin: ContextOrigin,
        text: String,
    },
    ChatAttachmentsRead(Result<Vec<Attachment>, String>),
    ChatChunk {
        id: u64,
        text: String,
    },
    ChatDone {
        id: u64,
    },
}
