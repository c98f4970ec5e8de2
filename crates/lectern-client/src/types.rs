//! Backend API payload types.
//!
//! Shapes mirror the backend's JSON responses. Deserialization tolerates
//! unknown fields throughout (the backend decorates some responses with
//! source-specific extras like `video_id` or `filename`).

use lectern_core::{ChatMessage, ChatRole};
use serde::Deserialize;

/// A processed study session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionInfo {
    pub id: String,
    pub title: String,
    /// "youtube" or "pdf".
    pub source_type: String,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Result of ingesting a video or PDF into a new session.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessResult {
    pub session_id: String,
    pub title: String,
    pub word_count: u64,
    pub chunk_count: u64,
    pub message: String,
}

/// One flashcard.
#[derive(Debug, Clone, Deserialize)]
pub struct Flashcard {
    #[serde(default)]
    pub id: Option<String>,
    pub front: String,
    pub back: String,
}

/// A generated or retrieved flashcard set.
#[derive(Debug, Clone, Deserialize)]
pub struct FlashcardSet {
    pub session_id: String,
    /// Present on generation responses, absent on retrieval.
    #[serde(default)]
    pub session_title: Option<String>,
    pub flashcards: Vec<Flashcard>,
}

/// One quiz question as exposed to clients (no correct answer).
#[derive(Debug, Clone, Deserialize)]
pub struct QuizQuestion {
    /// Absent on generation responses; retrieval includes it, and it is
    /// required for answer evaluation.
    #[serde(default)]
    pub id: Option<String>,
    pub question: String,
    pub options: Vec<String>,
}

/// A generated or retrieved quiz.
#[derive(Debug, Clone, Deserialize)]
pub struct Quiz {
    pub session_id: String,
    #[serde(default)]
    pub session_title: Option<String>,
    pub questions: Vec<QuizQuestion>,
}

/// Verdict for one submitted quiz answer.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerEvaluation {
    pub is_correct: bool,
    /// 0-indexed into the question's options.
    pub correct_answer: usize,
    pub explanation: String,
    pub selected_answer: usize,
}

/// A stored chat message, as returned by the history endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryMessage {
    pub role: ChatRole,
    pub content: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl From<HistoryMessage> for ChatMessage {
    fn from(msg: HistoryMessage) -> Self {
        Self {
            role: msg.role,
            content: msg.content,
        }
    }
}

/// Prior messages for a session.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatHistory {
    pub session_id: String,
    pub messages: Vec<HistoryMessage>,
}

impl ChatHistory {
    /// Convert into core messages, ready to seed a conversation.
    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages.into_iter().map(Into::into).collect()
    }
}
