//! The conversation state machine.
//!
//! One [`Conversation`] owns the ordered message log for a chat session and
//! applies decoded stream events as transitions. It holds two invariants:
//! at most one message is in flight at any time, and that message is always
//! the last entry and always the assistant's. Renderers never touch the log
//! directly; they read cloned snapshots after each transition.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::message::ChatMessage;

/// Shown when an exchange fails without a usable error message.
pub const FALLBACK_ERROR: &str = "Failed to get response. Please try again.";

/// Unique identifier for an exchange.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExchangeId(pub String);

impl ExchangeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ExchangeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the conversation is in the exchange lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No exchange in flight; submissions are accepted.
    #[default]
    Idle,
    /// User and placeholder messages appended, awaiting the first event.
    Sending,
    /// At least one content event applied.
    Streaming,
}

/// One in-flight exchange: a user submission and its streamed response.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub id: ExchangeId,
    pub started_at: DateTime<Utc>,
}

/// Ordered message log plus exchange lifecycle for one chat session.
///
/// Create one per chat view and drop it on navigation; state never lives
/// outside the session object.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    phase: Phase,
    exchange: Option<Exchange>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the log with prior history from the backend.
    pub fn with_history(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            phase: Phase::Idle,
            exchange: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while an exchange is in flight; gates new submissions.
    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn exchange(&self) -> Option<&Exchange> {
        self.exchange.as_ref()
    }

    /// Read-only copy of the log for rendering.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }

    /// Open a new exchange.
    ///
    /// Accepted only while idle and only for non-empty trimmed input. The
    /// user message and the empty assistant placeholder are appended
    /// together, so the log never holds one without the other. Returns the
    /// exchange id, or `None` when the submission was rejected.
    pub fn submit(&mut self, text: &str) -> Option<ExchangeId> {
        if self.phase != Phase::Idle {
            log::warn!("submit rejected: exchange already in flight");
            return None;
        }
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.messages.push(ChatMessage::user(text));
        self.messages.push(ChatMessage::assistant(""));

        let exchange = Exchange {
            id: ExchangeId::new(),
            started_at: Utc::now(),
        };
        let id = exchange.id.clone();
        self.exchange = Some(exchange);
        self.phase = Phase::Sending;
        Some(id)
    }

    /// Append streamed text to the in-flight assistant message.
    pub fn on_content(&mut self, text: &str) {
        if !self.is_busy() {
            log::warn!("content event with no exchange in flight; ignoring");
            return;
        }
        if let Some(last) = self.messages.last_mut() {
            last.content.push_str(text);
        }
        self.phase = Phase::Streaming;
    }

    /// Terminate the exchange with a visible error.
    ///
    /// The in-flight assistant content is replaced, not appended to.
    pub fn on_error(&mut self, message: &str) {
        if !self.is_busy() {
            return;
        }
        let detail = if message.trim().is_empty() {
            FALLBACK_ERROR
        } else {
            message
        };
        if let Some(last) = self.messages.last_mut() {
            last.content = format!("Error: {detail}");
        }
        self.end_exchange();
    }

    /// Terminate the exchange after a transport-level failure.
    pub fn on_transport_failure(&mut self) {
        self.on_error("");
    }

    /// Close out a normally completed exchange, keeping its content as-is.
    pub fn on_stream_end(&mut self) {
        if !self.is_busy() {
            return;
        }
        self.end_exchange();
    }

    fn end_exchange(&mut self) {
        self.exchange = None;
        self.phase = Phase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod submit {
        use super::*;

        #[test]
        fn appends_user_and_placeholder() {
            let mut convo = Conversation::new();
            let id = convo.submit("hello");

            assert!(id.is_some());
            assert_eq!(
                convo.snapshot(),
                vec![ChatMessage::user("hello"), ChatMessage::assistant("")]
            );
            assert_eq!(convo.phase(), Phase::Sending);
            assert!(convo.is_busy());
        }

        #[test]
        fn trims_input() {
            let mut convo = Conversation::new();
            convo.submit("  hello  ");
            assert_eq!(convo.snapshot()[0], ChatMessage::user("hello"));
        }

        #[test]
        fn rejects_empty_input() {
            let mut convo = Conversation::new();
            assert!(convo.submit("").is_none());
            assert!(convo.submit("   \n").is_none());
            assert!(convo.snapshot().is_empty());
            assert_eq!(convo.phase(), Phase::Idle);
        }

        #[test]
        fn rejected_while_sending() {
            let mut convo = Conversation::new();
            convo.submit("first");
            let before = convo.snapshot();

            assert!(convo.submit("second").is_none());
            assert_eq!(convo.snapshot(), before);
        }

        #[test]
        fn rejected_while_streaming() {
            let mut convo = Conversation::new();
            convo.submit("first");
            convo.on_content("Hi");
            let before = convo.snapshot();

            assert!(convo.submit("second").is_none());
            assert_eq!(convo.snapshot(), before);
        }

        #[test]
        fn accepted_again_after_exchange_ends() {
            let mut convo = Conversation::new();
            convo.submit("first");
            convo.on_content("Hi");
            convo.on_stream_end();

            assert!(convo.submit("second").is_some());
            assert_eq!(convo.snapshot().len(), 4);
        }

        #[test]
        fn each_exchange_gets_a_fresh_id() {
            let mut convo = Conversation::new();
            let first = convo.submit("one").unwrap();
            convo.on_stream_end();
            let second = convo.submit("two").unwrap();
            assert_ne!(first, second);
        }
    }

    mod content {
        use super::*;

        #[test]
        fn concatenates_chunks() {
            let mut convo = Conversation::new();
            convo.submit("hello");
            convo.on_content("Hi");
            convo.on_content(" there");

            let snapshot = convo.snapshot();
            assert_eq!(snapshot.last().unwrap().content, "Hi there");
            assert_eq!(convo.phase(), Phase::Streaming);
        }

        #[test]
        fn ignored_while_idle() {
            let mut convo = Conversation::new();
            convo.on_content("stray");
            assert!(convo.snapshot().is_empty());
            assert_eq!(convo.phase(), Phase::Idle);
        }

        #[test]
        fn only_touches_the_last_message() {
            let mut convo = Conversation::with_history(vec![
                ChatMessage::user("old question"),
                ChatMessage::assistant("old answer"),
            ]);
            convo.submit("new question");
            convo.on_content("new answer");

            let snapshot = convo.snapshot();
            assert_eq!(snapshot[1].content, "old answer");
            assert_eq!(snapshot[3].content, "new answer");
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn error_embeds_message_and_goes_idle() {
            let mut convo = Conversation::new();
            convo.submit("hello");
            convo.on_error("rate limited");

            let snapshot = convo.snapshot();
            assert!(snapshot.last().unwrap().content.contains("rate limited"));
            assert_eq!(convo.phase(), Phase::Idle);
            assert!(convo.exchange().is_none());
        }

        #[test]
        fn error_replaces_partial_content() {
            let mut convo = Conversation::new();
            convo.submit("hello");
            convo.on_content("partial answ");
            convo.on_error("backend exploded");

            let snapshot = convo.snapshot();
            let content = &snapshot.last().unwrap().content;
            assert!(!content.contains("partial"));
            assert!(content.contains("backend exploded"));
        }

        #[test]
        fn empty_message_uses_fallback() {
            let mut convo = Conversation::new();
            convo.submit("hello");
            convo.on_error("");

            let content = convo.snapshot().last().unwrap().content.clone();
            assert!(content.contains(FALLBACK_ERROR));
        }

        #[test]
        fn transport_failure_uses_fallback_and_keeps_user_message() {
            let mut convo = Conversation::new();
            convo.submit("hello");
            convo.on_transport_failure();

            let snapshot = convo.snapshot();
            assert_eq!(snapshot[0], ChatMessage::user("hello"));
            assert!(snapshot[1].content.contains(FALLBACK_ERROR));
            assert_eq!(convo.phase(), Phase::Idle);
        }

        #[test]
        fn events_after_error_are_ignored() {
            let mut convo = Conversation::new();
            convo.submit("hello");
            convo.on_error("rate limited");
            let before = convo.snapshot();

            convo.on_content("late chunk");
            convo.on_stream_end();
            assert_eq!(convo.snapshot(), before);
        }
    }

    mod stream_end {
        use super::*;

        #[test]
        fn finalizes_content_and_goes_idle() {
            let mut convo = Conversation::new();
            convo.submit("hello");
            convo.on_content("Hi there");
            convo.on_stream_end();

            assert_eq!(convo.snapshot().last().unwrap().content, "Hi there");
            assert_eq!(convo.phase(), Phase::Idle);
            assert!(!convo.is_busy());
        }

        #[test]
        fn empty_response_leaves_empty_placeholder() {
            // A stream that ends before any content is a valid, if useless,
            // exchange: the placeholder stays empty.
            let mut convo = Conversation::new();
            convo.submit("hello");
            convo.on_stream_end();

            assert_eq!(convo.snapshot().last().unwrap().content, "");
            assert_eq!(convo.phase(), Phase::Idle);
        }

        #[test]
        fn noop_while_idle() {
            let mut convo = Conversation::new();
            convo.on_stream_end();
            assert_eq!(convo.phase(), Phase::Idle);
        }
    }

    mod history {
        use super::*;

        #[test]
        fn seeds_log_and_stays_idle() {
            let convo = Conversation::with_history(vec![
                ChatMessage::user("q"),
                ChatMessage::assistant("a"),
            ]);
            assert_eq!(convo.snapshot().len(), 2);
            assert_eq!(convo.phase(), Phase::Idle);
        }
    }
}
