//! Conversation state for one chat session.

pub mod conversation;
pub mod drive;
pub mod message;

pub use conversation::{Conversation, Exchange, ExchangeId, Phase};
pub use drive::drive_exchange;
pub use message::{ChatMessage, ChatRole};
