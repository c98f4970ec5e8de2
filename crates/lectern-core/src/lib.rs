//! # lectern-core
//!
//! Core client logic for Lectern, the AI learning assistant front end.
//!
//! This crate is transport-agnostic: it decodes an already-open chunked byte
//! stream into application events and drives the conversation state machine.
//! Shells (HTTP client, terminal UI) live in sibling crates.
//!
//! ## Key Concepts
//!
//! - **StreamEvent**: one decoded wire frame (`Content` or `Error`)
//! - **EventStream**: pull-based decoder over a chunked byte source
//! - **Conversation**: ordered message log plus exchange lifecycle
//! - **Exchange**: one user submission through completion of its response

pub mod chat;
pub mod error;
pub mod stream;

// Re-export commonly used types
pub use chat::{drive_exchange, ChatMessage, ChatRole, Conversation, ExchangeId, Phase};
pub use error::StreamError;
pub use stream::{EventStream, StreamEvent};
