//! # lectern-client
//!
//! Typed HTTP client for the AI Learning Assistant backend: one-shot
//! endpoints (sessions, history, flashcards, quizzes, ingestion) plus the
//! streaming chat endpoint, adapted into `lectern-core`'s decoder.

pub mod api;
pub mod error;
pub mod stream;
pub mod types;

pub use api::ApiClient;
pub use error::ApiError;
pub use stream::{ChatByteStream, ChatEventStream};
