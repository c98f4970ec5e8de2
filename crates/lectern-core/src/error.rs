//! Error types for the streaming pipeline.

use thiserror::Error;

/// Failure of the byte transport underneath an event stream.
///
/// Distinct from an in-band `error` frame: a transport failure aborts the
/// sequence as a hard error, while an `error` frame is a normal event that
/// the conversation renders for the user.
#[derive(Error, Debug)]
pub enum StreamError {
    /// The connection dropped mid-stream.
    #[error("connection lost: {0}")]
    ConnectionLost(String),
}
