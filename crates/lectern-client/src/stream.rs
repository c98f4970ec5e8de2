//! Streaming chat.
//!
//! Opens the backend's streaming chat endpoint and adapts its chunked byte
//! body into a `lectern-core` decoder. A non-success initial status is a
//! hard failure of the whole exchange, surfaced here before any event
//! exists; mid-stream failures surface through the decoder as
//! [`StreamError`].

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use lectern_core::{EventStream, StreamError};
use serde::Serialize;

use crate::api::{check, ApiClient};
use crate::error::ApiError;

/// Boxed byte stream carrying one exchange's response body.
pub type ChatByteStream = BoxStream<'static, Result<Bytes, StreamError>>;

/// Decoder over one exchange's response body.
pub type ChatEventStream = EventStream<ChatByteStream>;

#[derive(Serialize)]
struct ChatRequest<'a> {
    session_id: &'a str,
    message: &'a str,
}

impl ApiClient {
    /// Open the streaming chat endpoint for one exchange.
    ///
    /// The returned decoder is single-use: open a fresh stream per
    /// submission. Dropping it aborts the request and releases the
    /// connection.
    pub async fn open_chat_stream(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<ChatEventStream, ApiError> {
        log::debug!("opening chat stream for session {session_id}");
        let response = self
            .http
            .post(self.url("/api/chat"))
            .json(&ChatRequest {
                session_id,
                message,
            })
            .send()
            .await?;
        let response = check(response).await?;

        let source: ChatByteStream = response
            .bytes_stream()
            .map_err(|e| StreamError::ConnectionLost(e.to_string()))
            .boxed();
        Ok(EventStream::new(source))
    }
}
