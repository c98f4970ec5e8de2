//! Wire frame parsing.
//!
//! The backend streams one frame per line: `data: {json}`, where the JSON
//! object carries a `type` tag:
//!
//! - `{"type":"chunk","content":"..."}`: a piece of assistant text
//! - `{"type":"error","message":"..."}`: an application-level failure
//! - `{"type":"done"}`: sent just before the server closes the stream
//!
//! Lines without the marker (blank separators, keep-alive comments) are not
//! frames and are skipped. A `chunk` frame that fails to parse is dropped so
//! transport noise cannot abort an exchange, but a well-formed `error` frame
//! always surfaces. `done` carries no information the stream end does not;
//! it falls through the unrecognized-type arm.

use serde::Deserialize;

/// Marker prefix identifying an event line.
pub const FRAME_MARKER: &str = "data: ";

/// A decoded application-level event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A piece of streamed assistant text.
    Content(String),
    /// An in-band error; terminates the exchange.
    Error(String),
}

/// Frame payload as sent by the backend.
#[derive(Debug, Deserialize)]
struct Frame {
    #[serde(rename = "type")]
    frame_type: String,
    content: Option<String>,
    message: Option<String>,
}

/// Parse one complete line into an event.
///
/// Returns `None` for anything that is not a recognized, well-formed frame:
/// unmarked lines, invalid JSON, unknown types, and `chunk` frames missing
/// their `content`. A missing `message` on an `error` frame defaults to
/// empty; the conversation substitutes its fallback text.
pub fn parse_frame(line: &str) -> Option<StreamEvent> {
    let payload = line.strip_prefix(FRAME_MARKER)?;
    let frame: Frame = serde_json::from_str(payload).ok()?;

    match frame.frame_type.as_str() {
        "chunk" => frame.content.map(StreamEvent::Content),
        "error" => Some(StreamEvent::Error(frame.message.unwrap_or_default())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chunk_frame() {
        let event = parse_frame(r#"data: {"type":"chunk","content":"Hello"}"#);
        assert_eq!(event, Some(StreamEvent::Content("Hello".to_string())));
    }

    #[test]
    fn parses_error_frame() {
        let event = parse_frame(r#"data: {"type":"error","message":"rate limited"}"#);
        assert_eq!(event, Some(StreamEvent::Error("rate limited".to_string())));
    }

    #[test]
    fn error_frame_without_message_defaults_to_empty() {
        let event = parse_frame(r#"data: {"type":"error"}"#);
        assert_eq!(event, Some(StreamEvent::Error(String::new())));
    }

    #[test]
    fn done_frame_is_ignored() {
        assert_eq!(parse_frame(r#"data: {"type":"done"}"#), None);
    }

    #[test]
    fn unknown_type_is_ignored() {
        assert_eq!(parse_frame(r#"data: {"type":"usage","tokens":42}"#), None);
    }

    #[test]
    fn chunk_without_content_is_ignored() {
        assert_eq!(parse_frame(r#"data: {"type":"chunk"}"#), None);
    }

    #[test]
    fn chunk_with_wrong_typed_content_is_ignored() {
        assert_eq!(parse_frame(r#"data: {"type":"chunk","content":42}"#), None);
    }

    #[test]
    fn invalid_json_is_ignored() {
        assert_eq!(parse_frame("data: {not json"), None);
    }

    #[test]
    fn unmarked_line_is_ignored() {
        assert_eq!(parse_frame(r#"{"type":"chunk","content":"Hello"}"#), None);
    }

    #[test]
    fn blank_line_is_ignored() {
        assert_eq!(parse_frame(""), None);
    }

    #[test]
    fn keep_alive_comment_is_ignored() {
        assert_eq!(parse_frame(": ping"), None);
    }

    #[test]
    fn marker_must_be_a_prefix() {
        assert_eq!(
            parse_frame(r#"x data: {"type":"chunk","content":"Hello"}"#),
            None
        );
    }

    #[test]
    fn chunk_content_may_be_empty() {
        let event = parse_frame(r#"data: {"type":"chunk","content":""}"#);
        assert_eq!(event, Some(StreamEvent::Content(String::new())));
    }

    #[test]
    fn extra_fields_are_tolerated() {
        let event = parse_frame(r#"data: {"type":"chunk","content":"hi","seq":7}"#);
        assert_eq!(event, Some(StreamEvent::Content("hi".to_string())));
    }
}
