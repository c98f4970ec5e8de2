//! Pull-based stream decoding.
//!
//! [`EventStream`] turns an open byte source into a finite sequence of
//! [`StreamEvent`]s. It is single-pass and not restartable: every exchange
//! opens a fresh byte source and builds a fresh decoder over it. Dropping
//! the decoder drops the source, which releases the underlying connection.

use std::collections::VecDeque;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};

use crate::error::StreamError;

use super::frame::parse_frame;
use super::line_buffer::LineBuffer;
use super::StreamEvent;

/// Decodes a chunked byte source into application events.
///
/// Events decoded from one chunk are handed out one at a time, and the next
/// chunk is not requested until all of them have been consumed: the decoder
/// never reads ahead of its caller.
pub struct EventStream<S> {
    source: S,
    lines: LineBuffer,
    ready: VecDeque<StreamEvent>,
    finished: bool,
}

impl<S> EventStream<S>
where
    S: Stream<Item = Result<Bytes, StreamError>> + Unpin,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            lines: LineBuffer::new(),
            ready: VecDeque::new(),
            finished: false,
        }
    }

    /// Pull the next event.
    ///
    /// - `Ok(Some(event))`: the next event, in arrival order
    /// - `Ok(None)`: the sequence is over, either because the source ended
    ///   or because a [`StreamEvent::Error`] was already yielded
    /// - `Err(_)`: the transport failed mid-stream; terminal
    pub async fn next(&mut self) -> Result<Option<StreamEvent>, StreamError> {
        loop {
            if let Some(event) = self.ready.pop_front() {
                if matches!(event, StreamEvent::Error(_)) {
                    // An error frame ends the exchange; whatever the server
                    // sent after it is never surfaced.
                    self.ready.clear();
                    self.finished = true;
                }
                return Ok(Some(event));
            }

            if self.finished {
                return Ok(None);
            }

            match self.source.next().await {
                Some(Ok(chunk)) => {
                    for line in self.lines.feed(&chunk) {
                        match parse_frame(&line) {
                            Some(event) => self.ready.push_back(event),
                            None => {
                                if !line.is_empty() {
                                    log::debug!("ignoring non-event line: {line}");
                                }
                            }
                        }
                    }
                }
                Some(Err(e)) => {
                    self.finished = true;
                    return Err(e);
                }
                None => {
                    if self.lines.pending() > 0 {
                        log::debug!(
                            "stream ended mid-line; dropping {} buffered bytes",
                            self.lines.pending()
                        );
                    }
                    self.finished = true;
                }
            }
        }
    }
}
