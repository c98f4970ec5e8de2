//! Exchange driving.
//!
//! Connects a decoder to a conversation: one cooperative task pulls events
//! and applies them in arrival order, with the renderer notified after every
//! transition. The only suspension points are the byte-source reads inside
//! the decoder; everything between reads is synchronous.

use bytes::Bytes;
use futures_util::Stream;

use crate::error::StreamError;
use crate::stream::{EventStream, StreamEvent};

use super::conversation::Conversation;

/// Pump a decoded event sequence into the conversation until it ends.
///
/// `notify` runs synchronously after each transition, including the terminal
/// one, so the renderer sees every intermediate state exactly once. Dropping
/// the returned future cancels the exchange and releases the byte source;
/// the conversation is left with an inert partial message until the user
/// resubmits.
pub async fn drive_exchange<S, F>(
    conversation: &mut Conversation,
    mut events: EventStream<S>,
    mut notify: F,
) where
    S: Stream<Item = Result<Bytes, StreamError>> + Unpin,
    F: FnMut(&Conversation),
{
    loop {
        match events.next().await {
            Ok(Some(StreamEvent::Content(text))) => {
                conversation.on_content(&text);
                notify(conversation);
            }
            Ok(Some(StreamEvent::Error(message))) => {
                // The sequence ends right after an error event; close out
                // without waiting for the decoder to confirm.
                conversation.on_error(&message);
                notify(conversation);
                return;
            }
            Ok(None) => {
                conversation.on_stream_end();
                notify(conversation);
                return;
            }
            Err(e) => {
                log::warn!("transport failure mid-exchange: {e}");
                conversation.on_transport_failure();
                notify(conversation);
                return;
            }
        }
    }
}
