//! Streaming chat decode pipeline.
//!
//! Data flows byte source → [`LineBuffer`] → [`parse_frame`] →
//! [`EventStream`] → conversation. The pieces are layered so each is
//! testable on its own: line reassembly is pure byte bookkeeping, frame
//! parsing is a pure function, and the decoder owns the read loop.

pub mod decoder;
pub mod frame;
pub mod line_buffer;

pub use decoder::EventStream;
pub use frame::{parse_frame, StreamEvent, FRAME_MARKER};
pub use line_buffer::LineBuffer;
