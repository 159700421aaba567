//! SSE (Server-Sent Events) response parsing.
//!
//! The response of an event-stream request is processed in layers:
//! - `framer` - splits fragmented bytes into lines, spots chunk-size markers
//! - `header` - validates the status line and `Content-Type`
//! - `parser` - accumulates `event:`/`id:`/`data:` lines into events
//! - `response` - routes lines between the two phases for one attempt
//! - `events` - value types shared by the layers

mod events;
mod framer;
mod header;
mod parser;
mod response;

pub use events::{MessageEvent, SseLine, StreamItem, DEFAULT_EVENT_TYPE};
pub use framer::{is_chunk_marker, LineFramer, Lines, MAX_LINE_LENGTH};
pub use header::{HeaderParser, HeaderPhase, HeaderProgress};
pub use parser::{EventStreamParser, PendingEvent};
pub use response::{ResponseItem, ResponseReader};
