//! SSE wire value types.
//!
//! `SseLine` classifies one framed body line; `MessageEvent` is what gets
//! dispatched to listeners once a terminator line is seen.

use std::time::Duration;

use serde::Serialize;

/// Event type used when a block carries no `event:` line.
pub const DEFAULT_EVENT_TYPE: &str = "message";

/// A complete event, dispatched in stream arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageEvent {
    /// Value of the `event:` field, or [`DEFAULT_EVENT_TYPE`].
    pub event_type: String,
    /// Concatenated `data:` payloads, no separator between lines.
    pub data: String,
    /// Last event id known when this event was dispatched.
    pub last_event_id: Option<String>,
    /// `scheme://host` of the stream this event came from.
    pub origin: String,
}

/// Classification of a single body line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// Blank line: event terminator
    Empty,
    /// `event: <type>`
    Event(&'a str),
    /// `id: <id>`
    Id(&'a str),
    /// `data: <payload>`, one optional leading space removed
    Data(&'a str),
    /// `retry: <millis>`
    Retry(&'a str),
    /// `: comment`
    Comment(&'a str),
    /// Anything else, usually a payload continued after a transfer chunk boundary
    Other(&'a str),
}

impl<'a> SseLine<'a> {
    /// Classify a line with its terminator already removed.
    pub fn parse(line: &'a str) -> Self {
        if line.is_empty() {
            return SseLine::Empty;
        }
        if let Some(rest) = line.strip_prefix("event:") {
            return SseLine::Event(rest.trim());
        }
        if let Some(rest) = line.strip_prefix("id:") {
            return SseLine::Id(rest.trim());
        }
        if let Some(rest) = line.strip_prefix("data:") {
            return SseLine::Data(rest.strip_prefix(' ').unwrap_or(rest));
        }
        if let Some(rest) = line.strip_prefix("retry:") {
            return SseLine::Retry(rest.trim());
        }
        if let Some(rest) = line.strip_prefix(':') {
            return SseLine::Comment(rest);
        }
        SseLine::Other(line)
    }
}

/// Output of the event stream parser for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamItem {
    /// A terminator completed an event.
    Message(MessageEvent),
    /// The server asked for a different reconnection delay.
    Retry(Duration),
}
