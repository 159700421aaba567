//! Event stream parsing.
//!
//! [`EventStreamParser`] accumulates body lines into one [`PendingEvent`] and
//! emits a [`MessageEvent`] when a blank terminator line arrives.
//!
//! Data lines are concatenated as-is: `data: {"a":1` followed by `data: }`
//! yields the payload `{"a":1}`. No `\n` is inserted between lines, unlike the
//! W3C EventSource algorithm. Lines without a field prefix are appended to
//! the payload too, which keeps payloads intact when a transfer chunk
//! boundary falls in the middle of a data line.

use std::time::Duration;

use tracing::{debug, trace};

use super::events::{MessageEvent, SseLine, StreamItem, DEFAULT_EVENT_TYPE};

/// The event currently being accumulated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingEvent {
    /// Value of the last `event:` line, if any
    pub event_type: Option<String>,
    /// Concatenated payload
    pub data: String,
    /// Value of the last `id:` line, if any
    pub id: Option<String>,
}

impl PendingEvent {
    /// True once a data line (or continuation) has been buffered.
    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }
}

/// Stateful line accumulator for one connection's event stream.
#[derive(Debug, Clone)]
pub struct EventStreamParser {
    origin: String,
    pending: PendingEvent,
    last_event_id: Option<String>,
}

impl EventStreamParser {
    /// Create a parser for events coming from `origin`.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            pending: PendingEvent::default(),
            last_event_id: None,
        }
    }

    /// Seed the last event id, e.g. with the value replayed on reconnect.
    pub fn with_last_event_id(mut self, last_event_id: Option<String>) -> Self {
        self.last_event_id = last_event_id;
        self
    }

    /// Id committed by the most recent terminator.
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    pub fn pending(&self) -> &PendingEvent {
        &self.pending
    }

    /// Feed one body line (terminator removed).
    ///
    /// Returns an item when the line completes an event or carries a
    /// reconnection delay.
    pub fn feed_line(&mut self, line: &str) -> Option<StreamItem> {
        match SseLine::parse(line) {
            SseLine::Event(event_type) => {
                self.pending.event_type = Some(event_type.to_string());
                None
            }
            SseLine::Id(id) => {
                self.pending.id = Some(id.to_string());
                None
            }
            SseLine::Data(data) => {
                self.pending.data.push_str(data);
                None
            }
            SseLine::Retry(value) => parse_retry(value).map(StreamItem::Retry),
            SseLine::Empty => self.terminate(),
            SseLine::Comment(comment) if !self.pending.has_data() => {
                trace!(comment, "ignoring comment line");
                None
            }
            SseLine::Comment(_) | SseLine::Other(_) => {
                // Continuation of a payload split by a chunk boundary
                self.pending.data.push_str(line);
                None
            }
        }
    }

    /// Close the pending event and start a fresh accumulator.
    ///
    /// A blank line with no buffered data is a no-op: `event:` and `id:` lines
    /// seen so far stay pending. Chunked bodies put such a line between an
    /// event's field lines whenever a chunk boundary falls there.
    fn terminate(&mut self) -> Option<StreamItem> {
        if !self.pending.has_data() {
            return None;
        }

        let pending = std::mem::take(&mut self.pending);
        if let Some(id) = pending.id {
            self.last_event_id = if id.is_empty() { None } else { Some(id) };
        }

        let event = MessageEvent {
            event_type: pending
                .event_type
                .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string()),
            data: pending.data,
            last_event_id: self.last_event_id.clone(),
            origin: self.origin.clone(),
        };
        debug!(
            event_type = %event.event_type,
            bytes = event.data.len(),
            "event complete"
        );
        Some(StreamItem::Message(event))
    }
}

fn parse_retry(value: &str) -> Option<Duration> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        debug!(value, "ignoring malformed retry field");
        return None;
    }
    value.parse::<u64>().ok().map(Duration::from_millis)
}
