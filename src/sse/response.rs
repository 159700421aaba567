//! Whole-response reader for one connection attempt.
//!
//! Routes each framed line to the header parser until the head is complete,
//! then to the event stream parser, dropping chunk-size markers on the way.

use tracing::trace;

use super::events::StreamItem;
use super::framer::is_chunk_marker;
use super::header::{HeaderParser, HeaderProgress};
use super::parser::EventStreamParser;
use crate::error::StreamError;

/// What a single line produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseItem {
    /// Head validated; the stream is open.
    Connected,
    /// Body output from the event parser.
    Stream(StreamItem),
}

/// Line-level state machine for one HTTP event-stream response.
#[derive(Debug, Clone)]
pub struct ResponseReader {
    head: HeaderParser,
    body: EventStreamParser,
}

impl ResponseReader {
    /// Build a reader for a fresh attempt.
    pub fn new(url: impl Into<String>, origin: impl Into<String>, last_event_id: Option<String>) -> Self {
        Self {
            head: HeaderParser::new(url),
            body: EventStreamParser::new(origin).with_last_event_id(last_event_id),
        }
    }

    /// True once the response head has been accepted.
    pub fn is_open(&self) -> bool {
        self.head.is_done()
    }

    pub fn last_event_id(&self) -> Option<&str> {
        self.body.last_event_id()
    }

    /// Feed one framed line.
    ///
    /// A head error aborts the attempt; the caller must stop feeding lines.
    pub fn feed_line(&mut self, line: &str) -> Result<Option<ResponseItem>, StreamError> {
        if !self.head.is_done() {
            return match self.head.feed(line)? {
                HeaderProgress::Pending => Ok(None),
                HeaderProgress::Done => Ok(Some(ResponseItem::Connected)),
            };
        }

        if is_chunk_marker(line) {
            trace!(marker = line, "discarding chunk size line");
            return Ok(None);
        }

        Ok(self.body.feed_line(line).map(ResponseItem::Stream))
    }
}
