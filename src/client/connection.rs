//! One connection attempt.
//!
//! A [`Connection`] owns everything that must start fresh on each attempt:
//! the line framer, the header and event parsers, and the request bytes
//! (which embed the last event id known at creation time).

use std::ops::ControlFlow;

use uuid::Uuid;

use crate::config::{EventSourceConfig, StreamTarget};
use crate::error::StreamError;
use crate::sse::{LineFramer, ResponseItem, ResponseReader};

/// Build the GET request head for one attempt.
///
/// Header order: `Accept`, caller headers, `Host`, `Origin`,
/// `Cache-Control`, then `Last-Event-ID` when an id is known.
pub fn build_request(
    config: &EventSourceConfig,
    target: &StreamTarget,
    last_event_id: Option<&str>,
) -> String {
    let mut request = format!("GET {} HTTP/1.1\r\n", config.request_target(target));
    request.push_str("Accept: text/event-stream\r\n");
    for (name, value) in &config.headers {
        request.push_str(&format!("{}: {}\r\n", name, value));
    }
    request.push_str(&format!("Host: {}\r\n", target.host_header()));
    request.push_str(&format!("Origin: {}\r\n", target.origin()));
    request.push_str("Cache-Control: no-cache\r\n");
    if let Some(id) = last_event_id {
        request.push_str(&format!("Last-Event-ID: {}\r\n", id));
    }
    request.push_str("\r\n");
    request
}

/// State of a single attempt against the stream endpoint.
#[derive(Debug)]
pub struct Connection {
    id: Uuid,
    attempt: u32,
    url: String,
    request: String,
    framer: LineFramer,
    reader: ResponseReader,
}

impl Connection {
    pub fn new(
        config: &EventSourceConfig,
        target: &StreamTarget,
        attempt: u32,
        last_event_id: Option<&str>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            attempt,
            url: target.to_string(),
            request: build_request(config, target, last_event_id),
            framer: LineFramer::new(),
            reader: ResponseReader::new(
                target.to_string(),
                target.origin(),
                last_event_id.map(str::to_string),
            ),
        }
    }

    /// Correlation id for log lines of this attempt.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn request(&self) -> &str {
        &self.request
    }

    pub fn is_open(&self) -> bool {
        self.reader.is_open()
    }

    pub fn last_event_id(&self) -> Option<&str> {
        self.reader.last_event_id()
    }

    /// Feed bytes read from the transport, handing each produced item to
    /// `on_item` in line order.
    ///
    /// Stops early if `on_item` breaks. A head error, or a partial line
    /// longer than the framer's bound, aborts the attempt.
    pub fn feed<F>(&mut self, bytes: &[u8], mut on_item: F) -> Result<ControlFlow<()>, StreamError>
    where
        F: FnMut(ResponseItem) -> ControlFlow<()>,
    {
        for line in self.framer.push(bytes) {
            if let Some(item) = self.reader.feed_line(&line)? {
                if on_item(item).is_break() {
                    return Ok(ControlFlow::Break(()));
                }
            }
        }
        if self.framer.is_overflowing() {
            return Err(StreamError::LineTooLong {
                url: self.url.clone(),
                limit: self.framer.max_line_length(),
            });
        }
        Ok(ControlFlow::Continue(()))
    }
}
