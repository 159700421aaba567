//! Response head validation.
//!
//! The head is read line by line through three phases:
//! `AwaitingStatus -> AwaitingHeaders -> Done`. A non-200 status or a first
//! line that is not an HTTP status line fails immediately; a blank line ends
//! the head and succeeds only if `Content-Type: text/event-stream` was seen.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use crate::error::StreamError;

static STATUS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^HTTP/1\.[01] (\d{3})(?: (.*))?$").expect("Invalid status line regex")
});

// Header name is matched case-sensitively; trailing parameters are allowed.
static CONTENT_TYPE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Content-Type:\s*text/event-stream(.*)$").expect("Invalid content type regex")
});

/// Phase of response head parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPhase {
    AwaitingStatus,
    AwaitingHeaders,
    Done,
}

/// Result of feeding one head line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderProgress {
    /// More head lines are expected.
    Pending,
    /// The head ended and the stream is a valid event stream.
    Done,
}

/// Validates the status line and headers of one connection attempt.
///
/// A new parser is created for every attempt, so status, content-type flag
/// and phase never leak from a previous connection.
#[derive(Debug, Clone)]
pub struct HeaderParser {
    url: String,
    phase: HeaderPhase,
    status: Option<u16>,
    event_stream: bool,
}

impl HeaderParser {
    /// Create a parser; `url` is only used in error messages.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            phase: HeaderPhase::AwaitingStatus,
            status: None,
            event_stream: false,
        }
    }

    pub fn phase(&self) -> HeaderPhase {
        self.phase
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn is_done(&self) -> bool {
        self.phase == HeaderPhase::Done
    }

    /// Feed one head line (terminator removed).
    ///
    /// Lines fed after `Done` are ignored; body lines belong to the event
    /// parser.
    pub fn feed(&mut self, line: &str) -> Result<HeaderProgress, StreamError> {
        match self.phase {
            HeaderPhase::AwaitingStatus => {
                if line.is_empty() {
                    return Ok(HeaderProgress::Pending);
                }
                self.feed_status(line)?;
                Ok(HeaderProgress::Pending)
            }
            HeaderPhase::AwaitingHeaders => self.feed_header(line),
            HeaderPhase::Done => Ok(HeaderProgress::Done),
        }
    }

    fn feed_status(&mut self, line: &str) -> Result<(), StreamError> {
        let status = STATUS_PATTERN
            .captures(line)
            .and_then(|caps| caps.get(1))
            .and_then(|code| code.as_str().parse::<u16>().ok())
            .ok_or_else(|| StreamError::NotHttp {
                url: self.url.clone(),
                line: line.to_string(),
            })?;

        self.status = Some(status);
        if status != 200 {
            return Err(StreamError::BadStatus {
                url: self.url.clone(),
                status,
            });
        }
        debug!("HTTP status 200 from {}", self.url);
        self.phase = HeaderPhase::AwaitingHeaders;
        Ok(())
    }

    fn feed_header(&mut self, line: &str) -> Result<HeaderProgress, StreamError> {
        if line.is_empty() {
            if !self.event_stream {
                return Err(StreamError::NotEventStream {
                    url: self.url.clone(),
                });
            }
            self.phase = HeaderPhase::Done;
            return Ok(HeaderProgress::Done);
        }

        if CONTENT_TYPE_PATTERN.is_match(line) {
            debug!("event stream content type detected");
            self.event_stream = true;
        } else {
            trace!(header = line, "ignoring header");
        }
        Ok(HeaderProgress::Pending)
    }
}
