//! Stream framing error types.
//!
//! These errors come from the response head (the status line and the
//! `Content-Type` check) or from a line that never terminates. Each one aborts the current connection attempt and is
//! followed by the standard reconnect policy.

use thiserror::Error;

/// Protocol framing failures detected while reading the response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The first line of the response was not an HTTP status line.
    #[error("Not HTTP? {url}: {line}")]
    NotHttp { url: String, line: String },

    /// The server answered with a status other than 200.
    #[error("Bad status from {url}: {status}")]
    BadStatus { url: String, status: u16 },

    /// The headers ended without `Content-Type: text/event-stream`.
    #[error("Not event stream: {url} (expected Content-Type: text/event-stream)")]
    NotEventStream { url: String },

    /// A line grew past the buffering bound without a terminator.
    #[error("Line too long from {url}: more than {limit} bytes without a line break")]
    LineTooLong { url: String, limit: usize },
}

impl StreamError {
    /// All framing errors are treated as transient server/proxy conditions.
    pub fn is_retryable(&self) -> bool {
        true
    }

    /// The HTTP status, when the server sent one.
    pub fn status(&self) -> Option<u16> {
        match self {
            StreamError::BadStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::NotHttp { .. } => "E_STREAM_NOT_HTTP",
            StreamError::BadStatus { .. } => "E_STREAM_STATUS",
            StreamError::NotEventStream { .. } => "E_STREAM_CONTENT_TYPE",
            StreamError::LineTooLong { .. } => "E_STREAM_LINE_LENGTH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = StreamError::BadStatus {
            url: "http://example.com/prices".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "Bad status from http://example.com/prices: 503");
        assert_eq!(err.status(), Some(503));

        let err = StreamError::NotEventStream {
            url: "http://example.com/".to_string(),
        };
        assert!(err.to_string().starts_with("Not event stream"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_always_retryable() {
        let errors = [
            StreamError::NotHttp {
                url: "u".to_string(),
                line: "garbage".to_string(),
            },
            StreamError::BadStatus {
                url: "u".to_string(),
                status: 404,
            },
            StreamError::NotEventStream {
                url: "u".to_string(),
            },
            StreamError::LineTooLong {
                url: "u".to_string(),
                limit: 8,
            },
        ];
        for err in errors {
            assert!(err.is_retryable(), "{:?} should be retryable", err);
        }
    }
}
