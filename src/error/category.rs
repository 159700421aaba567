//! Error category classification for unified error handling.
//!
//! Categories decide how the connection manager and consumers react to a
//! failure: whether a new attempt makes sense, and whether the failure belongs
//! to one connection attempt or to one event.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Transport errors (connect refused, reset, TLS handshake, I/O).
    /// Always followed by a reconnect unless the client was closed.
    Network,

    /// The server answered but not with a usable event stream
    /// (non-200 status). Treated as transient.
    Server,

    /// The response could not be read as HTTP or as `text/event-stream`.
    /// Treated as a transient proxy/server condition.
    Protocol,

    /// A single event was rejected by the consumer (unexpected event type,
    /// invalid payload, failed patch). Never retried, never closes the stream.
    Application,

    /// Invalid client configuration (bad URL, unsupported scheme).
    /// Not retryable until the configuration is corrected.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if a failure in this category should lead to another
    /// connection attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCategory::Network | ErrorCategory::Server | ErrorCategory::Protocol
        )
    }

    /// Returns true if the failure is scoped to one event rather than to the
    /// connection attempt.
    pub fn is_event_scoped(&self) -> bool {
        matches!(self, ErrorCategory::Application)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Protocol => "protocol",
            ErrorCategory::Application => "application",
            ErrorCategory::Configuration => "configuration",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
