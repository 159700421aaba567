//! Unified error type for the event-source client.
//!
//! `EventSourceError` is what listeners receive in `on_error` and what the
//! public API returns. It wraps the domain errors and classifies them.

use thiserror::Error;

use super::category::ErrorCategory;
use super::network::NetworkError;
use super::stream::StreamError;
use super::sync::SyncError;

/// Unified error type for the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventSourceError {
    /// Transport errors (socket, TLS, URL).
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Response head errors (status line, content type).
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// Event rejected by the reconciliation layer.
    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl EventSourceError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            EventSourceError::Network(err) if err.is_configuration() => {
                ErrorCategory::Configuration
            }
            EventSourceError::Network(_) => ErrorCategory::Network,
            EventSourceError::Stream(StreamError::BadStatus { .. }) => ErrorCategory::Server,
            EventSourceError::Stream(_) => ErrorCategory::Protocol,
            EventSourceError::Sync(_) => ErrorCategory::Application,
        }
    }

    /// Check if this error should be followed by another connection attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            EventSourceError::Network(err) => err.is_retryable(),
            EventSourceError::Stream(err) => err.is_retryable(),
            EventSourceError::Sync(_) => false,
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            EventSourceError::Network(err) => err.error_code(),
            EventSourceError::Stream(err) => err.error_code(),
            EventSourceError::Sync(err) => err.error_code(),
        }
    }
}

impl From<std::io::Error> for EventSourceError {
    fn from(err: std::io::Error) -> Self {
        EventSourceError::Network(err.into())
    }
}
