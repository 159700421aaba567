//! Transport-level error types.
//!
//! Errors raised while resolving the target, opening the socket, negotiating
//! TLS, or reading from an established stream.

use thiserror::Error;

/// Network-specific error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The target could not be parsed as a URL.
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// The request path override would break the request line.
    #[error("Invalid request path {path:?}: must not contain spaces or line breaks")]
    InvalidRequestPath { path: String },

    /// Only `http` and `https` are supported.
    #[error("Unsupported scheme '{scheme}' (expected http or https)")]
    UnsupportedScheme { scheme: String },

    /// Connecting to the server failed (refused, unreachable, DNS).
    #[error("Failed to connect to {url}: {message}")]
    ConnectionFailed { url: String, message: String },

    /// Connecting took longer than the configured bound.
    #[error("Timed out connecting to {url} after {millis}ms")]
    ConnectTimeout { url: String, millis: u64 },

    /// TLS engine construction or handshake failed.
    #[error("TLS error for {url}: {message}")]
    Tls { url: String, message: String },

    /// Read or write on an established stream failed.
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl NetworkError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::InvalidUrl { .. }
            | NetworkError::InvalidRequestPath { .. }
            | NetworkError::UnsupportedScheme { .. } => false,
            NetworkError::ConnectionFailed { .. }
            | NetworkError::ConnectTimeout { .. }
            | NetworkError::Tls { .. }
            | NetworkError::Io { .. } => true,
        }
    }

    /// Returns true for errors caused by client configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            NetworkError::InvalidUrl { .. }
                | NetworkError::InvalidRequestPath { .. }
                | NetworkError::UnsupportedScheme { .. }
        )
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::InvalidUrl { .. } => "E_NET_URL",
            NetworkError::InvalidRequestPath { .. } => "E_NET_PATH",
            NetworkError::UnsupportedScheme { .. } => "E_NET_SCHEME",
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::ConnectTimeout { .. } => "E_NET_TIMEOUT",
            NetworkError::Tls { .. } => "E_NET_TLS",
            NetworkError::Io { .. } => "E_NET_IO",
        }
    }
}

impl From<std::io::Error> for NetworkError {
    fn from(err: std::io::Error) -> Self {
        NetworkError::Io {
            message: err.to_string(),
        }
    }
}
