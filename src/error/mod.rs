//! Unified error handling for the event-source client.
//!
//! - **Error Categories**: classification that drives the reconnect policy
//! - **Domain-specific Errors**: Network, Stream (framing) and Sync errors
//! - **Unified Error Type**: `EventSourceError` consolidates all of them
//!
//! # Error Categories
//!
//! | Category | Examples | Followed by reconnect |
//! |----------|----------|-----------------------|
//! | Network | refused, reset, TLS | Yes |
//! | Server | non-200 status | Yes |
//! | Protocol | not HTTP, not `text/event-stream` | Yes |
//! | Application | unexpected event type, bad patch | No (event dropped) |
//! | Configuration | bad URL or scheme | No (construction fails) |

mod category;
mod event_source_error;
mod network;
mod result;
mod stream;
mod sync;

pub use category::ErrorCategory;
pub use event_source_error::EventSourceError;
pub use network::NetworkError;
pub use result::EventSourceResult;
pub use stream::StreamError;
pub use sync::SyncError;

#[cfg(test)]
mod integration_tests {
    use super::*;

    /// Every failure of a connection attempt is retryable; event failures are not.
    #[test]
    fn test_attempt_failures_vs_event_failures() {
        let attempt_failures: Vec<EventSourceError> = vec![
            NetworkError::ConnectionFailed {
                url: "http://localhost:9".to_string(),
                message: "refused".to_string(),
            }
            .into(),
            StreamError::NotHttp {
                url: "http://localhost:9".to_string(),
                line: "SSH-2.0-OpenSSH".to_string(),
            }
            .into(),
            StreamError::BadStatus {
                url: "http://localhost:9".to_string(),
                status: 500,
            }
            .into(),
        ];
        for err in attempt_failures {
            assert!(err.is_retryable(), "Expected {:?} to be retryable", err);
            assert!(err.category().is_retryable());
        }

        let event_failures: Vec<EventSourceError> = vec![
            SyncError::InvalidJson {
                event_type: "patch".to_string(),
                message: "EOF while parsing".to_string(),
            }
            .into(),
            SyncError::PatchFailed {
                message: "invalid pointer".to_string(),
            }
            .into(),
        ];
        for err in event_failures {
            assert!(!err.is_retryable(), "Expected {:?} to not be retryable", err);
            assert!(err.category().is_event_scoped());
        }
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let codes = [
            EventSourceError::from(StreamError::NotEventStream { url: "u".into() }).error_code(),
            EventSourceError::from(StreamError::BadStatus {
                url: "u".into(),
                status: 404,
            })
            .error_code(),
            EventSourceError::from(SyncError::UnexpectedEvent {
                event_type: "x".into(),
            })
            .error_code(),
            EventSourceError::from(NetworkError::Io { message: "x".into() }).error_code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
