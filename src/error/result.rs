//! Result type alias for client operations.

use super::event_source_error::EventSourceError;

/// Type alias for Results using EventSourceError.
pub type EventSourceResult<T> = Result<T, EventSourceError>;
