//! Reconciliation error types.
//!
//! Raised by the document layer for a single event. They are reported to the
//! caller and the event is dropped; the connection keeps running.

use thiserror::Error;

/// Errors raised while applying an event to the shared document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The event type is neither a snapshot (`data`) nor a patch (`patch`).
    #[error("Unexpected SSE message: {event_type}")]
    UnexpectedEvent { event_type: String },

    /// The payload is not valid JSON, or not a patch document.
    #[error("Invalid JSON for '{event_type}' event: {message}")]
    InvalidJson { event_type: String, message: String },

    /// The patch parsed but could not be applied to the current document.
    #[error("Patch could not be applied: {message}")]
    PatchFailed { message: String },
}

impl SyncError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            SyncError::UnexpectedEvent { .. } => "E_SYNC_EVENT",
            SyncError::InvalidJson { .. } => "E_SYNC_JSON",
            SyncError::PatchFailed { .. } => "E_SYNC_PATCH",
        }
    }

    /// Protocol violations are hard failures; bad payloads are data errors.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, SyncError::UnexpectedEvent { .. })
    }
}
