//! Prelude module for convenient imports.
//!
//! ```ignore
//! use eventsync::prelude::*;
//! ```

// Client
pub use crate::client::{ConnectionState, EventSource, ReadyState};
pub use crate::config::EventSourceConfig;

// Events and listeners
pub use crate::sse::MessageEvent;
pub use crate::traits::EventSourceHandler;

// Reconciliation
pub use crate::sync::{Document, DocumentSync, SyncHandle, SyncNotice};

// Errors
pub use crate::error::{EventSourceError, EventSourceResult};
