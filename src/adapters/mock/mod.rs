//! Mock implementations for testing.
//!
//! Enables exercising the full client without network access.
//!
//! # Available Mocks
//!
//! - [`MockConnector`] - Scripted in-memory server
//! - [`RecordingHandler`] - Listener that records every callback

pub mod connector;
pub mod handler;

pub use connector::{MockConnector, MockResponse};
pub use handler::{HandlerCall, RecordingHandler};
