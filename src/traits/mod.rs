//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`EventSourceHandler`] - Listener receiving connection lifecycle and events
//! - [`Connector`] - Opens the transport for each connection attempt
//! - [`TlsEngineFactory`] - Supplies the TLS engine for secure targets

pub mod connector;
pub mod handler;

pub use connector::{BoxedIo, Connector, EventStreamIo, TlsEngineFactory};
pub use handler::EventSourceHandler;
