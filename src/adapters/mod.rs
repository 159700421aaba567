//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`TcpConnector`] - Plain TCP transport with optional native TLS
//! - [`NativeTlsFactory`] - Default TLS engine for `https` targets
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockConnector`] - Scripted responses over in-memory pipes
//! - [`mock::RecordingHandler`] - Records listener callbacks

pub mod mock;
pub mod tcp;

pub use mock::{MockConnector, MockResponse, RecordingHandler};
pub use tcp::{NativeTlsFactory, TcpConnector};
