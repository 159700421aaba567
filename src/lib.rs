//! eventsync - a reconnecting Server-Sent Events client that keeps a JSON
//! document in sync through snapshot and patch events.
//!
//! Layers, bottom up:
//! - [`sse`] frames the response into lines, validates the head and parses events
//! - [`client`] owns the connection lifecycle and reconnects after a delay
//! - [`sync`] applies `data` snapshots and `patch` operations to a [`sync::Document`]

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod prelude;
pub mod sse;
pub mod sync;
pub mod traits;
