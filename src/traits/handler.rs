//! Listener interface for event-source callbacks.
//!
//! The connection task owns exactly one listener and calls it directly, in
//! stream order, from its own processing context. A listener that needs to
//! touch state on another thread must hand the data over itself (channels,
//! `watch`, etc.).

use crate::error::{EventSourceError, EventSourceResult};
use crate::sse::MessageEvent;

/// Receives connection lifecycle notifications and events.
///
/// Every disconnect is reported through [`on_closed`](Self::on_closed) with
/// `will_reconnect` telling a retry in progress apart from a permanent stop.
/// After `on_closed(false)` the listener is dropped and never called again.
///
/// # Example
///
/// ```ignore
/// use eventsync::traits::EventSourceHandler;
/// use eventsync::sse::MessageEvent;
///
/// struct Printer;
///
/// impl EventSourceHandler for Printer {
///     fn on_message(&mut self, message: &MessageEvent) -> eventsync::error::EventSourceResult<()> {
///         println!("{}: {}", message.event_type, message.data);
///         Ok(())
///     }
/// }
/// ```
pub trait EventSourceHandler: Send + 'static {
    /// The response head was accepted; events may follow.
    fn on_connect(&mut self) {}

    /// A complete event arrived.
    ///
    /// An error is reported back through [`on_error`](Self::on_error); the
    /// event is dropped and the connection stays open.
    fn on_message(&mut self, message: &MessageEvent) -> EventSourceResult<()>;

    /// A connection attempt failed, or an event was rejected.
    fn on_error(&mut self, _error: &EventSourceError) {}

    /// The connection ended.
    fn on_closed(&mut self, _will_reconnect: bool) {}
}

impl<F> EventSourceHandler for F
where
    F: FnMut(&MessageEvent) -> EventSourceResult<()> + Send + 'static,
{
    fn on_message(&mut self, message: &MessageEvent) -> EventSourceResult<()> {
        self(message)
    }
}
