//! Recording listener for testing.
//!
//! Forwards every callback into an unbounded channel so tests can assert on
//! the exact sequence of notifications.

use tokio::sync::mpsc;

use crate::error::{EventSourceError, EventSourceResult, SyncError};
use crate::sse::MessageEvent;
use crate::traits::EventSourceHandler;

/// One recorded listener callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerCall {
    Connect,
    Message(MessageEvent),
    Error(EventSourceError),
    Closed(bool),
}

/// Listener that records every call.
///
/// # Example
///
/// ```ignore
/// use eventsync::adapters::mock::{HandlerCall, RecordingHandler};
///
/// let (handler, mut calls) = RecordingHandler::new();
/// // ... hand `handler` to an EventSource ...
/// assert_eq!(calls.recv().await, Some(HandlerCall::Connect));
/// ```
#[derive(Debug)]
pub struct RecordingHandler {
    tx: mpsc::UnboundedSender<HandlerCall>,
    reject: Option<String>,
}

impl RecordingHandler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HandlerCall>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, reject: None }, rx)
    }

    /// Fail `on_message` for events of this type.
    pub fn rejecting(mut self, event_type: impl Into<String>) -> Self {
        self.reject = Some(event_type.into());
        self
    }

    fn record(&self, call: HandlerCall) {
        // Receiver may be gone once the test stops listening
        let _ = self.tx.send(call);
    }
}

impl EventSourceHandler for RecordingHandler {
    fn on_connect(&mut self) {
        self.record(HandlerCall::Connect);
    }

    fn on_message(&mut self, message: &MessageEvent) -> EventSourceResult<()> {
        self.record(HandlerCall::Message(message.clone()));
        match &self.reject {
            Some(rejected) if *rejected == message.event_type => {
                Err(SyncError::UnexpectedEvent {
                    event_type: message.event_type.clone(),
                }
                .into())
            }
            _ => Ok(()),
        }
    }

    fn on_error(&mut self, error: &EventSourceError) {
        self.record(HandlerCall::Error(error.clone()));
    }

    fn on_closed(&mut self, will_reconnect: bool) {
        self.record(HandlerCall::Closed(will_reconnect));
    }
}
