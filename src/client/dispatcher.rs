//! Single-listener dispatcher.
//!
//! Forwards connection callbacks to at most one registered
//! [`EventSourceHandler`]. The listener is detached after the final
//! `on_closed(false)` so nothing can reach it afterwards.

use tracing::{debug, warn};

use crate::error::EventSourceError;
use crate::sse::MessageEvent;
use crate::traits::EventSourceHandler;

pub struct Dispatcher {
    listener: Option<Box<dyn EventSourceHandler>>,
}

impl Dispatcher {
    pub fn new(listener: Box<dyn EventSourceHandler>) -> Self {
        Self {
            listener: Some(listener),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    pub fn connected(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_connect();
        }
    }

    /// Deliver an event. A listener error is routed to `on_error`; the
    /// connection is not affected.
    pub fn message(&mut self, message: &MessageEvent) {
        let Some(listener) = self.listener.as_mut() else {
            return;
        };
        if let Err(err) = listener.on_message(message) {
            warn!(
                event_type = %message.event_type,
                code = err.error_code(),
                "listener rejected event: {}",
                err
            );
            listener.on_error(&err);
        }
    }

    pub fn error(&mut self, error: &EventSourceError) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_error(error);
        }
    }

    /// Report a disconnect. `will_reconnect == false` is final and detaches
    /// the listener.
    pub fn closed(&mut self, will_reconnect: bool) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_closed(will_reconnect);
        }
        if !will_reconnect && self.listener.take().is_some() {
            debug!("listener detached");
        }
    }
}
