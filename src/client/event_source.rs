//! Public event-source handle.
//!
//! [`EventSource`] validates the configuration, spawns the background
//! connection task and hands back a handle for state queries and shutdown.
//! Dropping the handle closes the client.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::dispatcher::Dispatcher;
use super::manager::ConnectionManager;
use super::reconnect::ReconnectGuard;
use super::state::{ConnectionState, ReadyState};
use crate::adapters::TcpConnector;
use crate::config::{EventSourceConfig, StreamTarget};
use crate::error::EventSourceResult;
use crate::traits::{Connector, EventSourceHandler};

/// Reconnecting Server-Sent Events client.
///
/// # Example
///
/// ```ignore
/// use eventsync::client::EventSource;
/// use eventsync::config::EventSourceConfig;
///
/// let config = EventSourceConfig::new("http://stockmarket.example.com/prices");
/// let mut source = EventSource::connect(config, |message: &MessageEvent| {
///     println!("{}: {}", message.event_type, message.data);
///     Ok(())
/// })?;
///
/// // later
/// source.shutdown().await;
/// ```
pub struct EventSource {
    target: StreamTarget,
    state_rx: watch::Receiver<ConnectionState>,
    shutdown_tx: watch::Sender<bool>,
    guard: ReconnectGuard,
    task: Option<JoinHandle<()>>,
}

impl EventSource {
    /// Start streaming over TCP (TLS for `https`).
    ///
    /// Fails only for an invalid configuration; connection problems are
    /// reported to the handler and retried. Must be called inside a Tokio
    /// runtime.
    pub fn connect<H>(config: EventSourceConfig, handler: H) -> EventSourceResult<Self>
    where
        H: EventSourceHandler,
    {
        let connector = Arc::new(TcpConnector::from_config(&config));
        Self::with_connector(config, connector, handler)
    }

    /// Start streaming over a custom transport.
    pub fn with_connector<H>(
        config: EventSourceConfig,
        connector: Arc<dyn Connector>,
        handler: H,
    ) -> EventSourceResult<Self>
    where
        H: EventSourceHandler,
    {
        let target = config.validate()?;
        let (state_tx, state_rx) = watch::channel(ConnectionState::Idle);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let guard = ReconnectGuard::new();

        let manager = ConnectionManager::new(
            config,
            target.clone(),
            connector,
            Dispatcher::new(Box::new(handler)),
            state_tx,
            shutdown_rx,
            guard.clone(),
        );
        let task = tokio::spawn(manager.run());
        debug!(url = %target, "event source started");

        Ok(Self {
            target,
            state_rx,
            shutdown_tx,
            guard,
            task: Some(task),
        })
    }

    pub fn url(&self) -> &str {
        self.target.url.as_str()
    }

    /// Current readiness. Reports `Closed` as soon as `close()` was called.
    pub fn ready_state(&self) -> ReadyState {
        if self.is_closing() {
            return ReadyState::Closed;
        }
        self.state_rx.borrow().ready_state()
    }

    /// Detailed state as last published by the connection task.
    pub fn state(&self) -> ConnectionState {
        self.state_rx.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.ready_state() == ReadyState::Open
    }

    /// True while a reconnect delay is pending.
    pub fn is_reconnecting(&self) -> bool {
        self.guard.is_pending()
    }

    fn is_closing(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// Stop the client. Cancels a pending reconnect and interrupts a read in
    /// progress; the handler then receives a final `on_closed(false)`.
    ///
    /// Safe to call any number of times.
    pub fn close(&self) {
        if !self.shutdown_tx.send_replace(true) {
            info!(url = %self.target, "closing event source");
        }
    }

    /// Wait for the connection task to finish. Returns immediately if it was
    /// already joined.
    pub async fn join(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                debug!("connection task ended abnormally: {}", err);
            }
        }
    }

    /// Close and wait until every resource has been released.
    pub async fn shutdown(mut self) {
        self.close();
        self.join().await;
    }
}

impl Drop for EventSource {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for EventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSource")
            .field("url", &self.url())
            .field("state", &self.state())
            .field("closing", &self.is_closing())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{HandlerCall, MockConnector, MockResponse, RecordingHandler};
    use crate::error::{EventSourceError, NetworkError};
    use std::time::Duration;

    const OPEN: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\n\r\n";

    #[tokio::test]
    async fn test_invalid_config_fails_fast() {
        let (handler, _calls) = RecordingHandler::new();
        let result = EventSource::connect(EventSourceConfig::new("gopher://old"), handler);
        match result {
            Err(EventSourceError::Network(NetworkError::UnsupportedScheme { scheme })) => {
                assert_eq!(scheme, "gopher")
            }
            other => panic!("Expected scheme error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_open_then_close() {
        let connector = Arc::new(MockConnector::new(vec![MockResponse::hold(OPEN)]));
        let (handler, mut calls) = RecordingHandler::new();
        let mut source = EventSource::with_connector(
            EventSourceConfig::new("http://localhost/stream"),
            connector.clone(),
            handler,
        )
        .unwrap();

        assert_eq!(calls.recv().await, Some(HandlerCall::Connect));
        assert!(source.is_connected());
        assert_eq!(source.state(), ConnectionState::Open { attempt: 1 });

        source.close();
        assert_eq!(source.ready_state(), ReadyState::Closed);
        source.close();
        source.join().await;

        assert_eq!(calls.recv().await, Some(HandlerCall::Closed(false)));
        assert_eq!(calls.recv().await, None);
        assert_eq!(source.state(), ConnectionState::Closed);
        assert_eq!(connector.attempts(), 1);
    }

    #[tokio::test]
    async fn test_drop_closes() {
        let connector = Arc::new(MockConnector::new(vec![MockResponse::hold(OPEN)]));
        let (handler, mut calls) = RecordingHandler::new();
        let source = EventSource::with_connector(
            EventSourceConfig::new("http://localhost/stream")
                .with_reconnect_delay(Duration::from_millis(10)),
            connector,
            handler,
        )
        .unwrap();
        assert_eq!(calls.recv().await, Some(HandlerCall::Connect));

        drop(source);

        assert_eq!(calls.recv().await, Some(HandlerCall::Closed(false)));
        // Listener dropped with the task
        assert_eq!(calls.recv().await, None);
    }
}
