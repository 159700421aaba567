//! Background connection loop.
//!
//! One task drives every attempt sequentially: connect, send the request,
//! read and parse the response, dispatch events, and on any disconnect wait
//! the reconnect delay before starting over. Shutdown is observed at every
//! suspension point (connect, write, read, delay).

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::watch;
use tracing::{debug, info, info_span, trace, warn, Instrument};

use super::connection::Connection;
use super::dispatcher::Dispatcher;
use super::reconnect::ReconnectGuard;
use super::state::ConnectionState;
use crate::config::{EventSourceConfig, StreamTarget};
use crate::error::{EventSourceError, NetworkError};
use crate::sse::{ResponseItem, StreamItem};
use crate::traits::Connector;

const READ_BUFFER_SIZE: usize = 8 * 1024;

/// How an attempt ended.
#[derive(Debug)]
enum AttemptEnd {
    /// `close()` was called
    Cancelled,
    /// Server closed the stream
    Ended,
    /// Transport or head failure
    Failed(EventSourceError),
}

pub(crate) struct ConnectionManager {
    config: EventSourceConfig,
    target: StreamTarget,
    connector: Arc<dyn Connector>,
    dispatcher: Dispatcher,
    state_tx: watch::Sender<ConnectionState>,
    shutdown_rx: watch::Receiver<bool>,
    guard: ReconnectGuard,
    last_event_id: Option<String>,
    reconnect_delay: Duration,
    attempt: u32,
}

impl ConnectionManager {
    pub(crate) fn new(
        config: EventSourceConfig,
        target: StreamTarget,
        connector: Arc<dyn Connector>,
        dispatcher: Dispatcher,
        state_tx: watch::Sender<ConnectionState>,
        shutdown_rx: watch::Receiver<bool>,
        guard: ReconnectGuard,
    ) -> Self {
        let last_event_id = config.last_event_id.clone();
        let reconnect_delay = config.reconnect_delay;
        Self {
            config,
            target,
            connector,
            dispatcher,
            state_tx,
            shutdown_rx,
            guard,
            last_event_id,
            reconnect_delay,
            attempt: 0,
        }
    }

    /// Run attempts until shut down. Always ends with a single
    /// `on_closed(false)`.
    pub(crate) async fn run(mut self) {
        loop {
            if self.is_shutdown() {
                break;
            }

            self.attempt += 1;
            let connection = Connection::new(
                &self.config,
                &self.target,
                self.attempt,
                self.last_event_id.as_deref(),
            );
            let span = info_span!("connection", id = %connection.id(), attempt = self.attempt);
            let end = self.run_attempt(connection).instrument(span).await;

            match end {
                AttemptEnd::Cancelled => break,
                AttemptEnd::Ended => info!(url = %self.target, "stream ended by server"),
                AttemptEnd::Failed(err) => {
                    warn!(
                        url = %self.target,
                        code = err.error_code(),
                        category = %err.category(),
                        "connection attempt failed: {}",
                        err
                    );
                    self.dispatcher.error(&err);
                }
            }

            if self.is_shutdown() {
                break;
            }
            self.dispatcher.closed(true);

            if !self.wait_before_reconnect().await {
                break;
            }
        }

        self.finish();
    }

    async fn run_attempt(&mut self, mut connection: Connection) -> AttemptEnd {
        let attempt = connection.attempt();
        self.state_tx
            .send_replace(ConnectionState::Connecting { attempt });
        info!(url = %self.target, "connecting");

        let mut io = tokio::select! {
            result = self.connector.connect(&self.target) => match result {
                Ok(io) => io,
                Err(err) => return AttemptEnd::Failed(err.into()),
            },
            _ = wait_for_shutdown(&mut self.shutdown_rx) => return AttemptEnd::Cancelled,
        };

        trace!(request = connection.request(), "sending request");
        let request = connection.request().as_bytes().to_vec();
        let write = async {
            io.write_all(&request).await?;
            io.flush().await
        };
        tokio::select! {
            result = write => {
                if let Err(err) = result {
                    return AttemptEnd::Failed(NetworkError::from(err).into());
                }
            }
            _ = wait_for_shutdown(&mut self.shutdown_rx) => return AttemptEnd::Cancelled,
        }

        let mut buf = vec![0u8; READ_BUFFER_SIZE];
        loop {
            let n = tokio::select! {
                read = io.read(&mut buf) => match read {
                    Ok(0) => return AttemptEnd::Ended,
                    Ok(n) => n,
                    Err(err) => return AttemptEnd::Failed(NetworkError::from(err).into()),
                },
                _ = wait_for_shutdown(&mut self.shutdown_rx) => return AttemptEnd::Cancelled,
            };
            trace!(bytes = n, "read");

            let flow = connection.feed(&buf[..n], |item| self.handle_item(attempt, item));
            self.last_event_id = connection.last_event_id().map(str::to_string);

            match flow {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(())) => return AttemptEnd::Cancelled,
                Err(err) => return AttemptEnd::Failed(err.into()),
            }
        }
    }

    fn handle_item(&mut self, attempt: u32, item: ResponseItem) -> ControlFlow<()> {
        // Nothing is dispatched once close() has been requested
        if self.is_shutdown() {
            return ControlFlow::Break(());
        }

        match item {
            ResponseItem::Connected => {
                self.state_tx.send_replace(ConnectionState::Open { attempt });
                info!(url = %self.target, "event stream open");
                self.dispatcher.connected();
            }
            ResponseItem::Stream(StreamItem::Retry(delay)) => {
                debug!(delay_ms = delay.as_millis() as u64, "server set reconnect delay");
                self.reconnect_delay = delay;
            }
            ResponseItem::Stream(StreamItem::Message(event)) => {
                trace!(event_type = %event.event_type, "dispatching event");
                self.dispatcher.message(&event);
            }
        }
        ControlFlow::Continue(())
    }

    /// Sleep for the reconnect delay. Returns false if shut down meanwhile.
    async fn wait_before_reconnect(&mut self) -> bool {
        // Held until the delay ends; the loop keeps going without it
        let slot = self.guard.try_schedule();
        if slot.is_none() {
            warn!("reconnect slot already taken, waiting anyway");
        }

        let delay = self.reconnect_delay;
        self.state_tx.send_replace(ConnectionState::Reconnecting {
            attempt: self.attempt + 1,
            delay,
        });
        info!(
            delay_ms = delay.as_millis() as u64,
            next_attempt = self.attempt + 1,
            "reconnecting after delay"
        );

        tokio::select! {
            _ = tokio::time::sleep(delay) => true,
            _ = wait_for_shutdown(&mut self.shutdown_rx) => {
                debug!("pending reconnect cancelled");
                false
            }
        }
    }

    fn is_shutdown(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    fn finish(&mut self) {
        self.state_tx.send_replace(ConnectionState::Closed);
        self.dispatcher.closed(false);
        info!(url = %self.target, attempts = self.attempt, "event source closed");
    }
}

/// Resolves once shutdown is requested or the handle is gone.
async fn wait_for_shutdown(rx: &mut watch::Receiver<bool>) {
    let _ = rx.wait_for(|closed| *closed).await;
}
