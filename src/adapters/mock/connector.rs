//! Mock transport for testing.
//!
//! Each connection attempt is answered by the next scripted [`MockResponse`],
//! served over an in-memory `tokio::io::duplex` pipe. Requests written by the
//! client are captured so tests can check headers across reconnects.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::sync::{watch, Mutex};

use crate::config::StreamTarget;
use crate::error::NetworkError;
use crate::traits::{BoxedIo, Connector};

const PIPE_CAPACITY: usize = 64 * 1024;

/// How the mock server answers one attempt.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Write the fragments, then close the stream.
    Close(Vec<Bytes>),
    /// Write the fragments, then keep the stream open until the client drops it.
    Hold(Vec<Bytes>),
    /// Fail the connect step with this message.
    Refuse(String),
}

impl MockResponse {
    /// Response written as one fragment, then closed.
    pub fn close(body: impl Into<Bytes>) -> Self {
        MockResponse::Close(vec![body.into()])
    }

    /// Response written as one fragment, then held open.
    pub fn hold(body: impl Into<Bytes>) -> Self {
        MockResponse::Hold(vec![body.into()])
    }
}

/// Scripted in-memory server.
///
/// Once the script is exhausted every further attempt is held open with no
/// response, which keeps a reconnecting client parked.
///
/// # Example
///
/// ```ignore
/// use eventsync::adapters::mock::{MockConnector, MockResponse};
///
/// let connector = MockConnector::new(vec![
///     MockResponse::close("HTTP/1.1 503 Service Unavailable\r\n\r\n"),
///     MockResponse::hold("HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\n\r\n"),
/// ]);
/// ```
#[derive(Clone)]
pub struct MockConnector {
    script: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<String>>>,
    attempts: Arc<watch::Sender<usize>>,
}

impl MockConnector {
    /// Create a connector answering attempts in script order.
    pub fn new(script: Vec<MockResponse>) -> Self {
        let (attempts, _) = watch::channel(0);
        Self {
            script: Arc::new(Mutex::new(script.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
            attempts: Arc::new(attempts),
        }
    }

    /// Append a response to the script.
    pub async fn push(&self, response: MockResponse) {
        self.script.lock().await.push_back(response);
    }

    /// Number of connect calls so far.
    pub fn attempts(&self) -> usize {
        *self.attempts.borrow()
    }

    /// Wait until at least `count` connect calls happened.
    pub async fn wait_for_attempts(&self, count: usize) {
        let mut rx = self.attempts.subscribe();
        // The sender lives in self, so this cannot fail
        let _ = rx.wait_for(|attempts| *attempts >= count).await;
    }

    /// Request heads received so far, in attempt order.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, target: &StreamTarget) -> Result<BoxedIo, NetworkError> {
        let response = self
            .script
            .lock()
            .await
            .pop_front()
            .unwrap_or(MockResponse::Hold(Vec::new()));
        self.attempts.send_modify(|attempts| *attempts += 1);

        let (fragments, hold) = match response {
            MockResponse::Refuse(message) => {
                return Err(NetworkError::ConnectionFailed {
                    url: target.to_string(),
                    message,
                })
            }
            MockResponse::Close(fragments) => (fragments, false),
            MockResponse::Hold(fragments) => (fragments, true),
        };

        let (client, server) = tokio::io::duplex(PIPE_CAPACITY);
        tokio::spawn(serve(server, fragments, hold, self.requests.clone()));
        Ok(Box::new(client))
    }
}

async fn serve(
    mut server: DuplexStream,
    fragments: Vec<Bytes>,
    hold: bool,
    requests: Arc<Mutex<Vec<String>>>,
) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.ends_with(b"\r\n\r\n") {
        match server.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    requests
        .lock()
        .await
        .push(String::from_utf8_lossy(&head).into_owned());

    for fragment in fragments {
        if server.write_all(&fragment).await.is_err() {
            return;
        }
        // Give the reader a chance to see each fragment on its own
        tokio::task::yield_now().await;
    }

    if hold {
        // Park until the client drops its half
        while let Ok(n) = server.read(&mut buf).await {
            if n == 0 {
                break;
            }
        }
    }
}
