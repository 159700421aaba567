//! Common test utilities for integration tests.
//!
//! Fixtures for response bodies, config builders and helpers that wait for
//! listener calls with a timeout so a hung client fails the test instead of
//! stalling it.

#![allow(dead_code)]

use std::time::Duration;

use eventsync::adapters::mock::HandlerCall;
use eventsync::config::EventSourceConfig;
use tokio::sync::mpsc::UnboundedReceiver;

pub const STREAM_URL: &str = "http://stockmarket.example.com/prices";

/// A valid event-stream response head.
pub const OPEN_HEAD: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\n\r\n";

/// How long a test waits for an expected callback.
pub const CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Config for the test stream with a short reconnect delay.
pub fn test_config(reconnect_ms: u64) -> EventSourceConfig {
    EventSourceConfig::new(STREAM_URL).with_reconnect_delay(Duration::from_millis(reconnect_ms))
}

/// Response head followed by `body`.
pub fn open_with(body: &str) -> String {
    format!("{}{}", OPEN_HEAD, body)
}

/// Wait for the next listener call.
pub async fn next_call(calls: &mut UnboundedReceiver<HandlerCall>) -> HandlerCall {
    tokio::time::timeout(CALL_TIMEOUT, calls.recv())
        .await
        .expect("Timed out waiting for a listener call")
        .expect("Listener was dropped")
}

/// Assert the listener was released: no further calls, channel closed.
pub async fn assert_detached(calls: &mut UnboundedReceiver<HandlerCall>) {
    let next = tokio::time::timeout(CALL_TIMEOUT, calls.recv())
        .await
        .expect("Timed out waiting for the listener to be dropped");
    assert_eq!(next, None, "Unexpected call after final close");
}

/// Assert no call arrives within `quiet`.
pub async fn assert_no_call(calls: &mut UnboundedReceiver<HandlerCall>, quiet: Duration) {
    if let Ok(call) = tokio::time::timeout(quiet, calls.recv()).await {
        panic!("Unexpected listener call: {:?}", call);
    }
}

/// Split `bytes` into fragments of the given sizes, cycling through them.
pub fn fragment(bytes: &[u8], sizes: &[usize]) -> Vec<Vec<u8>> {
    let mut fragments = Vec::new();
    let mut rest = bytes;
    let mut sizes = sizes.iter().cycle();
    while !rest.is_empty() {
        let size = (*sizes.next().unwrap_or(&1)).clamp(1, rest.len());
        let (head, tail) = rest.split_at(size);
        fragments.push(head.to_vec());
        rest = tail;
    }
    fragments
}
