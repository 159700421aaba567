//! Connection lifecycle against a scripted server: failures, reconnects,
//! resume ids and shutdown.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{assert_detached, assert_no_call, next_call, open_with, test_config, OPEN_HEAD};
use eventsync::adapters::mock::{HandlerCall, MockConnector, MockResponse, RecordingHandler};
use eventsync::client::{ConnectionState, EventSource, ReadyState};
use eventsync::error::{EventSourceError, NetworkError, StreamError};
use tokio::time::Instant;

fn start(
    script: Vec<MockResponse>,
    reconnect_ms: u64,
) -> (
    EventSource,
    Arc<MockConnector>,
    tokio::sync::mpsc::UnboundedReceiver<HandlerCall>,
) {
    let connector = Arc::new(MockConnector::new(script));
    let (handler, calls) = RecordingHandler::new();
    let source =
        EventSource::with_connector(test_config(reconnect_ms), connector.clone(), handler).unwrap();
    (source, connector, calls)
}

#[tokio::test]
async fn test_bad_status_reports_once_and_reconnects_once() {
    let (mut source, connector, mut calls) = start(
        vec![
            MockResponse::close("HTTP/1.1 503 Service Unavailable\r\n\r\n"),
            MockResponse::hold(OPEN_HEAD),
        ],
        200,
    );

    match next_call(&mut calls).await {
        HandlerCall::Error(EventSourceError::Stream(StreamError::BadStatus { status, .. })) => {
            assert_eq!(status, 503)
        }
        other => panic!("Expected bad status error, got {:?}", other),
    }
    assert_eq!(next_call(&mut calls).await, HandlerCall::Closed(true));
    let closed_at = Instant::now();

    // The next call is the successful second attempt, not another error
    assert_eq!(next_call(&mut calls).await, HandlerCall::Connect);
    assert!(closed_at.elapsed() >= Duration::from_millis(150));
    assert_eq!(connector.attempts(), 2);

    assert_no_call(&mut calls, Duration::from_millis(100)).await;
    assert_eq!(connector.attempts(), 2);

    source.close();
    source.join().await;
    assert_eq!(next_call(&mut calls).await, HandlerCall::Closed(false));
    assert_detached(&mut calls).await;
}

#[tokio::test]
async fn test_missing_content_type_never_connects() {
    let (source, connector, mut calls) = start(
        vec![MockResponse::close(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\ndata: {}\r\n\r\n",
        )],
        10,
    );

    match next_call(&mut calls).await {
        HandlerCall::Error(err) => {
            assert!(matches!(
                err,
                EventSourceError::Stream(StreamError::NotEventStream { .. })
            ));
            assert!(err.is_retryable());
        }
        other => panic!("Expected content type error, got {:?}", other),
    }
    assert_eq!(next_call(&mut calls).await, HandlerCall::Closed(true));

    // The retry is held open with no response: still not connected
    connector.wait_for_attempts(2).await;
    assert_no_call(&mut calls, Duration::from_millis(50)).await;
    assert_eq!(source.ready_state(), ReadyState::Connecting);

    source.shutdown().await;
    assert_eq!(next_call(&mut calls).await, HandlerCall::Closed(false));
    assert_detached(&mut calls).await;
}

#[tokio::test]
async fn test_close_during_reconnect_wait() {
    let (mut source, connector, mut calls) = start(
        vec![MockResponse::Refuse("connection refused".to_string())],
        60_000,
    );

    assert!(matches!(
        next_call(&mut calls).await,
        HandlerCall::Error(EventSourceError::Network(NetworkError::ConnectionFailed { .. }))
    ));
    assert_eq!(next_call(&mut calls).await, HandlerCall::Closed(true));

    let mut state = source.state_receiver();
    state
        .wait_for(|s| matches!(s, ConnectionState::Reconnecting { attempt: 2, .. }))
        .await
        .unwrap();
    assert!(source.is_reconnecting());

    source.close();
    // Must not sit out the 60s delay
    tokio::time::timeout(Duration::from_secs(2), source.join())
        .await
        .expect("close did not cancel the pending reconnect");

    assert_eq!(next_call(&mut calls).await, HandlerCall::Closed(false));
    assert_detached(&mut calls).await;
    assert_eq!(connector.attempts(), 1);
    assert!(!source.is_reconnecting());
    assert_eq!(source.state(), ConnectionState::Closed);
}

#[tokio::test]
async fn test_close_mid_read_interrupts_stream() {
    let (source, connector, mut calls) = start(
        vec![MockResponse::hold(open_with("event: data\ndata: []\n\n"))],
        10,
    );

    assert_eq!(next_call(&mut calls).await, HandlerCall::Connect);
    assert!(matches!(next_call(&mut calls).await, HandlerCall::Message(_)));

    tokio::time::timeout(Duration::from_secs(2), source.shutdown())
        .await
        .expect("close did not interrupt the read");

    assert_eq!(next_call(&mut calls).await, HandlerCall::Closed(false));
    assert_detached(&mut calls).await;
    assert_eq!(connector.attempts(), 1);
}

#[tokio::test]
async fn test_server_eof_reconnects_without_error() {
    let (source, _connector, mut calls) = start(
        vec![
            MockResponse::close(open_with("data: one\n\n")),
            MockResponse::hold(open_with("data: two\n\n")),
        ],
        10,
    );

    assert_eq!(next_call(&mut calls).await, HandlerCall::Connect);
    assert!(matches!(next_call(&mut calls).await, HandlerCall::Message(ref e) if e.data == "one"));
    assert_eq!(next_call(&mut calls).await, HandlerCall::Closed(true));
    assert_eq!(next_call(&mut calls).await, HandlerCall::Connect);
    assert!(matches!(next_call(&mut calls).await, HandlerCall::Message(ref e) if e.data == "two"));

    source.shutdown().await;
    assert_eq!(next_call(&mut calls).await, HandlerCall::Closed(false));
}

#[tokio::test]
async fn test_last_event_id_replayed_on_reconnect() {
    let connector = Arc::new(MockConnector::new(vec![
        MockResponse::close(open_with("id: 41\nevent: data\ndata: []\n\n")),
        MockResponse::hold(OPEN_HEAD),
    ]));
    let (handler, mut calls) = RecordingHandler::new();
    let config = test_config(10)
        .with_last_event_id("7")
        .with_header("X-Sd-Token", "secret")
        .with_header("Last-Event-ID", "ignored");
    let source = EventSource::with_connector(config, connector.clone(), handler).unwrap();

    assert_eq!(next_call(&mut calls).await, HandlerCall::Connect);
    match next_call(&mut calls).await {
        HandlerCall::Message(event) => assert_eq!(event.last_event_id.as_deref(), Some("41")),
        other => panic!("Expected message, got {:?}", other),
    }
    assert_eq!(next_call(&mut calls).await, HandlerCall::Closed(true));
    assert_eq!(next_call(&mut calls).await, HandlerCall::Connect);

    let requests = connector.requests().await;
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with("GET http://stockmarket.example.com/prices HTTP/1.1\r\n"));
    assert!(requests[0].contains("Last-Event-ID: 7\r\n"));
    assert!(requests[1].contains("Last-Event-ID: 41\r\n"));
    for request in &requests {
        assert!(request.contains("Accept: text/event-stream\r\n"));
        assert!(request.contains("Host: stockmarket.example.com\r\n"));
        assert!(request.contains("Origin: http://stockmarket.example.com\r\n"));
        assert!(request.contains("Cache-Control: no-cache\r\n"));
        assert!(request.contains("X-Sd-Token: secret\r\n"));
        assert!(!request.contains("ignored"));
    }

    source.shutdown().await;
}

#[tokio::test]
async fn test_retry_field_sets_reconnect_delay() {
    let (source, _connector, mut calls) = start(
        vec![MockResponse::close(open_with("retry: 45000\n\n"))],
        10,
    );

    assert_eq!(next_call(&mut calls).await, HandlerCall::Connect);
    assert_eq!(next_call(&mut calls).await, HandlerCall::Closed(true));

    let mut state = source.state_receiver();
    let reconnecting = state
        .wait_for(|s| matches!(s, ConnectionState::Reconnecting { .. }))
        .await
        .unwrap()
        .clone();
    assert_eq!(
        reconnecting,
        ConnectionState::Reconnecting {
            attempt: 2,
            delay: Duration::from_millis(45_000)
        }
    );

    source.shutdown().await;
}

#[tokio::test]
async fn test_no_dispatch_after_close() {
    let (source, _connector, mut calls) = start(
        vec![MockResponse::Hold(vec![
            OPEN_HEAD.into(),
            "data: first\n\n".into(),
        ])],
        10,
    );

    assert_eq!(next_call(&mut calls).await, HandlerCall::Connect);
    assert!(matches!(next_call(&mut calls).await, HandlerCall::Message(_)));

    source.close();
    assert_eq!(source.ready_state(), ReadyState::Closed);
    drop(source);

    assert_eq!(next_call(&mut calls).await, HandlerCall::Closed(false));
    assert_detached(&mut calls).await;
}
