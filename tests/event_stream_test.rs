//! Parsing a whole response: framing, head validation and event assembly.

mod common;

use common::{fragment, open_with, STREAM_URL};
use eventsync::error::StreamError;
use eventsync::sse::{LineFramer, ResponseItem, ResponseReader, StreamItem};
use proptest::prelude::*;

const BODY: &str = "event: data\r\n\
                    data: [{\"title\":\"ACME\",\"price\":\"10\"}]\r\n\
                    \r\n\
                    : keep-alive\r\n\
                    id: 7\r\n\
                    event: patch\r\n\
                    data: [{\"op\":\"replace\",\r\n\
                    data: \"path\":\"/0/price\",\"value\":\"11\"}]\r\n\
                    \r\n\
                    retry: 1500\n\
                    data: plain\n\
                    \n";

/// Feed fragments and collect everything dispatched.
fn run(fragments: &[Vec<u8>]) -> Result<Vec<ResponseItem>, StreamError> {
    let mut framer = LineFramer::new();
    let mut reader = ResponseReader::new(STREAM_URL, "http://stockmarket.example.com", None);
    let mut items = Vec::new();
    for fragment in fragments {
        for line in framer.push(fragment) {
            if let Some(item) = reader.feed_line(&line)? {
                items.push(item);
            }
        }
    }
    Ok(items)
}

fn messages(items: &[ResponseItem]) -> Vec<(String, String)> {
    items
        .iter()
        .filter_map(|item| match item {
            ResponseItem::Stream(StreamItem::Message(event)) => {
                Some((event.event_type.clone(), event.data.clone()))
            }
            _ => None,
        })
        .collect()
}

#[test]
fn test_whole_response() {
    let response = open_with(BODY);
    let items = run(&[response.into_bytes()]).unwrap();

    assert_eq!(items[0], ResponseItem::Connected);
    assert_eq!(
        messages(&items),
        vec![
            (
                "data".to_string(),
                "[{\"title\":\"ACME\",\"price\":\"10\"}]".to_string()
            ),
            (
                "patch".to_string(),
                "[{\"op\":\"replace\",\"path\":\"/0/price\",\"value\":\"11\"}]".to_string()
            ),
            ("message".to_string(), "plain".to_string()),
        ]
    );
    assert!(items.contains(&ResponseItem::Stream(StreamItem::Retry(
        std::time::Duration::from_millis(1500)
    ))));
}

#[test]
fn test_every_two_way_split() {
    let response = open_with(BODY).into_bytes();
    let expected = run(&[response.clone()]).unwrap();

    for at in 0..=response.len() {
        let (a, b) = response.split_at(at);
        let items = run(&[a.to_vec(), b.to_vec()]).unwrap();
        assert_eq!(items, expected, "split at byte {}", at);
    }
}

#[test]
fn test_byte_at_a_time() {
    let response = open_with(BODY).into_bytes();
    let expected = run(&[response.clone()]).unwrap();
    let items = run(&fragment(&response, &[1])).unwrap();
    assert_eq!(items, expected);
}

#[test]
fn test_chunked_transfer_markers_ignored() {
    let chunk = "event: data\r\ndata: [1,2]\r\n\r\n";
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nTransfer-Encoding: chunked\r\n\r\n\
         {:x}\r\n{}\r\n0\r\n\r\n",
        chunk.len(),
        chunk
    );
    let items = run(&fragment(response.as_bytes(), &[3, 7, 1])).unwrap();
    assert_eq!(messages(&items), vec![("data".to_string(), "[1,2]".to_string())]);
}

#[test]
fn test_event_type_survives_chunk_boundary() {
    // Each chunk's trailing CRLF is a blank line between the event's fields
    let patch = "data: [{\"op\":\"remove\",\"path\":\"/0\"}]\r\n\r\n";
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nTransfer-Encoding: chunked\r\n\r\n\
         e\r\nevent: patch\r\n\r\n\
         {:x}\r\n{}\r\n",
        patch.len(),
        patch
    );
    let items = run(&[response.into_bytes()]).unwrap();
    assert_eq!(
        messages(&items),
        vec![(
            "patch".to_string(),
            "[{\"op\":\"remove\",\"path\":\"/0\"}]".to_string()
        )]
    );
}

#[test]
fn test_hex_only_payload_line_is_a_known_misparse() {
    // A continuation line that happens to be pure hex is taken for a chunk marker
    let response = open_with("data: [\ncafe\ndata: ]\n\n");
    let items = run(&[response.into_bytes()]).unwrap();
    assert_eq!(messages(&items), vec![("message".to_string(), "[]".to_string())]);
}

#[test]
fn test_bad_head_stops_before_body() {
    let err = run(&[b"HTTP/1.1 404 Not Found\r\n\r\ndata: x\r\n\r\n".to_vec()]).unwrap_err();
    assert_eq!(err.status(), Some(404));

    let err = run(&[b"<html>\r\n".to_vec()]).unwrap_err();
    assert!(matches!(err, StreamError::NotHttp { .. }));
}

proptest! {
    #[test]
    fn prop_dispatch_is_fragmentation_invariant(
        sizes in prop::collection::vec(1usize..64, 1..16)
    ) {
        let response = open_with(BODY).into_bytes();
        let expected = run(&[response.clone()]).unwrap();
        let items = run(&fragment(&response, &sizes)).unwrap();
        prop_assert_eq!(items, expected);
    }

    #[test]
    fn prop_data_lines_concatenate(
        parts in prop::collection::vec("[a-z\\[\\]{}\",]{1,12}", 1..6)
    ) {
        let mut body = String::from("event: data\n");
        for part in &parts {
            body.push_str(&format!("data: {}\n", part));
        }
        body.push('\n');

        let items = run(&[open_with(&body).into_bytes()]).unwrap();
        prop_assert_eq!(messages(&items), vec![("data".to_string(), parts.concat())]);
    }
}
