//! Line framing for raw response bytes.
//!
//! Socket reads split the response at arbitrary byte boundaries, including in
//! the middle of a line or of a multi-byte UTF-8 sequence. The framer buffers
//! bytes until a `\n` arrives and only then yields the line, with every
//! carriage return removed.
//!
//! # Chunk-size markers
//!
//! Bodies sent with `Transfer-Encoding: chunked` carry hexadecimal size lines
//! between payload lines. The framer does not dechunk; instead
//! [`is_chunk_marker`] recognizes a line made only of hex digits so the body
//! reader can discard it. A genuine data line consisting solely of hex digits
//! (for example an un-prefixed continuation `cafe`) is indistinguishable and
//! will be dropped as well.

use bytes::{Buf, BytesMut};

/// Longest hex run still accepted as a chunk size (a 64-bit length).
const MAX_CHUNK_MARKER_DIGITS: usize = 16;

/// Default bound on a single unterminated line.
pub const MAX_LINE_LENGTH: usize = 4 * 1024 * 1024;

/// Splits a fragmented byte stream into complete lines.
#[derive(Debug)]
pub struct LineFramer {
    buffer: BytesMut,
    max_line_length: usize,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self {
            buffer: BytesMut::new(),
            max_line_length: MAX_LINE_LENGTH,
        }
    }
}

impl LineFramer {
    /// Create an empty framer. One framer is used per connection attempt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the bound on a single unterminated line.
    pub fn with_max_line_length(mut self, limit: usize) -> Self {
        self.max_line_length = limit;
        self
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    /// True when the buffered partial line exceeds the bound. The caller
    /// should abandon the stream.
    pub fn is_overflowing(&self) -> bool {
        self.buffer.len() > self.max_line_length
    }

    /// Append a fragment and iterate over every line it completes.
    ///
    /// Lines are produced lazily; bytes after the last `\n` stay buffered
    /// until a later fragment terminates them.
    pub fn push(&mut self, fragment: &[u8]) -> Lines<'_> {
        self.buffer.extend_from_slice(fragment);
        Lines {
            buffer: &mut self.buffer,
        }
    }

    /// Number of buffered bytes that do not yet form a complete line.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Drop any partial line.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

/// Iterator over the complete lines currently buffered in a [`LineFramer`].
#[derive(Debug)]
pub struct Lines<'a> {
    buffer: &'a mut BytesMut,
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let newline = self.buffer.iter().position(|b| *b == b'\n')?;
        let raw = self.buffer.split_to(newline);
        self.buffer.advance(1);

        // Carriage returns never belong to a line, wherever they appear
        let line: Vec<u8> = raw.iter().copied().filter(|b| *b != b'\r').collect();
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

/// Returns true if `line` looks like a chunked-transfer size marker.
pub fn is_chunk_marker(line: &str) -> bool {
    !line.is_empty()
        && line.len() <= MAX_CHUNK_MARKER_DIGITS
        && line.bytes().all(|b| b.is_ascii_hexdigit())
}
