//! Incremental decoder for the scouting service's server-sent-event body.
//!
//! Frames are separated by a blank line and carry `data: <json>` lines.
//! Bytes are buffered until a full frame is available, so frames and UTF-8
//! sequences split across network chunks decode correctly.

use scout_core::StreamEvent;

const DATA_PREFIX: &str = "data: ";

/// Longest slice of a bad frame echoed into the diagnostic log.
const MAX_LOGGED_FRAME_CHARS: usize = 200;

/// Largest unterminated frame held in memory before it is dropped.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 8 * 1024 * 1024;

/// Bytes of the previous buffer rescanned so a split `\r\n\r\n` is found.
const SEPARATOR_OVERLAP: usize = 3;

#[derive(Debug)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    max_frame_bytes: usize,
    /// Set while skipping the rest of an oversized frame.
    discarding: bool,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::with_max_frame_bytes(DEFAULT_MAX_FRAME_BYTES)
    }
}

impl FrameDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_frame_bytes(max_frame_bytes: usize) -> Self {
        Self {
            buffer: Vec::new(),
            max_frame_bytes: max_frame_bytes.max(SEPARATOR_OVERLAP + 1),
            discarding: false,
        }
    }

    /// Feed one chunk and return every event completed by it, in order.
    ///
    /// Only the new bytes (plus a short overlap) are scanned for a separator.
    /// An unterminated frame larger than the cap is logged and dropped up to
    /// its closing blank line.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        let mut scan_from = self.buffer.len().saturating_sub(SEPARATOR_OVERLAP);
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some((end, separator_len)) = find_frame_boundary(&self.buffer, scan_from) {
            let frame: Vec<u8> = self.buffer.drain(..end + separator_len).collect();
            if self.discarding {
                self.discarding = false;
            } else {
                decode_frame(&frame[..end], &mut events);
            }
            scan_from = 0;
        }

        if self.buffer.len() > self.max_frame_bytes {
            if !self.discarding {
                tracing::warn!(
                    buffered = self.buffer.len(),
                    max_frame_bytes = self.max_frame_bytes,
                    "dropping oversized stream frame"
                );
                self.discarding = true;
            }
            let keep_from = self.buffer.len() - SEPARATOR_OVERLAP;
            self.buffer.drain(..keep_from);
        }
        events
    }

    /// Flush a trailing frame that was not terminated by a blank line.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let rest = std::mem::take(&mut self.buffer);
        let mut events = Vec::new();
        if std::mem::take(&mut self.discarding) {
            return events;
        }
        if !rest.iter().all(u8::is_ascii_whitespace) {
            decode_frame(&rest, &mut events);
        }
        events
    }

    /// Bytes held back waiting for a frame boundary.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}

/// Start index and length of the first blank-line separator at or after `from`.
fn find_frame_boundary(buf: &[u8], from: usize) -> Option<(usize, usize)> {
    (from..buf.len()).find_map(|i| {
        let rest = &buf[i..];
        if rest.starts_with(b"\n\n") {
            Some((i, 2))
        } else if rest.starts_with(b"\r\n\r\n") {
            Some((i, 4))
        } else {
            None
        }
    })
}

fn decode_frame(frame: &[u8], events: &mut Vec<StreamEvent>) {
    let text = String::from_utf8_lossy(frame);

    for line in text.lines() {
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            continue;
        };
        match serde_json::from_str::<StreamEvent>(payload) {
            Ok(event) => events.push(event),
            Err(e) => {
                let excerpt: String = payload.chars().take(MAX_LOGGED_FRAME_CHARS).collect();
                tracing::warn!(error = %e, frame = %excerpt, "skipping malformed stream frame");
            }
        }
    }
}
