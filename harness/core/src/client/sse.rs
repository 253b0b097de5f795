//! Server-Sent Events Decoder
//!
//! Incremental decoder for the `data:` lines of an OpenAI-style chat
//! completion stream. Bytes arrive in arbitrary slices from the network,
//! so lines (and UTF-8 sequences) may be split across pushes.

/// Terminator payload of an OpenAI-style stream
const DONE_MARKER: &str = "[DONE]";

/// A decoded stream event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SseEvent {
    /// Payload of one `data:` line
    Data(String),
    /// `data: [DONE]`
    Done,
}

/// Line-buffering SSE decoder
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Create an empty decoder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes, returning every event completed by them
    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = Self::parse_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Flush a trailing line that was never newline-terminated
    pub fn finish(&mut self) -> Option<SseEvent> {
        if self.buffer.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.buffer);
        Self::parse_line(&line)
    }

    fn parse_line(line: &[u8]) -> Option<SseEvent> {
        let line = String::from_utf8_lossy(line);
        let line = line.trim_end_matches(['\r', '\n']);

        // Comments, event names, ids and blank separators carry no payload
        let payload = line.strip_prefix("data:")?;
        let payload = payload.strip_prefix(' ').unwrap_or(payload);

        if payload.trim() == DONE_MARKER {
            Some(SseEvent::Done)
        } else if payload.trim().is_empty() {
            None
        } else {
            Some(SseEvent::Data(payload.to_string()))
        }
    }
}
