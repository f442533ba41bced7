//! Upstream SSE (Server-Sent Events) decoder
//!
//! Turns the raw byte stream of an OpenAI-compatible streaming response into
//! JSON chunk objects. Bytes may split lines anywhere; incomplete lines are
//! buffered until the next push.

use super::error::UpstreamError;
use serde_json::Value;

const DONE_MARKER: &str = "[DONE]";

/// A decoded SSE frame
#[derive(Debug, Clone, PartialEq)]
pub enum SseFrame {
    /// One `data:` payload parsed as JSON
    Chunk(Value),
    /// The `[DONE]` terminator
    Done,
}

/// Line-buffered SSE decoder
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Raw bytes of the trailing incomplete line; may end mid code point
    buffer: Vec<u8>,
    /// Data lines of the event being assembled
    pending: Vec<String>,
    done: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `[DONE]` has been seen
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed raw bytes, returning every frame completed by them
    pub fn push(&mut self, bytes: &[u8]) -> Result<Vec<SseFrame>, UpstreamError> {
        self.buffer.extend_from_slice(bytes);

        let mut frames = Vec::new();
        let Some(pos) = self.buffer.iter().rposition(|b| *b == b'\n') else {
            return Ok(frames);
        };

        let complete: Vec<u8> = self.buffer.drain(..=pos).collect();
        for line in String::from_utf8_lossy(&complete).lines() {
            self.process_line(line, &mut frames)?;
        }

        Ok(frames)
    }

    /// Flush whatever is left once the byte stream has ended
    pub fn finish(&mut self) -> Result<Vec<SseFrame>, UpstreamError> {
        let rest = std::mem::take(&mut self.buffer);
        let mut frames = Vec::new();
        for line in String::from_utf8_lossy(&rest).lines() {
            self.process_line(line, &mut frames)?;
        }
        if let Some(frame) = self.dispatch()? {
            frames.push(frame);
        }
        Ok(frames)
    }

    fn process_line(&mut self, line: &str, frames: &mut Vec<SseFrame>) -> Result<(), UpstreamError> {
        let line = line.trim_end_matches('\r');

        // Blank line ends the event
        if line.is_empty() {
            frames.extend(self.dispatch()?);
            return Ok(());
        }
        // Comment / keep-alive
        if line.starts_with(':') {
            return Ok(());
        }

        if let Some(value) = line.strip_prefix("data:") {
            let value = value.strip_prefix(' ').unwrap_or(value);
            // Providers that skip the blank separator still get one frame per line
            if value.trim() == DONE_MARKER {
                frames.extend(self.dispatch()?);
                self.done = true;
                frames.push(SseFrame::Done);
                return Ok(());
            }
            self.pending.push(value.to_string());
            if serde_json::from_str::<Value>(&self.pending.join("\n")).is_ok() {
                frames.extend(self.dispatch()?);
            }
        }
        // event:, id:, retry: carry nothing we forward
        Ok(())
    }

    fn dispatch(&mut self) -> Result<Option<SseFrame>, UpstreamError> {
        if self.pending.is_empty() {
            return Ok(None);
        }
        let data = self.pending.join("\n");
        self.pending.clear();

        let trimmed = data.trim();
        if trimmed == DONE_MARKER {
            self.done = true;
            return Ok(Some(SseFrame::Done));
        }

        serde_json::from_str(trimmed)
            .map(|v| Some(SseFrame::Chunk(v)))
            .map_err(|e| UpstreamError::unknown(format!("invalid stream chunk: {}", e)))
    }
}
