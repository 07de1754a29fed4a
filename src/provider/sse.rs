//! Server-sent events decoding of a chat-completion response body.

use futures::{Stream, StreamExt};
use serde_json::Value;

use crate::error::{BoxError, YachtsyError};

use super::http::{error_message, parse_sse_data};
use super::ChunkStream;

const DONE_SENTINEL: &str = "[DONE]";
const ERROR_EVENT: &str = "error";

#[derive(Debug, PartialEq, Eq)]
enum SseEvent {
    Data(String),
    /// An event named `error`, with its data.
    Error(String),
    Done,
}

/// Incremental SSE parser over raw body bytes.
#[derive(Debug, Default)]
struct SseDecoder {
    buffer: Vec<u8>,
    /// Bytes of `buffer` already searched for a line terminator.
    scanned: usize,
    /// The previous line ended in `\r`; a leading `\n` belongs to it.
    after_cr: bool,
    event: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    fn feed(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();
        let mut line_start = 0;

        for pos in self.scanned..self.buffer.len() {
            let byte = self.buffer[pos];
            if byte == b'\n' && self.after_cr && pos == line_start {
                line_start = pos + 1;
                self.after_cr = false;
                continue;
            }
            if byte != b'\n' && byte != b'\r' {
                self.after_cr = false;
                continue;
            }

            let line = String::from_utf8_lossy(&self.buffer[line_start..pos]).into_owned();
            if let Some(event) = self.line(&line) {
                events.push(event);
            }
            line_start = pos + 1;
            self.after_cr = byte == b'\r';
        }

        self.buffer.drain(..line_start);
        self.scanned = self.buffer.len();
        events
    }

    fn line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        if let Some(name) = line.strip_prefix("event:") {
            self.event = Some(name.trim().to_string());
            return None;
        }
        // id: and retry: fields carry nothing we use
        if let Some(data) = parse_sse_data(line) {
            self.data.push(data.to_string());
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = self.data.join("\n");
        self.data.clear();

        if event.as_deref() == Some(ERROR_EVENT) {
            Some(SseEvent::Error(data))
        } else if data.trim() == DONE_SENTINEL {
            Some(SseEvent::Done)
        } else {
            Some(SseEvent::Data(data))
        }
    }

    /// Flush an unterminated final line and event at end of body.
    fn finish(&mut self) -> Option<SseEvent> {
        if !self.buffer.is_empty() {
            let raw = std::mem::take(&mut self.buffer);
            self.scanned = 0;
            let line = String::from_utf8_lossy(&raw).into_owned();
            if let Some(event) = self.line(&line) {
                return Some(event);
            }
        }
        self.dispatch()
    }
}

/// Stream error for an `event: error` frame.
fn error_event(data: &str) -> YachtsyError {
    let message = serde_json::from_str::<Value>(data)
        .ok()
        .and_then(|value| {
            error_message(&value).or_else(|| {
                value
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_owned)
            })
        })
        .unwrap_or_else(|| data.trim().to_string());
    YachtsyError::stream_message(format!("upstream error: {message}"))
}

/// Stream error for a data payload carrying a non-null top-level `error`.
fn inline_error(value: &Value) -> Option<YachtsyError> {
    let error = value.get("error").filter(|error| !error.is_null())?;
    let message = error_message(value).unwrap_or_else(|| error.to_string());
    Some(YachtsyError::stream_message(format!(
        "upstream error: {message}"
    )))
}

/// Turn a response byte stream into a stream of JSON chunks.
///
/// The sequence ends at `data: [DONE]` or at end of body. A transport
/// error, a payload that is not valid JSON, an `error` event or a payload
/// carrying an `error` object yields one stream error and ends the
/// sequence.
pub fn decode_sse<S, B, E>(bytes: S) -> ChunkStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    let stream = async_stream::stream! {
        let mut decoder = SseDecoder::default();
        let mut bytes = std::pin::pin!(bytes);

        'body: loop {
            let (events, ended) = match bytes.next().await {
                Some(Ok(chunk)) => (decoder.feed(chunk.as_ref()), false),
                Some(Err(err)) => {
                    yield Err(YachtsyError::stream(err));
                    break 'body;
                }
                None => (decoder.finish().into_iter().collect::<Vec<_>>(), true),
            };

            for event in events {
                match event {
                    SseEvent::Done => break 'body,
                    SseEvent::Error(data) => {
                        yield Err(error_event(&data));
                        break 'body;
                    }
                    SseEvent::Data(data) => match serde_json::from_str::<Value>(&data) {
                        Ok(value) => {
                            if let Some(err) = inline_error(&value) {
                                yield Err(err);
                                break 'body;
                            }
                            yield Ok(value);
                        }
                        Err(err) => {
                            yield Err(YachtsyError::stream(err));
                            break 'body;
                        }
                    },
                }
            }
            if ended {
                break 'body;
            }
        }
    };

    Box::pin(stream)
}
