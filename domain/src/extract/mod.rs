//! Streaming tool-call extractor
//!
//! Recovers structured tool calls from model output as it streams in.
//! The model demarcates a call with sentinel markers around a JSON body:
//!
//! ```text
//! <tool_call>{"name": "list_events", "arguments": {"date": "today"}}</tool_call>
//! ```
//!
//! Hidden reasoning is demarcated the same way with `<think>...</think>`
//! or `<thinking>...</thinking>` and surfaced as [`Fragment::Thinking`],
//! excluded from the visible text.
//!
//! Output arrives in arbitrary-sized chunks, so the extractor buffers:
//! text before an opening marker is emitted immediately as plain text
//! (holding back a trailing marker prefix such as `<too` until the next
//! chunk disambiguates it); text after an opening marker accumulates
//! until the closing marker appears, however many chunks that spans. The
//! emitted fragments are identical for every chunking of the same input.
//!
//! Extraction failures are recoverable, never fatal: a body that does
//! not decode into the expected shape degrades to plain text, markers
//! included, and a span left unterminated at end-of-stream is flushed as
//! plain text by [`finish`](ToolCallExtractor::finish) — the call is
//! treated as never having happened.

use crate::tool::entities::{ArgumentMap, CallId, ToolCall};

/// Opening sentinel of a tool-call span.
pub const TOOL_CALL_OPEN: &str = "<tool_call>";
/// Closing sentinel of a tool-call span.
pub const TOOL_CALL_CLOSE: &str = "</tool_call>";

const THINK_OPEN: &str = "<think>";
const THINK_CLOSE: &str = "</think>";
const THINKING_OPEN: &str = "<thinking>";
const THINKING_CLOSE: &str = "</thinking>";

/// A piece of model output recovered by the extractor.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Visible text, emitted in stream order.
    PlainText(String),
    /// Hidden reasoning from a think span; not part of the visible answer.
    Thinking(String),
    /// A complete, decoded tool call.
    ToolCall(ToolCall),
}

impl Fragment {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Fragment::PlainText(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tool_call(&self) -> Option<&ToolCall> {
        match self {
            Fragment::ToolCall(call) => Some(call),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Text,
    ToolCall,
    Thinking { close: &'static str },
}

/// Incremental extractor for one model output stream.
///
/// Feed chunks with [`consume`](Self::consume), then flush with
/// [`finish`](Self::finish) at end-of-stream. One extractor serves a
/// whole run: [`reset`](Self::reset) clears buffered state between
/// generation segments while the call-id counter keeps counting, so ids
/// stay unique across the run.
#[derive(Debug)]
pub struct ToolCallExtractor {
    mode: Mode,
    buffer: String,
    issued: u64,
}

impl Default for ToolCallExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolCallExtractor {
    pub fn new() -> Self {
        Self {
            mode: Mode::Text,
            buffer: String::new(),
            issued: 0,
        }
    }

    /// Feed one chunk of model output, yielding any fragments it completes.
    pub fn consume(&mut self, chunk: &str) -> Vec<Fragment> {
        self.buffer.push_str(chunk);
        self.drain(false)
    }

    /// Flush buffered state at end-of-stream.
    ///
    /// An unterminated tool-call span is emitted as plain text (markers
    /// included); unterminated thinking stays hidden text.
    pub fn finish(&mut self) -> Vec<Fragment> {
        let fragments = self.drain(true);
        self.mode = Mode::Text;
        fragments
    }

    /// Prepare for a new generation segment.
    ///
    /// Clears buffers and mode but not the id counter — call ids remain
    /// unique across every segment of the run.
    pub fn reset(&mut self) {
        self.mode = Mode::Text;
        self.buffer.clear();
    }

    /// True while an opening marker has been seen without its close.
    pub fn in_span(&self) -> bool {
        self.mode != Mode::Text
    }

    fn drain(&mut self, at_end: bool) -> Vec<Fragment> {
        let mut fragments = Vec::new();
        loop {
            match self.mode {
                Mode::Text => {
                    if let Some((pos, marker)) = earliest_opener(&self.buffer) {
                        if pos > 0 {
                            fragments.push(Fragment::PlainText(self.buffer[..pos].to_string()));
                        }
                        self.buffer.drain(..pos + marker.len());
                        self.mode = match marker {
                            TOOL_CALL_OPEN => Mode::ToolCall,
                            THINK_OPEN => Mode::Thinking { close: THINK_CLOSE },
                            _ => Mode::Thinking {
                                close: THINKING_CLOSE,
                            },
                        };
                        continue;
                    }
                    let held = if at_end {
                        0
                    } else {
                        partial_opener_suffix(&self.buffer)
                    };
                    let emit_len = self.buffer.len() - held;
                    if emit_len > 0 {
                        fragments.push(Fragment::PlainText(self.buffer[..emit_len].to_string()));
                        self.buffer.drain(..emit_len);
                    }
                    break;
                }
                Mode::ToolCall => {
                    if let Some(pos) = self.buffer.find(TOOL_CALL_CLOSE) {
                        let body: String = self.buffer.drain(..pos).collect();
                        self.buffer.drain(..TOOL_CALL_CLOSE.len());
                        fragments.push(self.decode_call(&body));
                        self.mode = Mode::Text;
                        continue;
                    }
                    if at_end {
                        let mut text =
                            String::with_capacity(TOOL_CALL_OPEN.len() + self.buffer.len());
                        text.push_str(TOOL_CALL_OPEN);
                        text.push_str(&self.buffer);
                        fragments.push(Fragment::PlainText(text));
                        self.buffer.clear();
                    }
                    break;
                }
                Mode::Thinking { close } => {
                    if let Some(pos) = self.buffer.find(close) {
                        let content: String = self.buffer.drain(..pos).collect();
                        self.buffer.drain(..close.len());
                        let trimmed = content.trim();
                        if !trimmed.is_empty() {
                            fragments.push(Fragment::Thinking(trimmed.to_string()));
                        }
                        self.mode = Mode::Text;
                        continue;
                    }
                    if at_end {
                        let trimmed = self.buffer.trim();
                        if !trimmed.is_empty() {
                            fragments.push(Fragment::Thinking(trimmed.to_string()));
                        }
                        self.buffer.clear();
                    }
                    break;
                }
            }
        }
        fragments
    }

    /// Decode a complete span body into a call, or degrade the whole
    /// span (markers included) to plain text.
    fn decode_call(&mut self, body: &str) -> Fragment {
        let trimmed = body.trim();
        let degraded = || {
            Fragment::PlainText(format!("{}{}{}", TOOL_CALL_OPEN, body, TOOL_CALL_CLOSE))
        };

        let Ok(serde_json::Value::Object(object)) = serde_json::from_str(trimmed) else {
            return degraded();
        };
        let Some(name) = object.get("name").and_then(|v| v.as_str()) else {
            return degraded();
        };

        // Absent arguments mean "no arguments"; a non-object is kept raw
        // and rejected later by validation.
        let parsed_arguments = match object.get("arguments") {
            None => Some(ArgumentMap::new()),
            Some(serde_json::Value::Object(map)) => {
                Some(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            }
            Some(_) => None,
        };

        self.issued += 1;
        Fragment::ToolCall(ToolCall::new(
            CallId::new(format!("call-{}", self.issued)),
            name,
            trimmed,
            parsed_arguments,
        ))
    }
}

/// Earliest opening marker in the buffer, if any.
fn earliest_opener(buffer: &str) -> Option<(usize, &'static str)> {
    [TOOL_CALL_OPEN, THINK_OPEN, THINKING_OPEN]
        .into_iter()
        .filter_map(|marker| buffer.find(marker).map(|pos| (pos, marker)))
        .min_by_key(|(pos, _)| *pos)
}

/// Length of the longest buffer suffix that is a proper prefix of an
/// opening marker. That tail is held back until the next chunk settles
/// whether a marker is forming.
fn partial_opener_suffix(buffer: &str) -> usize {
    let mut held = 0;
    for marker in [TOOL_CALL_OPEN, THINK_OPEN, THINKING_OPEN] {
        let max = (marker.len() - 1).min(buffer.len());
        for len in (held + 1)..=max {
            if buffer.ends_with(&marker[..len]) {
                held = len;
            }
        }
    }
    held
}
