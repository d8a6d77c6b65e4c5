//! Streaming events from the model runtime.
//!
//! [`StreamEvent`] is the unit the orchestrator receives from the model
//! gateway: incremental text deltas followed by exactly one terminal
//! event. How tokens are produced is the runtime's business; the core
//! only requires that they arrive incrementally and that the stream can
//! be cancelled.

/// An event in a streaming model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A chunk of generated text. Chunk boundaries are arbitrary and
    /// carry no meaning.
    Delta(String),
    /// The model finished this generation segment.
    Completed,
    /// The model runtime failed; the run cannot continue on this stream.
    Error(String),
}

impl StreamEvent {
    /// Returns the text content if this is a delta.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed | StreamEvent::Error(_))
    }
}
