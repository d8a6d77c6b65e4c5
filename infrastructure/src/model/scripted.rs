//! Scripted model gateway for deterministic runs.
//!
//! Each `start_stream` call plays the next [`ScriptedSegment`] from the
//! script: text is streamed as fixed-size chunks (with an optional
//! per-chunk delay), a `Fail` segment emits a stream error, and a
//! `Stall` segment produces nothing until cancelled — which is exactly
//! what the orchestrator's bounded reads exist to survive.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use courier_application::ports::model_gateway::{GatewayError, ModelGateway, ModelStream};
use courier_domain::{Conversation, StreamEvent, ToolDefinition};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// One scripted generation segment.
#[derive(Debug, Clone)]
pub enum ScriptedSegment {
    /// Stream this text in chunks, then complete.
    Text(String),
    /// Emit a stream error.
    Fail(String),
    /// Produce nothing until the stream is cancelled.
    Stall,
}

/// Deterministic [`ModelGateway`] fed from a fixed script.
pub struct ScriptedModelGateway {
    script: Mutex<VecDeque<ScriptedSegment>>,
    /// Replayed once the script is exhausted (a model that never stops).
    fallback: Option<ScriptedSegment>,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl ScriptedModelGateway {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: None,
            chunk_size: 8,
            chunk_delay: Duration::ZERO,
        }
    }

    /// Gateway that replays the same segment forever.
    pub fn looping(segment: ScriptedSegment) -> Self {
        let mut gateway = Self::new();
        gateway.fallback = Some(segment);
        gateway
    }

    pub fn push(self, segment: ScriptedSegment) -> Self {
        self.script.lock().expect("script lock").push_back(segment);
        self
    }

    pub fn push_text(self, text: impl Into<String>) -> Self {
        self.push(ScriptedSegment::Text(text.into()))
    }

    /// Chunk size used when streaming `Text` segments.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Delay inserted between chunks.
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    fn next_segment(&self) -> ScriptedSegment {
        self.script
            .lock()
            .expect("script lock")
            .pop_front()
            .or_else(|| self.fallback.clone())
            .unwrap_or_else(|| ScriptedSegment::Text(String::new()))
    }
}

impl Default for ScriptedModelGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelGateway for ScriptedModelGateway {
    async fn start_stream(
        &self,
        _conversation: &Conversation,
        _tools: &[ToolDefinition],
    ) -> Result<ModelStream, GatewayError> {
        let segment = self.next_segment();
        let (tx, rx) = mpsc::channel(32);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let chunk_size = self.chunk_size;
        let chunk_delay = self.chunk_delay;

        tokio::spawn(async move {
            match segment {
                ScriptedSegment::Text(text) => {
                    for chunk in chunk_text(&text, chunk_size) {
                        if token.is_cancelled() {
                            return;
                        }
                        if tx.send(StreamEvent::Delta(chunk)).await.is_err() {
                            return;
                        }
                        if !chunk_delay.is_zero() {
                            tokio::time::sleep(chunk_delay).await;
                        }
                    }
                    let _ = tx.send(StreamEvent::Completed).await;
                }
                ScriptedSegment::Fail(message) => {
                    let _ = tx.send(StreamEvent::Error(message)).await;
                }
                ScriptedSegment::Stall => {
                    // Hold the sender open, emitting nothing.
                    token.cancelled().await;
                }
            }
        });

        Ok(ModelStream::new(rx, cancel))
    }
}

/// Split text into chunks of roughly `size` bytes at char boundaries.
fn chunk_text(text: &str, size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        current.push(c);
        if current.len() >= size {
            chunks.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
