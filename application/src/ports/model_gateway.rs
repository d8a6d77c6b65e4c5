//! Model gateway port
//!
//! Defines how the orchestrator obtains model output. The runtime behind
//! the gateway is out of scope here — the contract only requires that
//! text arrives incrementally as [`StreamEvent`]s and that generation can
//! be cancelled.

use async_trait::async_trait;
use courier_domain::{Conversation, StreamEvent, ToolDefinition};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Errors raised when starting or driving a generation
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Gateway closed")]
    Closed,
}

/// Gateway to the model runtime.
///
/// `start_stream` begins one generation segment over the given history;
/// the advertised `tools` let the gateway include the current capability
/// catalog in whatever prompt format the runtime expects.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn start_stream(
        &self,
        conversation: &Conversation,
        tools: &[ToolDefinition],
    ) -> Result<ModelStream, GatewayError>;
}

/// Handle for one active generation segment.
///
/// Wraps the event receiver together with the cancellation token that
/// stops token production. Dropping the handle implicitly ends interest
/// in the stream; calling [`cancel`](Self::cancel) asks the runtime to
/// stop generating.
#[derive(Debug)]
pub struct ModelStream {
    receiver: mpsc::Receiver<StreamEvent>,
    cancel: CancellationToken,
}

impl ModelStream {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>, cancel: CancellationToken) -> Self {
        Self { receiver, cancel }
    }

    /// Receive the next event; `None` means the channel closed without a
    /// terminal event (treated as end-of-stream by the orchestrator).
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        self.receiver.recv().await
    }

    /// Ask the runtime to stop producing tokens.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}
