//! Channel-backed model gateway.
//!
//! Decouples the orchestrator from whatever produces tokens: each
//! `start_stream` call is forwarded as a [`StreamRequest`] on a plain
//! channel, and the runtime side answers by pushing [`StreamEvent`]s into
//! the request's `events` sender. The orchestrator's loop stays a
//! synchronous consumer of channels, with no knowledge of the runtime.

use async_trait::async_trait;
use courier_application::ports::model_gateway::{GatewayError, ModelGateway, ModelStream};
use courier_domain::{Conversation, StreamEvent, ToolDefinition};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// One generation request handed to the token-producing side.
pub struct StreamRequest {
    /// Snapshot of the model-visible history for this segment.
    pub conversation: Conversation,
    /// Catalog advertised for this segment.
    pub tools: Vec<ToolDefinition>,
    /// Where the producer pushes stream events.
    pub events: mpsc::Sender<StreamEvent>,
    /// Fires when the orchestrator wants generation stopped.
    pub cancel: CancellationToken,
}

/// Gateway that forwards generation requests over a channel.
pub struct ChannelModelGateway {
    requests: mpsc::Sender<StreamRequest>,
}

impl ChannelModelGateway {
    /// Create the gateway and the receiving end the runtime consumes.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<StreamRequest>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { requests: tx }, rx)
    }
}

#[async_trait]
impl ModelGateway for ChannelModelGateway {
    async fn start_stream(
        &self,
        conversation: &Conversation,
        tools: &[ToolDefinition],
    ) -> Result<ModelStream, GatewayError> {
        let (events, receiver) = mpsc::channel(32);
        let cancel = CancellationToken::new();

        let request = StreamRequest {
            conversation: conversation.clone(),
            tools: tools.to_vec(),
            events,
            cancel: cancel.clone(),
        };
        self.requests
            .send(request)
            .await
            .map_err(|_| GatewayError::Closed)?;

        Ok(ModelStream::new(receiver, cancel))
    }
}
