//! Tool dispatch port
//!
//! Defines how the orchestrator executes tool calls. The implementation
//! (registry + dispatcher) lives in the infrastructure layer.

use async_trait::async_trait;
use courier_domain::{ToolCall, ToolDefinition, ToolResult};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Port for dispatching tool calls to capability providers.
///
/// `invoke` never fails at the Rust level: every outcome — success,
/// unknown tool, bad arguments, provider failure, timeout, cancellation —
/// is expressed as a [`ToolResult`] so the orchestrator can feed it back
/// to the model.
#[async_trait]
pub trait ToolDispatchPort: Send + Sync {
    /// The full tool catalog, in registration order.
    fn catalog(&self) -> Vec<ToolDefinition>;

    /// Whether a tool with this name is registered.
    fn has_tool(&self, name: &str) -> bool {
        self.catalog().iter().any(|t| t.name == name)
    }

    /// Execute one call under a deadline.
    ///
    /// `cancel` propagates cooperative cancellation from the run; a
    /// token that fires mid-call should resolve the call promptly with a
    /// `cancelled` result.
    async fn invoke(
        &self,
        call: &ToolCall,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> ToolResult;
}
