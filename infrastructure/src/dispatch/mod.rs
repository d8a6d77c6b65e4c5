//! Dispatcher
//!
//! [`Dispatcher`] implements [`ToolDispatchPort`] on top of the sealed
//! [`CapabilityRegistry`]: it resolves the owning provider, validates
//! arguments against the tool's schema, serializes calls per provider,
//! and runs the execution under a deadline.
//!
//! # Execution discipline
//!
//! - At most one call is in flight per provider at any time; calls to
//!   different providers run fully concurrently. Each provider has its
//!   own execution slot (`tokio::sync::Mutex`), so providers never block
//!   each other.
//! - Every call runs under `tokio::time::timeout`. On expiry the call's
//!   cancellation token fires, the in-flight future is dropped, and the
//!   caller sees a `timeout` result; a late result from a provider that
//!   ignored the token is discarded with the future.
//! - Every outcome is a [`ToolResult`]. A bad tool name, bad arguments,
//!   a provider error, even a provider panic — none of them escapes as a
//!   fault into the orchestrator.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use courier_application::ports::tool_dispatch::ToolDispatchPort;
use courier_domain::{
    validate_arguments, InvocationError, ProviderError, ToolCall, ToolDefinition, ToolResult,
};
use futures::FutureExt;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::registry::CapabilityRegistry;

/// Routes validated tool calls to their providers.
pub struct Dispatcher {
    registry: Arc<CapabilityRegistry>,
    /// Per-provider execution slots, keyed by provider id.
    slots: HashMap<String, Arc<Mutex<()>>>,
}

impl Dispatcher {
    pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
        let slots = registry
            .providers()
            .iter()
            .map(|p| (p.provider_id().to_string(), Arc::new(Mutex::new(()))))
            .collect();
        Self { registry, slots }
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    fn slot_for(&self, provider_id: &str) -> Arc<Mutex<()>> {
        self.slots
            .get(provider_id)
            .cloned()
            .unwrap_or_else(|| Arc::new(Mutex::new(())))
    }
}

#[async_trait]
impl ToolDispatchPort for Dispatcher {
    fn catalog(&self) -> Vec<ToolDefinition> {
        self.registry.list_tools().to_vec()
    }

    async fn invoke(
        &self,
        call: &ToolCall,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> ToolResult {
        let started = Instant::now();

        if cancel.is_cancelled() {
            return ToolResult::fail(call.id.clone(), &call.name, InvocationError::cancelled());
        }

        let provider = match self.registry.resolve(&call.name) {
            Ok(provider) => provider,
            Err(_) => {
                warn!(tool = %call.name, id = %call.id, "Call to unknown tool");
                return ToolResult::fail(
                    call.id.clone(),
                    &call.name,
                    InvocationError::unknown_tool(&call.name),
                );
            }
        };

        let Some(definition) = self.registry.definition(&call.name) else {
            return ToolResult::fail(
                call.id.clone(),
                &call.name,
                InvocationError::unknown_tool(&call.name),
            );
        };

        if let Err(error) = validate_arguments(definition, call) {
            debug!(tool = %call.name, %error, "Rejected invalid arguments");
            return ToolResult::fail(call.id.clone(), &call.name, error);
        }
        let arguments = call.parsed_arguments.clone().unwrap_or_default();

        // Serialize calls to this provider; other providers are untouched.
        let slot = self.slot_for(provider.provider_id());
        let _guard = slot.lock().await;

        debug!(
            tool = %call.name,
            provider = provider.provider_id(),
            id = %call.id,
            "Invoking tool"
        );

        let call_token = cancel.child_token();
        let execution = std::panic::AssertUnwindSafe(provider.execute(
            &call.name,
            &arguments,
            call_token.clone(),
        ))
        .catch_unwind();

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                call_token.cancel();
                debug!(tool = %call.name, "Call cancelled");
                ToolResult::fail(call.id.clone(), &call.name, InvocationError::cancelled())
            }
            outcome = tokio::time::timeout(timeout, execution) => match outcome {
                Ok(Ok(Ok(content))) => ToolResult::ok(call.id.clone(), &call.name, content),
                Ok(Ok(Err(provider_error))) => {
                    warn!(tool = %call.name, error = %provider_error, "Provider returned an error");
                    ToolResult::fail(
                        call.id.clone(),
                        &call.name,
                        map_provider_error(provider_error),
                    )
                }
                Ok(Err(panic)) => {
                    let message = panic_message(panic);
                    warn!(tool = %call.name, message, "Provider panicked");
                    ToolResult::fail(
                        call.id.clone(),
                        &call.name,
                        InvocationError::execution_failed(message),
                    )
                }
                Err(_) => {
                    call_token.cancel();
                    warn!(tool = %call.name, timeout_ms = timeout.as_millis() as u64, "Tool call timed out");
                    ToolResult::fail(call.id.clone(), &call.name, InvocationError::timeout(&call.name))
                }
            },
        };

        result.with_duration(started.elapsed().as_millis() as u64)
    }
}

fn map_provider_error(error: ProviderError) -> InvocationError {
    match error {
        ProviderError::Unavailable(message) => InvocationError::provider_unavailable(message),
        ProviderError::ToolNotFound(name) => {
            InvocationError::execution_failed(format!("Provider does not implement tool: {name}"))
        }
        ProviderError::ExecutionFailed(message) => InvocationError::execution_failed(message),
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "provider panicked".to_string()
    }
}
