//! Capability provider abstraction
//!
//! This module defines the [`CapabilityProvider`] trait, the contract
//! between the dispatcher and the components that actually execute tools
//! (calendar, reminders, files, web search, ...). Those implementations
//! live outside this crate; the core only speaks this interface.
//!
//! # Contract
//!
//! - A provider presents its [`ToolDefinition`]s once, at registration.
//!   The set never changes afterwards.
//! - `execute` runs one call. The dispatcher guarantees that at most one
//!   call is in flight per provider at any time, so implementations may
//!   keep per-call state without their own locking.
//! - The `cancel` token fires when the call's deadline expires or the
//!   user aborts the run. A well-behaved provider observes it and returns
//!   promptly; one that does not is cut off by the dispatcher's deadline
//!   and its late result is discarded.

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::entities::{ArgumentMap, ToolDefinition};

/// Error type for provider execution
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider cannot serve calls right now (e.g., backing service down)
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// The named tool is not one of this provider's tools
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Execution started but failed
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// A component exposing one or more named capabilities.
///
/// Registered once at startup into the capability registry; executed
/// through the dispatcher, which enforces per-provider serialization and
/// the call deadline.
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    /// Unique, stable identifier for this provider (e.g., "calendar")
    fn provider_id(&self) -> &str;

    /// The tools this provider exposes.
    ///
    /// Called once at registration; the returned definitions are the
    /// provider's permanent contribution to the catalog.
    fn tools(&self) -> Vec<ToolDefinition>;

    /// Execute one tool call.
    ///
    /// `arguments` have already been validated against the tool's
    /// parameter schema. Returns the content to feed back to the model,
    /// or a [`ProviderError`] which the dispatcher converts into an
    /// error result — never a fault.
    async fn execute(
        &self,
        name: &str,
        arguments: &ArgumentMap,
        cancel: CancellationToken,
    ) -> Result<String, ProviderError>;
}
