//! Capability Registry
//!
//! The [`CapabilityRegistry`] holds every registered provider and answers
//! "what tools exist" and "which provider owns tool X". Registration goes
//! through [`RegistryBuilder`] and is sealed by
//! [`build`](RegistryBuilder::build): after that the registry is
//! immutable, so any number of dispatchers and runs can read it
//! concurrently without synchronization.
//!
//! # Usage
//!
//! ```ignore
//! use courier_infrastructure::registry::CapabilityRegistry;
//!
//! let registry = CapabilityRegistry::builder()
//!     .register(CalendarProvider::new())?
//!     .register(UtilityProvider::new())?
//!     .build();
//!
//! let provider = registry.resolve("list_events")?;
//! let catalog = registry.list_tools(); // registration order
//! ```
//!
//! A tool name is owned by exactly one provider; the builder rejects the
//! second registration of a name with
//! [`RegistryError::DuplicateToolName`].

use std::collections::HashMap;
use std::sync::Arc;

use courier_domain::{CapabilityProvider, ToolDefinition};
use thiserror::Error;

/// Errors raised by registration and resolution
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Tool '{tool}' from provider '{provider}' is already owned by provider '{owner}'")]
    DuplicateToolName {
        tool: String,
        provider: String,
        owner: String,
    },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

/// Builder for [`CapabilityRegistry`].
///
/// Single-writer discipline: all providers are registered here, before
/// the registry exists; there is no way to add one after `build()`.
#[derive(Default)]
pub struct RegistryBuilder {
    providers: Vec<Arc<dyn CapabilityProvider>>,
    owners: HashMap<String, usize>,
    catalog: Vec<ToolDefinition>,
}

impl std::fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("providers", &self.providers.len())
            .field("owners", &self.owners)
            .field("catalog", &self.catalog)
            .finish()
    }
}

impl RegistryBuilder {
    /// Register a provider and all the tools it exposes.
    ///
    /// Fails if any tool name is already owned; the builder is consumed
    /// either way, so a failed registration ends construction.
    pub fn register<P: CapabilityProvider + 'static>(
        self,
        provider: P,
    ) -> Result<Self, RegistryError> {
        self.register_arc(Arc::new(provider))
    }

    /// Register a provider behind an existing `Arc`.
    pub fn register_arc(
        mut self,
        provider: Arc<dyn CapabilityProvider>,
    ) -> Result<Self, RegistryError> {
        let index = self.providers.len();
        for tool in provider.tools() {
            if let Some(&owner_index) = self.owners.get(&tool.name) {
                // the colliding owner may be this very provider
                let owner = if owner_index == index {
                    provider.provider_id().to_string()
                } else {
                    self.providers[owner_index].provider_id().to_string()
                };
                return Err(RegistryError::DuplicateToolName {
                    tool: tool.name,
                    provider: provider.provider_id().to_string(),
                    owner,
                });
            }
            tracing::debug!(
                tool = %tool.name,
                provider = provider.provider_id(),
                "Registered tool"
            );
            self.owners.insert(tool.name.clone(), index);
            self.catalog.push(tool);
        }
        self.providers.push(provider);
        Ok(self)
    }

    /// Seal the registry. No registration is possible afterwards.
    pub fn build(self) -> CapabilityRegistry {
        tracing::info!(
            providers = self.providers.len(),
            tools = self.catalog.len(),
            "Capability registry sealed"
        );
        CapabilityRegistry {
            providers: self.providers,
            owners: self.owners,
            catalog: self.catalog,
        }
    }
}

/// Immutable mapping from tool names to the providers that own them.
pub struct CapabilityRegistry {
    providers: Vec<Arc<dyn CapabilityProvider>>,
    owners: HashMap<String, usize>,
    catalog: Vec<ToolDefinition>,
}

impl CapabilityRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Resolve the provider that owns `tool_name`. O(1) expected.
    pub fn resolve(&self, tool_name: &str) -> Result<&Arc<dyn CapabilityProvider>, RegistryError> {
        self.owners
            .get(tool_name)
            .map(|&index| &self.providers[index])
            .ok_or_else(|| RegistryError::UnknownTool(tool_name.to_string()))
    }

    /// The definition of a registered tool.
    pub fn definition(&self, tool_name: &str) -> Option<&ToolDefinition> {
        self.catalog.iter().find(|t| t.name == tool_name)
    }

    /// The full catalog, in registration order. Safe for concurrent
    /// callers — the registry never changes after `build()`.
    pub fn list_tools(&self) -> &[ToolDefinition] {
        &self.catalog
    }

    pub fn providers(&self) -> &[Arc<dyn CapabilityProvider>] {
        &self.providers
    }

    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.provider_id()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}
