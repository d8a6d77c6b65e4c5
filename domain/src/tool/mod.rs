//! Tool domain model
//!
//! The protocol spoken between the orchestrator and capability providers:
//! tool descriptions, calls, results, and the provider contract itself.

pub mod entities;
pub mod provider;
pub mod validation;
pub mod value_objects;

pub use entities::{ArgumentMap, CallId, ToolCall, ToolDefinition, ToolParameter};
pub use provider::{CapabilityProvider, ProviderError};
pub use validation::validate_arguments;
pub use value_objects::{InvocationError, InvocationErrorKind, ToolResult};
