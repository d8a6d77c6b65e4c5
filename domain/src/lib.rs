//! Domain layer for courier
//!
//! This crate contains the value types and pure logic of the
//! tool-invocation core. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tool calls
//!
//! While generating a response, the model may request execution of a named
//! capability by embedding a marked-up span in its output. The
//! [`extract::ToolCallExtractor`] recovers these spans incrementally from
//! the token stream; the surrounding text is surfaced unchanged.
//!
//! ## Providers
//!
//! Capabilities are grouped into providers. A provider exposes its
//! [`ToolDefinition`]s at registration time and executes calls through the
//! [`CapabilityProvider`] contract. Registration, resolution, and dispatch
//! live in the infrastructure layer.

pub mod conversation;
pub mod core;
pub mod extract;
pub mod stream;
pub mod tool;

// Re-export commonly used types
pub use conversation::{Conversation, Role, TurnEntry};
pub use extract::{Fragment, ToolCallExtractor, TOOL_CALL_CLOSE, TOOL_CALL_OPEN};
pub use stream::StreamEvent;
pub use tool::{
    entities::{ArgumentMap, CallId, ToolCall, ToolDefinition, ToolParameter},
    provider::{CapabilityProvider, ProviderError},
    validation::validate_arguments,
    value_objects::{InvocationError, InvocationErrorKind, ToolResult},
};
