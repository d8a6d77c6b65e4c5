//! Infrastructure layer for courier
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the capability registry and dispatcher, model
//! gateways, the builtin utility provider, configuration loading, and
//! conversation logging.

pub mod config;
pub mod dispatch;
pub mod logging;
pub mod model;
pub mod providers;
pub mod registry;

// Re-export commonly used types
pub use config::{ConfigLoader, CourierConfig, RunSection};
pub use dispatch::Dispatcher;
pub use logging::JsonlConversationLogger;
pub use model::{ChannelModelGateway, ScriptedModelGateway, ScriptedSegment, StreamRequest};
pub use providers::UtilityProvider;
pub use registry::{CapabilityRegistry, RegistryBuilder, RegistryError};
