//! Ports (interfaces) for the application layer
//!
//! These traits define how the orchestration core talks to the outside
//! world. Implementations (adapters) live in the infrastructure layer.

pub mod conversation_logger;
pub mod model_gateway;
pub mod run_observer;
pub mod tool_dispatch;
