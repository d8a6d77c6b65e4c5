//! Application layer for courier
//!
//! This crate contains the orchestration use case and the ports it
//! depends on. Ports are implemented by adapters in the infrastructure
//! layer; the orchestrator itself only sees the abstract contracts, so a
//! run is fully testable with injected deterministic streams and
//! dispatchers.

pub mod ports;
pub mod run;

pub use ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
pub use ports::model_gateway::{GatewayError, ModelGateway, ModelStream};
pub use ports::run_observer::{NoObserver, RunObserver};
pub use ports::tool_dispatch::ToolDispatchPort;
pub use run::limits::RunLimits;
pub use run::types::{RunError, RunInput, RunOutput, RunPhase};
pub use run::Orchestrator;
