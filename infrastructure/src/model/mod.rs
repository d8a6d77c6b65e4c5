//! Model gateway adapters.
//!
//! [`ScriptedModelGateway`] produces deterministic, injected streams for
//! tests and demos; [`ChannelModelGateway`] bridges a real token source
//! into the [`ModelGateway`](courier_application::ModelGateway) port
//! through plain channels.

pub mod channel;
pub mod scripted;

pub use channel::{ChannelModelGateway, StreamRequest};
pub use scripted::{ScriptedModelGateway, ScriptedSegment};
