//! Run progress port.
//!
//! [`RunObserver`] is an output port the conversation/UI layer implements
//! to follow a run as it happens: text as it streams, tool invocations
//! and completions, and the terminal status.
//!
//! All methods have default no-op implementations, so implementers only
//! need to override the callbacks they care about.

use crate::run::types::RunPhase;
use courier_domain::{ToolCall, ToolResult};

/// Observer for incremental run events.
pub trait RunObserver: Send + Sync {
    /// Called when the run transitions to a new phase
    fn on_phase_change(&self, _phase: RunPhase) {}

    /// Called for each visible text span as it is recovered from the stream
    fn on_text(&self, _text: &str) {}

    /// Called for each hidden reasoning span
    fn on_thinking(&self, _text: &str) {}

    /// Called when a tool call has been detected and is about to dispatch
    fn on_tool_invoked(&self, _call: &ToolCall) {}

    /// Called when a dispatched call has resolved (success or error)
    fn on_tool_completed(&self, _result: &ToolResult) {}

    /// Called exactly once, with the terminal phase of the run
    fn on_finished(&self, _phase: RunPhase) {}
}

/// No-op observer for headless runs and tests.
pub struct NoObserver;

impl RunObserver for NoObserver {}
