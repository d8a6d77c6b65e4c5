//! Type definitions for the orchestration run.

use crate::ports::model_gateway::GatewayError;
use courier_domain::{Conversation, ToolResult};
use serde::Serialize;
use thiserror::Error;

/// Phase of the orchestration state machine.
///
/// ```text
/// Idle ──> Generating ──> Completed
///              │  ▲
///              ▼  │
///          AwaitingTools
///
/// any phase ──> Failed | Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RunPhase {
    /// Run created, no tokens requested yet
    Idle,
    /// A model stream is active
    Generating,
    /// A segment ended with pending tool calls being dispatched
    AwaitingTools,
    /// The model produced a final answer with no pending calls
    Completed,
    /// A run-level limit or stream failure terminated the run
    Failed,
    /// External cancellation was honored
    Cancelled,
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Idle => "idle",
            Self::Generating => "generating",
            Self::AwaitingTools => "awaitingTools",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that terminate a run.
///
/// Dispatcher-level failures never appear here — they are fed back into
/// the conversation as error results. These are the run-level conditions
/// the caller must handle; none of them is retried automatically.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Turn limit exceeded after {turns} turns")]
    TurnLimitExceeded { turns: usize },

    #[error("Time budget exceeded after {elapsed_ms} ms")]
    TimeBudgetExceeded { elapsed_ms: u64 },

    #[error("Model stream stalled")]
    StreamStalled,

    #[error("Model stream failed: {0}")]
    StreamFailed(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Run cancelled")]
    Cancelled,
}

impl RunError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunError::Cancelled)
    }

    /// Terminal phase this error maps to.
    pub fn terminal_phase(&self) -> RunPhase {
        if self.is_cancelled() {
            RunPhase::Cancelled
        } else {
            RunPhase::Failed
        }
    }
}

/// Input for one run
#[derive(Debug, Clone)]
pub struct RunInput {
    /// The user's request
    pub request: String,
    /// Optional system prompt prepended to the conversation
    pub system_prompt: Option<String>,
}

impl RunInput {
    pub fn new(request: impl Into<String>) -> Self {
        Self {
            request: request.into(),
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// Output of a completed run
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// The visible answer, assembled from every plain-text span
    pub answer: String,
    /// Hidden reasoning spans, in emission order
    pub thinking: Vec<String>,
    /// The full model-visible history of the run
    pub conversation: Conversation,
    /// Number of tool turns the run used
    pub turns: usize,
    /// Every tool result produced during the run, in dispatch order
    pub tool_results: Vec<ToolResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_phases() {
        assert!(RunPhase::Completed.is_terminal());
        assert!(RunPhase::Failed.is_terminal());
        assert!(RunPhase::Cancelled.is_terminal());
        assert!(!RunPhase::Generating.is_terminal());
        assert!(!RunPhase::AwaitingTools.is_terminal());
        assert!(!RunPhase::Idle.is_terminal());
    }

    #[test]
    fn error_maps_to_terminal_phase() {
        assert_eq!(RunError::Cancelled.terminal_phase(), RunPhase::Cancelled);
        assert_eq!(
            RunError::TurnLimitExceeded { turns: 10 }.terminal_phase(),
            RunPhase::Failed
        );
    }

    #[test]
    fn run_input_builder() {
        let input = RunInput::new("what's the weather?").with_system_prompt("be brief");
        assert_eq!(input.request, "what's the weather?");
        assert_eq!(input.system_prompt.as_deref(), Some("be brief"));
    }
}
