//! Run limits.
//!
//! Every wait in a run is bounded by one of these values; there is no
//! unbounded suspension anywhere in the loop. Defaults follow the
//! assistant's production settings: up to 10 tool turns per run and tool
//! results truncated to 3000 bytes before they re-enter the context.

use std::time::Duration;

/// Bounds applied to one orchestration run.
#[derive(Debug, Clone)]
pub struct RunLimits {
    /// Maximum number of tool turns before the run fails
    pub max_turns: usize,
    /// Wall-clock budget for the whole run
    pub time_budget: Duration,
    /// Deadline for each dispatched tool call
    pub tool_timeout: Duration,
    /// Maximum wait for the next chunk from the model stream
    pub stream_read_timeout: Duration,
    /// How long cancellation waits for in-flight work to acknowledge
    pub cancel_grace: Duration,
    /// Tool result content is truncated to this many bytes
    pub max_tool_result_len: usize,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            max_turns: 10,
            time_budget: Duration::from_secs(120),
            tool_timeout: Duration::from_secs(30),
            stream_read_timeout: Duration::from_secs(60),
            cancel_grace: Duration::from_millis(250),
            max_tool_result_len: 3000,
        }
    }
}

impl RunLimits {
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_stream_read_timeout(mut self, timeout: Duration) -> Self {
        self.stream_read_timeout = timeout;
        self
    }

    pub fn with_cancel_grace(mut self, grace: Duration) -> Self {
        self.cancel_grace = grace;
        self
    }

    pub fn with_max_tool_result_len(mut self, len: usize) -> Self {
        self.max_tool_result_len = len;
        self
    }
}
