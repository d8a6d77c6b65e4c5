//! Tool domain value objects — immutable result and error types
//!
//! These types form the output side of the invocation protocol. Every
//! dispatched call produces exactly one [`ToolResult`], success or not;
//! dispatcher-level failures are data, never faults, so a bad tool name
//! or argument list can be fed back to the model instead of aborting
//! the run.

use serde::{Deserialize, Serialize};

use super::entities::CallId;

/// Classification of an invocation failure.
///
/// The kind determines retryability:
///
/// | Kind | Retryable? | Description |
/// |------|-----------|-------------|
/// | `unknownTool` | Yes | No provider owns the name — model can correct |
/// | `invalidArguments` | Yes | Missing/mistyped parameters — model can fix |
/// | `providerUnavailable` | No | Provider cannot serve calls right now |
/// | `executionFailed` | No | Provider failed while running the call |
/// | `timeout` | No | Deadline expired before the provider returned |
/// | `cancelled` | No | Call was cancelled cooperatively |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InvocationErrorKind {
    UnknownTool,
    InvalidArguments,
    ProviderUnavailable,
    ExecutionFailed,
    Timeout,
    Cancelled,
}

impl InvocationErrorKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::UnknownTool => "unknownTool",
            Self::InvalidArguments => "invalidArguments",
            Self::ProviderUnavailable => "providerUnavailable",
            Self::ExecutionFailed => "executionFailed",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the model is likely to recover by adjusting its next call
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UnknownTool | Self::InvalidArguments)
    }
}

impl std::fmt::Display for InvocationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured error carried by a failed [`ToolResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationError {
    /// Failure classification
    pub kind: InvocationErrorKind,
    /// Human-readable message, preserved for diagnostics
    pub message: String,
    /// Whether a corrected retry could succeed
    pub retryable: bool,
}

impl InvocationError {
    pub fn new(kind: InvocationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable: kind.is_retryable(),
        }
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::new(
            InvocationErrorKind::UnknownTool,
            format!("No provider owns tool: {}", name.into()),
        )
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(InvocationErrorKind::InvalidArguments, message)
    }

    pub fn provider_unavailable(message: impl Into<String>) -> Self {
        Self::new(InvocationErrorKind::ProviderUnavailable, message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(InvocationErrorKind::ExecutionFailed, message)
    }

    pub fn timeout(tool: impl Into<String>) -> Self {
        Self::new(
            InvocationErrorKind::Timeout,
            format!("Tool call timed out: {}", tool.into()),
        )
    }

    pub fn cancelled() -> Self {
        Self::new(InvocationErrorKind::Cancelled, "Tool call cancelled")
    }
}

impl std::fmt::Display for InvocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for InvocationError {}

/// Result of one dispatched tool call.
///
/// Correlated back to the originating [`ToolCall`](super::entities::ToolCall)
/// through `call_id`; consumed exactly once by the orchestrator, which
/// appends it to the conversation as a provider-authored entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Id of the call this result answers
    pub call_id: CallId,
    /// Name of the tool that was invoked
    pub tool_name: String,
    /// Whether the invocation succeeded
    pub success: bool,
    /// Output content (success), or diagnostic payload (failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Error information for failed invocations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<InvocationError>,
    /// Wall-clock duration of the invocation in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ToolResult {
    /// Create a successful result
    pub fn ok(call_id: CallId, tool_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id,
            tool_name: tool_name.into(),
            success: true,
            content: Some(content.into()),
            error: None,
            duration_ms: None,
        }
    }

    /// Create a failed result
    pub fn fail(call_id: CallId, tool_name: impl Into<String>, error: InvocationError) -> Self {
        Self {
            call_id,
            tool_name: tool_name.into(),
            success: false,
            content: None,
            error: Some(error),
            duration_ms: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_ok(&self) -> bool {
        self.success
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn error(&self) -> Option<&InvocationError> {
        self.error.as_ref()
    }

    pub fn error_kind(&self) -> Option<InvocationErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }

    /// Render the result the way it is fed back to the model.
    ///
    /// Failures include the error kind so the model can distinguish a
    /// correctable mistake from an environmental one.
    pub fn render(&self) -> String {
        match (&self.content, &self.error) {
            (Some(content), None) => content.clone(),
            (_, Some(error)) => format!("error ({}): {}", error.kind, error.message),
            (None, None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_retryability() {
        assert!(InvocationErrorKind::UnknownTool.is_retryable());
        assert!(InvocationErrorKind::InvalidArguments.is_retryable());
        assert!(!InvocationErrorKind::Timeout.is_retryable());
        assert!(!InvocationErrorKind::ExecutionFailed.is_retryable());
        assert!(!InvocationErrorKind::Cancelled.is_retryable());
    }

    #[test]
    fn test_error_constructors_set_retryable() {
        assert!(InvocationError::unknown_tool("listEvents").retryable);
        assert!(InvocationError::invalid_arguments("missing: date").retryable);
        assert!(!InvocationError::timeout("listEvents").retryable);
        assert!(!InvocationError::cancelled().retryable);
    }

    #[test]
    fn test_kind_serializes_camel_case() {
        let json = serde_json::to_string(&InvocationErrorKind::UnknownTool).unwrap();
        assert_eq!(json, "\"unknownTool\"");
        let json = serde_json::to_string(&InvocationErrorKind::InvalidArguments).unwrap();
        assert_eq!(json, "\"invalidArguments\"");
    }

    #[test]
    fn test_ok_result() {
        let result = ToolResult::ok(CallId::new("call-1"), "echo", "hello").with_duration(12);
        assert!(result.is_ok());
        assert_eq!(result.content(), Some("hello"));
        assert!(result.error().is_none());
        assert_eq!(result.duration_ms, Some(12));
        assert_eq!(result.render(), "hello");
    }

    #[test]
    fn test_fail_result() {
        let result = ToolResult::fail(
            CallId::new("call-2"),
            "listEvents",
            InvocationError::unknown_tool("listEvents"),
        );
        assert!(!result.is_ok());
        assert!(result.content().is_none());
        assert_eq!(result.error_kind(), Some(InvocationErrorKind::UnknownTool));
        assert!(result.render().starts_with("error (unknownTool):"));
    }
}
