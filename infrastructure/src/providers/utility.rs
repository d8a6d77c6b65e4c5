//! Builtin utility provider.

use async_trait::async_trait;
use courier_domain::{
    ArgumentMap, CapabilityProvider, ProviderError, ToolDefinition, ToolParameter,
};
use tokio_util::sync::CancellationToken;

/// Minimal always-available provider: `echo` and `current_time`.
pub struct UtilityProvider;

impl UtilityProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UtilityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CapabilityProvider for UtilityProvider {
    fn provider_id(&self) -> &str {
        "utility"
    }

    fn tools(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new("echo", "Echo the given text back")
                .with_parameter(ToolParameter::new("text", "Text to echo", true)),
            ToolDefinition::new("current_time", "Current date and time in UTC (RFC 3339)"),
        ]
    }

    async fn execute(
        &self,
        name: &str,
        arguments: &ArgumentMap,
        _cancel: CancellationToken,
    ) -> Result<String, ProviderError> {
        match name {
            "echo" => {
                let text = arguments
                    .get("text")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| {
                        ProviderError::ExecutionFailed("echo requires a 'text' argument".into())
                    })?;
                Ok(text.to_string())
            }
            "current_time" => Ok(chrono::Utc::now().to_rfc3339()),
            other => Err(ProviderError::ToolNotFound(other.to_string())),
        }
    }
}
