//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Arguments of a tool call, keyed by parameter name.
pub type ArgumentMap = HashMap<String, serde_json::Value>;

/// Description of a capability that can be requested by the model.
///
/// Definitions are presented by a provider at registration time and are
/// immutable afterwards. Parameter order is the order the builder added
/// them in, which is also the order advertised to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "list_events")
    pub name: String,
    /// Human-readable description, used when advertising the catalog
    pub description: String,
    /// Parameter specifications, in declaration order
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint (e.g., "string", "integer", "boolean")
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Look up a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn required_parameters(&self) -> impl Iterator<Item = &ToolParameter> {
        self.parameters.iter().filter(|p| p.required)
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// Correlation token for one tool call within a run.
///
/// Issued by the extractor from a monotonic counter, so ids are unique
/// for the lifetime of a run and a [`ToolResult`] can always be matched
/// back to the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(String);

impl CallId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A request, recovered from model output, to execute a named capability.
///
/// `raw_arguments` holds the body text exactly as the model emitted it;
/// `parsed_arguments` is only present when that body decoded cleanly into
/// an argument object. A call with `parsed_arguments == None` is still
/// routed to the dispatcher, which rejects it with `invalidArguments`
/// so the model sees what went wrong and can correct itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Correlation id, unique within the run
    pub id: CallId,
    /// Name of the requested tool
    pub name: String,
    /// Call body as emitted by the model
    pub raw_arguments: String,
    /// Decoded arguments, present only if decoding succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_arguments: Option<ArgumentMap>,
}

impl ToolCall {
    pub fn new(
        id: CallId,
        name: impl Into<String>,
        raw_arguments: impl Into<String>,
        parsed_arguments: Option<ArgumentMap>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            raw_arguments: raw_arguments.into(),
            parsed_arguments,
        }
    }

    /// Shorthand for a call with decoded arguments (used widely in tests)
    pub fn parsed(id: CallId, name: impl Into<String>, arguments: ArgumentMap) -> Self {
        let raw = serde_json::to_string(&arguments).unwrap_or_default();
        Self::new(id, name, raw, Some(arguments))
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed_arguments.is_some()
    }

    /// Get a decoded argument by name
    pub fn argument(&self, key: &str) -> Option<&serde_json::Value> {
        self.parsed_arguments.as_ref().and_then(|m| m.get(key))
    }

    /// Get a decoded string argument by name
    pub fn string_argument(&self, key: &str) -> Option<&str> {
        self.argument(key).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_definition_builder() {
        let tool = ToolDefinition::new("list_events", "List calendar events")
            .with_parameter(ToolParameter::new("date", "Day to list", true))
            .with_parameter(ToolParameter::new("limit", "Max events", false).with_type("integer"));

        assert_eq!(tool.name, "list_events");
        assert_eq!(tool.parameters.len(), 2);
        assert_eq!(tool.parameter("limit").unwrap().param_type, "integer");
        assert_eq!(tool.required_parameters().count(), 1);
    }

    #[test]
    fn test_parameter_order_is_declaration_order() {
        let tool = ToolDefinition::new("t", "")
            .with_parameter(ToolParameter::new("b", "", false))
            .with_parameter(ToolParameter::new("a", "", false));

        let names: Vec<&str> = tool.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_call_id() {
        let id = CallId::new("call-7");
        assert_eq!(id.as_str(), "call-7");
        assert_eq!(id.to_string(), "call-7");
    }

    #[test]
    fn test_tool_call_arguments() {
        let mut args = ArgumentMap::new();
        args.insert("city".into(), serde_json::json!("Tokyo"));
        let call = ToolCall::parsed(CallId::new("call-1"), "weather", args);

        assert!(call.is_parsed());
        assert_eq!(call.string_argument("city"), Some("Tokyo"));
        assert!(call.argument("missing").is_none());
    }

    #[test]
    fn test_unparsed_tool_call() {
        let call = ToolCall::new(CallId::new("call-2"), "weather", "{\"city\": tru", None);
        assert!(!call.is_parsed());
        assert!(call.string_argument("city").is_none());
    }
}
