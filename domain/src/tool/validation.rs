//! Schema-guided argument validation.
//!
//! Runs in the dispatcher before a provider is touched: a call whose
//! arguments never decoded, is missing a required parameter, or carries a
//! value of the wrong type is rejected with `invalidArguments` without
//! invoking the provider.

use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::InvocationError;

/// Validate a call's decoded arguments against its tool definition.
///
/// Declared parameter types map onto JSON value kinds:
/// `"string"`/`"path"` → string, `"number"` → any number, `"integer"` →
/// integer-valued number, `"boolean"` → bool. Unrecognized declared
/// types accept any value, and arguments not named by the schema are
/// passed through untouched.
pub fn validate_arguments(
    definition: &ToolDefinition,
    call: &ToolCall,
) -> Result<(), InvocationError> {
    let arguments = call.parsed_arguments.as_ref().ok_or_else(|| {
        InvocationError::invalid_arguments(format!(
            "Arguments for '{}' could not be decoded",
            call.name
        ))
    })?;

    for param in definition.required_parameters() {
        if !arguments.contains_key(&param.name) {
            return Err(InvocationError::invalid_arguments(format!(
                "Missing required parameter '{}' for tool '{}'",
                param.name, definition.name
            )));
        }
    }

    for (name, value) in arguments {
        let Some(param) = definition.parameter(name) else {
            continue;
        };
        if !type_matches(&param.param_type, value) {
            return Err(InvocationError::invalid_arguments(format!(
                "Parameter '{}' of tool '{}' expects {}, got {}",
                name,
                definition.name,
                param.param_type,
                json_kind(value)
            )));
        }
    }

    Ok(())
}

fn type_matches(param_type: &str, value: &serde_json::Value) -> bool {
    match param_type {
        "string" | "path" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        _ => true,
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
