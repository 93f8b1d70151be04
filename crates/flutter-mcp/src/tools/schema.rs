//! Minimal JSON-schema argument validation
//!
//! Covers the contract the dispatcher enforces before invoking a tool:
//! required parameters must be present, and any declared property that is
//! supplied must carry the declared JSON type. Everything subtler is left
//! to the tool's own input parsing.

use serde_json::Value;

/// Validate `args` against a tool input schema.
///
/// # Errors
///
/// Returns a human-readable description of the first violation.
pub fn validate_arguments(schema: &Value, args: &Value) -> Result<(), String> {
    let args_obj = match args {
        Value::Object(obj) => obj,
        Value::Null => {
            return match required_names(schema) {
                names if names.is_empty() => Ok(()),
                names => Err(format!("missing required parameter '{}'", names[0])),
            };
        }
        other => {
            return Err(format!(
                "arguments must be an object, got {}",
                type_name(other)
            ));
        }
    };

    for name in required_names(schema) {
        if !args_obj.contains_key(name) {
            return Err(format!("missing required parameter '{name}'"));
        }
    }

    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (name, declared) in properties {
            let Some(supplied) = args_obj.get(name) else {
                continue;
            };
            let Some(expected) = declared.get("type").and_then(Value::as_str) else {
                continue;
            };

            if !type_matches(expected, supplied) {
                return Err(format!(
                    "parameter '{name}' must be a {expected}, got {}",
                    type_name(supplied)
                ));
            }
        }
    }

    Ok(())
}

fn required_names(schema: &Value) -> Vec<&str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
