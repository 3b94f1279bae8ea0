//! Rendering of tool descriptors as MCP tools.
//!
//! Input schemas are built from the declared parameter specs, so the schema
//! a client sees is the same one the validator enforces.

use std::sync::Arc;

use rmcp::model::{JsonObject, Tool, ToolAnnotations};
use serde_json::{Value, json};

use bastion_core::{Effect, ParameterKind, ParameterSpec, ToolDescriptor};

/// Converts a descriptor into an MCP tool with schema and annotations.
pub fn to_mcp_tool(descriptor: &ToolDescriptor) -> Tool {
    let mut tool = Tool::new(
        descriptor.name.clone(),
        descriptor.description.clone(),
        Arc::new(input_schema(descriptor)),
    );
    tool.annotations = Some(annotations(descriptor));
    tool
}

/// JSON schema of a tool's arguments object.
pub fn input_schema(descriptor: &ToolDescriptor) -> JsonObject {
    let mut properties = JsonObject::new();
    let mut required = Vec::new();

    for parameter in &descriptor.parameters {
        properties.insert(parameter.name.clone(), parameter_schema(parameter));
        if parameter.required {
            required.push(Value::String(parameter.name.clone()));
        }
    }

    let mut schema = JsonObject::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_string(), Value::Array(required));
    }
    schema.insert("additionalProperties".to_string(), json!(false));
    schema
}

fn parameter_schema(parameter: &ParameterSpec) -> Value {
    let json_type = match parameter.kind {
        ParameterKind::String | ParameterKind::Enum => "string",
        ParameterKind::Integer => "integer",
        ParameterKind::Boolean => "boolean",
    };

    let mut schema = JsonObject::new();
    schema.insert("type".to_string(), json!(json_type));
    schema.insert("description".to_string(), json!(parameter.description));

    if !parameter.allowed_values.is_empty() {
        schema.insert("enum".to_string(), json!(parameter.allowed_values));
    }
    if let Some((minimum, maximum)) = parameter.range {
        schema.insert("minimum".to_string(), json!(minimum));
        schema.insert("maximum".to_string(), json!(maximum));
    }
    if let Some(default) = &parameter.default {
        schema.insert("default".to_string(), default.to_json());
    }
    if parameter.secret {
        schema.insert("writeOnly".to_string(), json!(true));
    }

    Value::Object(schema)
}

fn annotations(descriptor: &ToolDescriptor) -> ToolAnnotations {
    ToolAnnotations::with_title(descriptor.title.clone())
        .read_only(descriptor.is_read_only())
        .destructive(descriptor.effect == Effect::Destructive)
        .idempotent(descriptor.idempotent)
        .open_world(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameterless_tool_has_no_required_list() {
        let descriptor = ToolDescriptor::new("noop", "No-op", "Does nothing.", Effect::ReadOnly);
        let schema = input_schema(&descriptor);

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"], json!({}));
        assert!(!schema.contains_key("required"));
    }

    #[test]
    fn test_secret_parameters_are_write_only() {
        let descriptor = ToolDescriptor::new("reset", "Reset", "Resets.", Effect::Modifying)
            .with_parameter(ParameterSpec::string("password", "New password").secret());
        let schema = input_schema(&descriptor);

        assert_eq!(schema["properties"]["password"]["writeOnly"], true);
        assert_eq!(schema["required"], json!(["password"]));
    }
}
