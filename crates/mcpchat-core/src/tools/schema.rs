//! Conversion from tool server descriptors to endpoint tool schemas

use serde_json::{Map, Value};

use crate::logging::Logger;
use crate::types::{ToolDescriptor, ToolSchema};

use super::naming::translate;

/// Return a copy of `schema` with `type`, `properties` and `required` filled in
///
/// Keys already present are left untouched; the input is never mutated. A
/// missing or non-object schema is treated as an empty object.
pub fn with_schema_defaults(schema: Option<&Value>) -> Value {
    let mut merged: Map<String, Value> = match schema {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    merged
        .entry("type")
        .or_insert_with(|| Value::String("object".to_string()));
    merged
        .entry("properties")
        .or_insert_with(|| Value::Object(Map::new()));
    merged
        .entry("required")
        .or_insert_with(|| Value::Array(Vec::new()));

    Value::Object(merged)
}

/// Convert one descriptor, or `None` if it lacks a name or description
pub fn to_tool_schema(tool: &ToolDescriptor) -> Option<ToolSchema> {
    let description = tool.description.as_ref()?;
    if tool.name.is_empty() {
        return None;
    }

    Some(ToolSchema::function(
        translate(&tool.name),
        description.clone(),
        with_schema_defaults(tool.input_schema.as_ref()),
    ))
}

/// Convert a server's tool listing into endpoint tool schemas
///
/// Order follows the input. Descriptors without a name or description are
/// skipped. No deduplication happens here.
pub fn to_tool_schemas(tools: &[ToolDescriptor], logger: &dyn Logger) -> Vec<ToolSchema> {
    tools
        .iter()
        .filter_map(|tool| {
            let schema = to_tool_schema(tool);
            if schema.is_none() {
                logger.debug(&format!(
                    "[ToolSchema] Skipping tool {:?}: missing name or description",
                    tool.name
                ));
            }
            schema
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use serde_json::json;

    #[test]
    fn test_defaults_fill_missing_keys() {
        assert_eq!(
            with_schema_defaults(None),
            json!({"type": "object", "properties": {}, "required": []})
        );

        let partial = json!({"properties": {"a": {"type": "number"}}});
        assert_eq!(
            with_schema_defaults(Some(&partial)),
            json!({
                "type": "object",
                "properties": {"a": {"type": "number"}},
                "required": []
            })
        );
    }

    #[test]
    fn test_defaults_never_overwrite() {
        let declared = json!({
            "type": "custom",
            "properties": {"path": {"type": "string"}},
            "required": ["path"],
            "additionalProperties": false
        });

        let merged = with_schema_defaults(Some(&declared));
        assert_eq!(merged, declared);
    }

    #[test]
    fn test_defaults_do_not_mutate_input() {
        let declared = json!({"properties": {}});
        let _ = with_schema_defaults(Some(&declared));
        assert_eq!(declared, json!({"properties": {}}));
    }

    #[test]
    fn test_conversion_translates_and_orders() {
        let tools = vec![
            ToolDescriptor::new("calc-add", "Add two numbers").with_schema(json!({
                "type": "object",
                "properties": {"a": {"type": "number"}, "b": {"type": "number"}},
                "required": ["a", "b"]
            })),
            ToolDescriptor::new("Read File", "Read a file"),
        ];

        let schemas = to_tool_schemas(&tools, &NoOpLogger);
        assert_eq!(schemas.len(), 2);
        assert_eq!(schemas[0].kind, "function");
        assert_eq!(schemas[0].name(), "calc_add");
        assert_eq!(schemas[0].function.parameters["required"], json!(["a", "b"]));
        assert_eq!(schemas[1].name(), "read_file");
        assert_eq!(schemas[1].function.parameters["properties"], json!({}));
    }

    #[test]
    fn test_conversion_skips_incomplete_descriptors() {
        let tools = vec![
            ToolDescriptor::new("no-description", "x").without_description(),
            ToolDescriptor::new("", "nameless"),
            ToolDescriptor::new("kept", "Kept tool"),
        ];

        let schemas = to_tool_schemas(&tools, &NoOpLogger);
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].name(), "kept");
    }

    #[test]
    fn test_conversion_keeps_duplicates() {
        let tools = vec![
            ToolDescriptor::new("calc-add", "first"),
            ToolDescriptor::new("calc_add", "second"),
        ];

        let schemas = to_tool_schemas(&tools, &NoOpLogger);
        assert_eq!(schemas.len(), 2);
        assert!(schemas.iter().all(|s| s.name() == "calc_add"));
    }
}
