//! Tool/function calling types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool metadata as declared by a tool server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Native tool name, as the server knows it
    pub name: String,
    /// Description of what the tool does
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema", skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl ToolDescriptor {
    /// Create a new tool descriptor
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            input_schema: None,
        }
    }

    /// Set the input schema
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }

    /// Drop the description
    pub fn without_description(mut self) -> Self {
        self.description = None;
        self
    }
}

/// Tool definition in the completion endpoint's format
///
/// Serializes as `{"type": "function", "function": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Always `"function"`
    #[serde(rename = "type")]
    pub kind: String,
    /// The function definition
    pub function: FunctionDefinition,
}

impl ToolSchema {
    /// Create a function tool schema
    pub fn function(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            kind: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }

    /// Endpoint-facing tool name
    pub fn name(&self) -> &str {
        &self.function.name
    }
}

/// Function definition inside a [`ToolSchema`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Endpoint-safe function name
    pub name: String,
    /// Description of what the function does
    pub description: String,
    /// JSON Schema for the parameters
    pub parameters: Value,
}

/// Tool call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,
    /// Endpoint-facing name of the tool being called
    pub name: String,
    /// Arguments as JSON text, exactly as the endpoint sent them
    pub arguments: String,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Decode the JSON-text arguments
    pub fn decode_arguments(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.arguments)
    }
}

/// Result of executing a tool on a tool server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// Whether the server flagged the call as failed
    #[serde(rename = "isError", default)]
    pub is_error: bool,
    /// Content returned by the server
    pub content: Value,
}

impl ToolOutcome {
    /// Create a successful outcome
    pub fn success(content: impl Into<Value>) -> Self {
        Self {
            is_error: false,
            content: content.into(),
        }
    }

    /// Create a failed outcome
    pub fn error(content: impl Into<Value>) -> Self {
        Self {
            is_error: true,
            content: content.into(),
        }
    }

    /// Render the content as text for a tool message
    ///
    /// Strings pass through, lists of `{"type": "text"}` items are joined by
    /// newlines, anything else is serialized as JSON.
    pub fn content_text(&self) -> String {
        match &self.content {
            Value::String(text) => text.clone(),
            Value::Array(items) if !items.is_empty() && items.iter().all(is_text_item) => items
                .iter()
                .filter_map(|item| item.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n"),
            other => other.to_string(),
        }
    }
}

fn is_text_item(item: &Value) -> bool {
    item.get("type").and_then(Value::as_str) == Some("text")
        && item.get("text").map_or(false, Value::is_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_schema_serialization() {
        let schema = ToolSchema::function(
            "get_weather",
            "Get the current weather",
            json!({"type": "object", "properties": {}, "required": []}),
        );

        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "get_weather");
        assert_eq!(value["function"]["parameters"]["type"], "object");
    }

    #[test]
    fn test_decode_arguments() {
        let call = ToolCall::new("call_1", "calc_add", r#"{"a": 2, "b": 2}"#);
        assert_eq!(call.decode_arguments().unwrap(), json!({"a": 2, "b": 2}));

        let broken = ToolCall::new("call_2", "calc_add", "{not json");
        assert!(broken.decode_arguments().is_err());
    }

    #[test]
    fn test_outcome_content_text() {
        assert_eq!(ToolOutcome::success("4").content_text(), "4");

        let items = ToolOutcome::success(json!([
            {"type": "text", "text": "line one"},
            {"type": "text", "text": "line two"}
        ]));
        assert_eq!(items.content_text(), "line one\nline two");

        let mixed = ToolOutcome::success(json!([{"type": "image", "data": "..."}]));
        let rendered = mixed.content_text();
        assert!(rendered.starts_with('['));
        assert!(rendered.contains(r#""type":"image""#));
    }

    #[test]
    fn test_descriptor_builder() {
        let tool = ToolDescriptor::new("calc-add", "Add two numbers")
            .with_schema(json!({"type": "object"}));
        assert_eq!(tool.name, "calc-add");
        assert!(tool.input_schema.is_some());
        assert!(tool.without_description().description.is_none());
    }
}
