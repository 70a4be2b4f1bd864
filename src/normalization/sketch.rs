//! Shallow schema sketches inferred from example payloads

use serde_json::Value as JsonValue;

use crate::core::{PropertySketch, SchemaSketch};

/// JSON Schema primitive name for a JSON value
pub fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => "integer",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Sketch a schema from an example value; object keys become properties
pub fn sketch_from_example(example: &JsonValue) -> SchemaSketch {
    let properties = example
        .as_object()
        .map(|obj| {
            obj.iter()
                .map(|(key, value)| {
                    (
                        key.clone(),
                        PropertySketch {
                            property_type: json_type_name(value).to_string(),
                            ..Default::default()
                        },
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    SchemaSketch {
        schema_type: json_type_name(example).to_string(),
        properties,
        required: Vec::new(),
        example: Some(example.clone()),
    }
}

/// Sketch an object schema from a flat list of field names (form bodies)
pub fn sketch_from_fields<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> SchemaSketch {
    SchemaSketch {
        schema_type: "object".to_string(),
        properties: fields
            .into_iter()
            .map(|(name, kind)| {
                (
                    name.to_string(),
                    PropertySketch {
                        property_type: kind.to_string(),
                        ..Default::default()
                    },
                )
            })
            .collect(),
        required: Vec::new(),
        example: None,
    }
}
