//! Declared result shapes for schema-constrained completions
//!
//! A `ResultSchema` is both rendered into the JSON Schema sent to the
//! provider and walked against whatever comes back. Provider-side
//! enforcement is never trusted on its own.

use super::client::{JsonSchemaFormat, ResponseFormat};
use crate::error::{LitSearchError, Result};
use serde_json::{json, Map, Value};

/// Expected type of a value
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaType {
    String,
    Number {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    Enum(&'static [&'static str]),
    Array(Box<SchemaType>),
    Object(Vec<SchemaField>),
}

impl SchemaType {
    /// Number constrained to an inclusive range
    pub fn number_in(minimum: f64, maximum: f64) -> Self {
        Self::Number {
            minimum: Some(minimum),
            maximum: Some(maximum),
        }
    }

    pub fn array(item: SchemaType) -> Self {
        Self::Array(Box::new(item))
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::String | Self::Enum(_) => "string",
            Self::Number { .. } => "number",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}

/// Named member of an object schema
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub name: &'static str,
    pub ty: SchemaType,
    pub required: bool,
    pub description: Option<&'static str>,
}

impl SchemaField {
    pub fn required(name: &'static str, ty: SchemaType) -> Self {
        Self {
            name,
            ty,
            required: true,
            description: None,
        }
    }

    pub fn optional(name: &'static str, ty: SchemaType) -> Self {
        Self {
            name,
            ty,
            required: false,
            description: None,
        }
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

/// Named top-level result shape
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSchema {
    pub name: &'static str,
    pub root: SchemaType,
}

impl ResultSchema {
    pub fn object(name: &'static str, fields: Vec<SchemaField>) -> Self {
        Self {
            name,
            root: SchemaType::Object(fields),
        }
    }

    /// Check a value against this schema, reporting the first violation
    pub fn validate(&self, value: &Value) -> Result<()> {
        check(&self.root, value, "$")
    }

    /// Render as a JSON Schema document
    pub fn to_json_schema(&self) -> Value {
        render(&self.root)
    }

    /// Wrap as an OpenAI strict `json_schema` response format
    pub fn response_format(&self) -> ResponseFormat {
        ResponseFormat::JsonSchema {
            json_schema: JsonSchemaFormat {
                name: self.name.to_string(),
                strict: true,
                schema: self.to_json_schema(),
            },
        }
    }
}

fn violation(path: &str, message: impl std::fmt::Display) -> LitSearchError {
    LitSearchError::Validation(format!("{}: {}", path, message))
}

fn describe_json(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn check(ty: &SchemaType, value: &Value, path: &str) -> Result<()> {
    match ty {
        SchemaType::String => {
            if !value.is_string() {
                return Err(violation(
                    path,
                    format!("expected string, got {}", describe_json(value)),
                ));
            }
        }
        SchemaType::Number { minimum, maximum } => {
            let n = value.as_f64().ok_or_else(|| {
                violation(path, format!("expected number, got {}", describe_json(value)))
            })?;
            if let Some(min) = minimum {
                if n < *min {
                    return Err(violation(path, format!("{} is below minimum {}", n, min)));
                }
            }
            if let Some(max) = maximum {
                if n > *max {
                    return Err(violation(path, format!("{} is above maximum {}", n, max)));
                }
            }
        }
        SchemaType::Enum(allowed) => {
            let s = value.as_str().ok_or_else(|| {
                violation(path, format!("expected string, got {}", describe_json(value)))
            })?;
            if !allowed.contains(&s) {
                return Err(violation(
                    path,
                    format!("'{}' is not one of [{}]", s, allowed.join(", ")),
                ));
            }
        }
        SchemaType::Array(item) => {
            let items = value.as_array().ok_or_else(|| {
                violation(path, format!("expected array, got {}", describe_json(value)))
            })?;
            for (i, element) in items.iter().enumerate() {
                check(item, element, &format!("{}[{}]", path, i))?;
            }
        }
        SchemaType::Object(fields) => {
            let object = value.as_object().ok_or_else(|| {
                violation(path, format!("expected object, got {}", describe_json(value)))
            })?;
            for field in fields {
                let field_path = format!("{}.{}", path, field.name);
                match object.get(field.name) {
                    None | Some(Value::Null) if field.required => {
                        return Err(violation(&field_path, "missing required field"));
                    }
                    None | Some(Value::Null) => {}
                    Some(v) => check(&field.ty, v, &field_path)?,
                }
            }
            if let Some(unknown) = object
                .keys()
                .find(|k| !fields.iter().any(|f| f.name == k.as_str()))
            {
                return Err(violation(path, format!("unexpected field '{}'", unknown)));
            }
        }
    }
    Ok(())
}

fn render(ty: &SchemaType) -> Value {
    match ty {
        SchemaType::String => json!({ "type": "string" }),
        SchemaType::Number { minimum, maximum } => {
            let mut out = Map::new();
            out.insert("type".into(), json!("number"));
            if let Some(min) = minimum {
                out.insert("minimum".into(), json!(min));
            }
            if let Some(max) = maximum {
                out.insert("maximum".into(), json!(max));
            }
            Value::Object(out)
        }
        SchemaType::Enum(values) => json!({ "type": "string", "enum": values }),
        SchemaType::Array(item) => json!({ "type": "array", "items": render(item) }),
        SchemaType::Object(fields) => {
            let mut properties = Map::new();
            for field in fields {
                let mut rendered = render(&field.ty);
                // Strict mode wants every property listed as required;
                // optional ones become nullable instead.
                if !field.required {
                    rendered["type"] = json!([field.ty.type_name(), "null"]);
                }
                if let Some(description) = field.description {
                    rendered["description"] = json!(description);
                }
                properties.insert(field.name.to_string(), rendered);
            }
            let required: Vec<&str> = fields.iter().map(|f| f.name).collect();
            json!({
                "type": "object",
                "properties": properties,
                "required": required,
                "additionalProperties": false,
            })
        }
    }
}

/// Pull a JSON object out of raw model text (code fences, surrounding prose)
pub fn extract_json_object(response: &str) -> Option<&str> {
    let unfenced = if response.contains("```json") {
        response
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(response)
    } else if response.contains("```") {
        response
            .split("```")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .unwrap_or(response)
    } else {
        response
    };

    let start = unfenced.find('{')?;
    let end = unfenced.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&unfenced[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVELS: &[&str] = &["low", "high"];

    fn schema() -> ResultSchema {
        ResultSchema::object(
            "sample",
            vec![
                SchemaField::required("score", SchemaType::number_in(0.0, 1.0)),
                SchemaField::required("level", SchemaType::Enum(LEVELS)),
                SchemaField::optional("notes", SchemaType::array(SchemaType::String)),
                SchemaField::required(
                    "items",
                    SchemaType::array(SchemaType::Object(vec![SchemaField::required(
                        "id",
                        SchemaType::String,
                    )])),
                ),
            ],
        )
    }

    #[test]
    fn test_valid_value() {
        let value = json!({"score": 0.5, "level": "low", "items": [{"id": "a"}]});
        assert!(schema().validate(&value).is_ok());

        let with_notes = json!({"score": 1, "level": "high", "notes": ["x"], "items": []});
        assert!(schema().validate(&with_notes).is_ok());

        let null_notes = json!({"score": 0, "level": "high", "notes": null, "items": []});
        assert!(schema().validate(&null_notes).is_ok());
    }

    #[test]
    fn test_out_of_range() {
        let value = json!({"score": 1.4, "level": "low", "items": []});
        let err = schema().validate(&value).unwrap_err();
        assert!(matches!(err, LitSearchError::Validation(_)));
        assert!(err.to_string().contains("$.score"));
        assert!(err.to_string().contains("above maximum"));

        let negative = json!({"score": -0.1, "level": "low", "items": []});
        assert!(schema().validate(&negative).is_err());
    }

    #[test]
    fn test_bad_enum_and_types() {
        let bad_enum = json!({"score": 0.5, "level": "medium", "items": []});
        assert!(schema().validate(&bad_enum).is_err());

        let bad_type = json!({"score": "0.5", "level": "low", "items": []});
        let err = schema().validate(&bad_type).unwrap_err();
        assert!(err.to_string().contains("expected number, got string"));
    }

    #[test]
    fn test_nested_path_reported() {
        let value = json!({"score": 0.5, "level": "low", "items": [{"id": "a"}, {"id": 3}]});
        let err = schema().validate(&value).unwrap_err();
        assert!(err.to_string().contains("$.items[1].id"));
    }

    #[test]
    fn test_missing_and_unexpected_fields() {
        let missing = json!({"level": "low", "items": []});
        assert!(schema()
            .validate(&missing)
            .unwrap_err()
            .to_string()
            .contains("missing required field"));

        let extra = json!({"score": 0.5, "level": "low", "items": [], "bonus": true});
        assert!(schema()
            .validate(&extra)
            .unwrap_err()
            .to_string()
            .contains("unexpected field 'bonus'"));
    }

    #[test]
    fn test_json_schema_rendering() {
        let rendered = schema().to_json_schema();
        assert_eq!(rendered["type"], "object");
        assert_eq!(rendered["additionalProperties"], false);
        assert_eq!(rendered["properties"]["score"]["maximum"], 1.0);
        assert_eq!(rendered["properties"]["level"]["enum"], json!(["low", "high"]));
        assert_eq!(rendered["properties"]["notes"]["type"], json!(["array", "null"]));
        assert_eq!(rendered["required"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_extract_json_object() {
        assert_eq!(extract_json_object("{\"a\":1}"), Some("{\"a\":1}"));
        assert_eq!(
            extract_json_object("Here you go:\n```json\n{\"a\":1}\n```\nDone"),
            Some("{\"a\":1}")
        );
        assert_eq!(
            extract_json_object("Result: {\"a\": {\"b\": 2}} end"),
            Some("{\"a\": {\"b\": 2}}")
        );
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }
}
