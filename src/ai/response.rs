use crate::dom::Point;
use crate::error::Result;
use schemars::JsonSchema;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Element reference inside an element-list answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum AiElementRef {
    /// Reference by element id (numbers are accepted and stringified)
    Id {
        #[serde(deserialize_with = "id_from_string_or_number")]
        #[schemars(with = "String")]
        id: String,
    },
    /// Reference by absolute page position
    Position { position: Point },
}

/// Structured answer: the elements found plus the problems reported
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ElementListResponse {
    pub elements: Vec<AiElementRef>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// The two answer shapes the AI may produce
#[derive(Debug, Clone, PartialEq)]
pub enum AiResponse {
    /// `[x, y]` on the 0-1000 scale
    Position(Point),
    /// `{ elements, errors }`
    ElementList(ElementListResponse),
}

impl AiResponse {
    /// Discriminate a raw answer into one of the known shapes
    ///
    /// The error carries a human-readable reason; callers attach the target
    /// description and raw payload.
    pub fn from_value(value: &Value) -> std::result::Result<Self, String> {
        match value {
            Value::Array(items) => match items.as_slice() {
                [x, y] => match (x.as_f64(), y.as_f64()) {
                    (Some(x), Some(y)) => Ok(AiResponse::Position(Point::new(x, y))),
                    _ => Err("position array must hold two numbers".to_string()),
                },
                _ => Err(format!("position array must hold exactly two numbers, got {} items", items.len())),
            },
            Value::Object(map) if map.get("elements").is_some_and(Value::is_array) => {
                serde_json::from_value(value.clone())
                    .map(AiResponse::ElementList)
                    .map_err(|e| format!("invalid element list: {}", e))
            }
            _ => Err("expected an array of two numbers or an object with an `elements` array".to_string()),
        }
    }
}

/// Answer to a data extraction request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ExtractResponse {
    /// Language of the page, `en` or `zh`
    #[serde(default)]
    pub language: String,

    /// Extracted data, shaped after the data demand
    pub data: Value,

    #[serde(default)]
    pub errors: Vec<String>,
}

/// Verdict on an assertion about the page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct AssertionResponse {
    /// Reasoning, in the language of the assertion
    #[serde(default)]
    pub thought: String,

    pub pass: bool,
}

/// JSON schema of the element-list answer, for collaborators enforcing it
pub fn element_response_schema() -> Result<Value> {
    schema_value::<ElementListResponse>()
}

/// JSON schema of the data extraction answer
pub fn extract_response_schema() -> Result<Value> {
    schema_value::<ExtractResponse>()
}

/// JSON schema of the assertion answer
pub fn assertion_response_schema() -> Result<Value> {
    schema_value::<AssertionResponse>()
}

fn schema_value<T: JsonSchema>() -> Result<Value> {
    let schema = schemars::schema_for!(T);
    Ok(serde_json::to_value(&schema)?)
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!("expected a string or number id, got {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_position_pair() {
        let response = AiResponse::from_value(&json!([500, 250.5])).unwrap();
        assert_eq!(response, AiResponse::Position(Point::new(500.0, 250.5)));
    }

    #[test]
    fn test_element_list() {
        let response = AiResponse::from_value(&json!({
            "elements": [
                { "id": "abc", "reason": "matches the label" },
                { "id": 7 },
                { "position": { "x": 10, "y": 20 } }
            ],
            "errors": ["second candidate is ambiguous"]
        }))
        .unwrap();

        let AiResponse::ElementList(list) = response else {
            panic!("Expected element list");
        };
        assert_eq!(
            list.elements,
            vec![
                AiElementRef::Id { id: "abc".to_string() },
                AiElementRef::Id { id: "7".to_string() },
                AiElementRef::Position { position: Point::new(10.0, 20.0) },
            ]
        );
        assert_eq!(list.errors, vec!["second candidate is ambiguous".to_string()]);
    }

    #[test]
    fn test_errors_default_to_empty() {
        let response = AiResponse::from_value(&json!({ "elements": [] })).unwrap();
        assert_eq!(
            response,
            AiResponse::ElementList(ElementListResponse {
                elements: vec![],
                errors: vec![]
            })
        );
    }

    #[test]
    fn test_malformed_shapes_are_rejected() {
        assert!(AiResponse::from_value(&json!([1, 2, 3])).is_err());
        assert!(AiResponse::from_value(&json!(["a", 2])).is_err());
        assert!(AiResponse::from_value(&json!({ "element": [] })).is_err());
        assert!(AiResponse::from_value(&json!({ "elements": "abc" })).is_err());
        assert!(AiResponse::from_value(&json!({ "elements": [{ "label": "x" }] })).is_err());
        assert!(AiResponse::from_value(&json!("I could not find it")).is_err());
        assert!(AiResponse::from_value(&Value::Null).is_err());
    }

    #[test]
    fn test_schema_describes_elements() {
        let schema = element_response_schema().unwrap();
        let text = schema.to_string();

        assert!(text.contains("elements"));
        assert!(text.contains("errors"));
        assert!(text.contains("position"));
    }

    #[test]
    fn test_extract_response_requires_data() {
        let response: ExtractResponse =
            serde_json::from_value(json!({ "language": "en", "data": { "title": "Inbox" }, "errors": [] })).unwrap();
        assert_eq!(response.data["title"], "Inbox");

        assert!(serde_json::from_value::<ExtractResponse>(json!({ "language": "en" })).is_err());
    }

    #[test]
    fn test_assertion_response_requires_pass() {
        let response: AssertionResponse = serde_json::from_value(json!({ "pass": false })).unwrap();
        assert!(!response.pass);
        assert!(response.thought.is_empty());

        assert!(serde_json::from_value::<AssertionResponse>(json!({ "thought": "looks fine" })).is_err());
    }

    #[test]
    fn test_assertion_schema_lists_fields() {
        let text = assertion_response_schema().unwrap().to_string();
        assert!(text.contains("thought"));
        assert!(text.contains("pass"));
        assert!(extract_response_schema().unwrap().to_string().contains("language"));
    }
}
