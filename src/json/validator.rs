//! Strict input validation
//!
//! Unlike the storage read path, validation rejects anything it cannot
//! decode. Use it where input enters the application, not on stored rows.

use super::codec::Codec;
use super::error::{JsonError, JsonResult};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// Untyped input to be turned into a document
#[derive(Debug, Clone, PartialEq)]
pub enum UntypedInput {
    Value(JsonValue),
    Text(String),
    Bytes(Vec<u8>),
}

impl From<JsonValue> for UntypedInput {
    fn from(value: JsonValue) -> Self {
        UntypedInput::Value(value)
    }
}

impl From<&str> for UntypedInput {
    fn from(text: &str) -> Self {
        UntypedInput::Text(text.to_string())
    }
}

impl From<String> for UntypedInput {
    fn from(text: String) -> Self {
        UntypedInput::Text(text)
    }
}

impl From<&[u8]> for UntypedInput {
    fn from(bytes: &[u8]) -> Self {
        UntypedInput::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for UntypedInput {
    fn from(bytes: Vec<u8>) -> Self {
        UntypedInput::Bytes(bytes)
    }
}

/// Accept an object as is, or decode JSON text/bytes.
///
/// Decoded text is returned whatever its shape; an already structured value
/// must be an object.
pub fn validate_document(input: impl Into<UntypedInput>) -> JsonResult<JsonValue> {
    match input.into() {
        UntypedInput::Value(value @ JsonValue::Object(_)) => Ok(value),
        UntypedInput::Value(other) => Err(JsonError::UnexpectedInput(format!(
            "expected object or JSON string, got {}",
            json_type_name(&other)
        ))),
        UntypedInput::Text(text) => Codec::default_codec().decode(&text),
        UntypedInput::Bytes(bytes) => {
            let text = std::str::from_utf8(&bytes)
                .map_err(|e| JsonError::InvalidJson(format!("input is not UTF-8: {}", e)))?;
            Codec::default_codec().decode(text)
        }
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Document accepted either as an object or as a string holding JSON
///
/// ```
/// use sqlite_jsonfield::json::StrictDocument;
///
/// #[derive(serde::Deserialize)]
/// struct Request {
///     payload: StrictDocument,
/// }
///
/// let a: Request = serde_json::from_str(r#"{"payload": {"x": 1}}"#).unwrap();
/// let b: Request = serde_json::from_str(r#"{"payload": "{\"x\": 1}"}"#).unwrap();
/// assert_eq!(a.payload, b.payload);
/// assert!(serde_json::from_str::<Request>(r#"{"payload": 5}"#).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StrictDocument(pub JsonValue);

impl<'de> Deserialize<'de> for StrictDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let input = match JsonValue::deserialize(deserializer)? {
            JsonValue::String(text) => UntypedInput::Text(text),
            other => UntypedInput::Value(other),
        };
        validate_document(input)
            .map(StrictDocument)
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_passes_through() {
        let doc = validate_document(json!({"a": 1})).unwrap();
        assert_eq!(doc, json!({"a": 1}));
    }

    #[test]
    fn test_text_and_bytes_are_decoded() {
        assert_eq!(validate_document(r#"{"a": 1}"#).unwrap(), json!({"a": 1}));
        assert_eq!(validate_document(&b"[1, 2]"[..]).unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_malformed_text_fails() {
        assert!(matches!(
            validate_document("{not json"),
            Err(JsonError::InvalidJson(_))
        ));
        assert!(matches!(
            validate_document(&b"\xff\xfe"[..]),
            Err(JsonError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_non_object_value_rejected() {
        let err = validate_document(json!([1])).unwrap_err();
        assert!(matches!(err, JsonError::UnexpectedInput(_)));
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_strict_document_deserialize() {
        let doc: StrictDocument = serde_json::from_str(r#""{\"k\": true}""#).unwrap();
        assert_eq!(doc.0, json!({"k": true}));

        assert!(serde_json::from_str::<StrictDocument>(r#""oops""#).is_err());
        assert!(serde_json::from_str::<StrictDocument>("42").is_err());
    }

    #[test]
    fn test_strict_document_serializes_transparently() {
        let doc = StrictDocument(json!({"k": 1}));
        assert_eq!(serde_json::to_string(&doc).unwrap(), r#"{"k":1}"#);
    }
}
