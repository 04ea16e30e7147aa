//! Wire-neutral tagged attribute values and the record codec.
//!
//! Pure functions for converting between typed records (anything
//! `serde::Serialize`) and the store's tagged-attribute representation. These
//! are testable in isolation without any store access.
//!
//! Numbers are carried as their literal decimal text, matching the store's
//! number encoding, so arbitrary-precision decimals round-trip without loss.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, StoreError};

/// A tagged scalar or composite value as stored on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// String.
    S(String),
    /// Number, kept as its literal decimal text.
    N(String),
    /// Binary.
    B(Vec<u8>),
    /// Boolean.
    Bool(bool),
    /// Explicit null (only produced inside lists and maps; top-level null
    /// fields are omitted on serialize).
    Null,
    /// List of attributes.
    L(Vec<Attribute>),
    /// Nested map of attributes.
    M(HashMap<String, Attribute>),
}

/// The wire-level representation of a record: field name to tagged value.
pub type AttributeMap = HashMap<String, Attribute>;

impl Attribute {
    /// Convert a JSON value into its tagged attribute form.
    pub fn from_json(value: Value) -> Attribute {
        match value {
            Value::Null => Attribute::Null,
            Value::Bool(b) => Attribute::Bool(b),
            Value::Number(n) => Attribute::N(n.to_string()),
            Value::String(s) => Attribute::S(s),
            Value::Array(items) => {
                Attribute::L(items.into_iter().map(Attribute::from_json).collect())
            }
            Value::Object(map) => Attribute::M(
                map.into_iter()
                    .map(|(k, v)| (k, Attribute::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert a tagged attribute back into a JSON value.
    ///
    /// Binary becomes a base64 string; model fields holding binary data are
    /// expected to deserialize from that representation.
    pub fn into_json(self) -> Result<Value> {
        match self {
            Attribute::S(s) => Ok(Value::String(s)),
            Attribute::N(n) => n
                .parse::<serde_json::Number>()
                .map(Value::Number)
                .map_err(|e| StoreError::InvalidData(format!("Invalid number `{n}`: {e}"))),
            Attribute::B(bytes) => Ok(Value::String(BASE64.encode(bytes))),
            Attribute::Bool(b) => Ok(Value::Bool(b)),
            Attribute::Null => Ok(Value::Null),
            Attribute::L(items) => Ok(Value::Array(
                items
                    .into_iter()
                    .map(Attribute::into_json)
                    .collect::<Result<_>>()?,
            )),
            Attribute::M(map) => {
                let mut object = serde_json::Map::with_capacity(map.len());
                for (key, value) in map {
                    object.insert(key, value.into_json()?);
                }
                Ok(Value::Object(object))
            }
        }
    }
}

/// Serialize a record into its attribute map.
///
/// The record must serialize to a map at the top level. Null fields are
/// omitted (sparse representation); nulls nested inside lists and maps are
/// kept as explicit [`Attribute::Null`].
pub fn to_attributes<T: Serialize>(record: &T) -> Result<AttributeMap> {
    let value =
        serde_json::to_value(record).map_err(|e| StoreError::Serialization(e.to_string()))?;

    let Value::Object(fields) = value else {
        return Err(StoreError::Serialization(
            "record must serialize to a map of fields".to_string(),
        ));
    };

    Ok(fields
        .into_iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k, Attribute::from_json(v)))
        .collect())
}

/// Deserialize a record from its attribute map.
///
/// Fields absent from the map deserialize as their serde defaults, mirroring
/// the sparse representation produced by [`to_attributes`].
pub fn from_attributes<T: DeserializeOwned>(attrs: AttributeMap) -> Result<T> {
    let mut object = serde_json::Map::with_capacity(attrs.len());
    for (key, value) in attrs {
        object.insert(key, value.into_json()?);
    }
    serde_json::from_value(Value::Object(object))
        .map_err(|e| StoreError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use serde::Deserialize;
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum Priority {
        #[serde(rename = "low")]
        Low,
        #[serde(rename = "high")]
        High,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Task {
        id: Uuid,
        user: String,
        title: String,
        completed: bool,
        priority: Priority,
        estimate_hours: f64,
        description: Option<String>,
        tags: Vec<String>,
        created_at: DateTime<Utc>,
    }

    fn sample_task() -> Task {
        Task {
            id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap(),
            user: "U1".to_string(),
            title: "Write report".to_string(),
            completed: false,
            priority: Priority::High,
            estimate_hours: 2.5,
            description: None,
            tags: vec!["work".to_string(), "q3".to_string()],
            created_at: DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_round_trip() {
        let task = sample_task();
        let attrs = to_attributes(&task).unwrap();
        let parsed: Task = from_attributes(attrs).unwrap();
        assert_eq!(task, parsed);
    }

    #[test]
    fn test_null_fields_are_omitted() {
        let task = sample_task();
        let attrs = to_attributes(&task).unwrap();
        assert!(!attrs.contains_key("description"));
    }

    #[test]
    fn test_present_optional_field_is_kept() {
        let mut task = sample_task();
        task.description = Some("quarterly numbers".to_string());
        let attrs = to_attributes(&task).unwrap();
        assert_eq!(
            attrs.get("description"),
            Some(&Attribute::S("quarterly numbers".to_string()))
        );
    }

    #[test]
    fn test_enum_serializes_to_underlying_value() {
        let attrs = to_attributes(&sample_task()).unwrap();
        assert_eq!(attrs.get("priority"), Some(&Attribute::S("high".to_string())));
    }

    #[test]
    fn test_decimal_precision_survives_round_trip() {
        // More digits than an f64 can hold; must come back verbatim.
        let literal = "3.1415926535897932384626433832795028841971";
        let number: serde_json::Number = literal.parse().unwrap();
        let attr = Attribute::from_json(Value::Number(number));
        assert_eq!(attr, Attribute::N(literal.to_string()));
        assert_eq!(
            attr.into_json().unwrap(),
            Value::Number(literal.parse().unwrap())
        );
    }

    #[test]
    fn test_binary_bridges_as_base64() {
        let attr = Attribute::B(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(attr.into_json().unwrap(), Value::String("3q2+7w==".to_string()));
    }

    #[test]
    fn test_nested_null_is_preserved() {
        let value = serde_json::json!({ "items": [1, null, "x"] });
        let attr = Attribute::from_json(value);
        assert_eq!(
            attr,
            Attribute::M(HashMap::from([(
                "items".to_string(),
                Attribute::L(vec![
                    Attribute::N("1".to_string()),
                    Attribute::Null,
                    Attribute::S("x".to_string()),
                ]),
            )]))
        );
    }

    #[test]
    fn test_non_map_record_is_rejected() {
        let result = to_attributes(&42u32);
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[test]
    fn test_invalid_number_text_is_rejected() {
        let result = Attribute::N("not-a-number".to_string()).into_json();
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }
}
