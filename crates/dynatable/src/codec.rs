//! Conversions between the wire-neutral attribute representation and the
//! DynamoDB `AttributeValue` type.
//!
//! Pure functions, testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use dynatable_core::{Attribute, AttributeMap, Result, StoreError};

/// Convert a tagged attribute into a DynamoDB `AttributeValue`.
pub fn attribute_to_value(attr: Attribute) -> AttributeValue {
    match attr {
        Attribute::S(s) => AttributeValue::S(s),
        Attribute::N(n) => AttributeValue::N(n),
        Attribute::B(bytes) => AttributeValue::B(Blob::new(bytes)),
        Attribute::Bool(b) => AttributeValue::Bool(b),
        Attribute::Null => AttributeValue::Null(true),
        Attribute::L(items) => {
            AttributeValue::L(items.into_iter().map(attribute_to_value).collect())
        }
        Attribute::M(map) => AttributeValue::M(
            map.into_iter()
                .map(|(k, v)| (k, attribute_to_value(v)))
                .collect(),
        ),
    }
}

/// Convert a DynamoDB `AttributeValue` into a tagged attribute.
///
/// Set types (`SS`/`NS`/`BS`) are read back as lists; this codec never writes
/// sets, but items written by other producers may carry them.
pub fn value_to_attribute(value: AttributeValue) -> Result<Attribute> {
    match value {
        AttributeValue::S(s) => Ok(Attribute::S(s)),
        AttributeValue::N(n) => Ok(Attribute::N(n)),
        AttributeValue::B(blob) => Ok(Attribute::B(blob.into_inner())),
        AttributeValue::Bool(b) => Ok(Attribute::Bool(b)),
        AttributeValue::Null(_) => Ok(Attribute::Null),
        AttributeValue::L(items) => Ok(Attribute::L(
            items
                .into_iter()
                .map(value_to_attribute)
                .collect::<Result<_>>()?,
        )),
        AttributeValue::M(map) => Ok(Attribute::M(
            map.into_iter()
                .map(|(k, v)| Ok((k, value_to_attribute(v)?)))
                .collect::<Result<_>>()?,
        )),
        AttributeValue::Ss(items) => Ok(Attribute::L(items.into_iter().map(Attribute::S).collect())),
        AttributeValue::Ns(items) => Ok(Attribute::L(items.into_iter().map(Attribute::N).collect())),
        AttributeValue::Bs(items) => Ok(Attribute::L(
            items
                .into_iter()
                .map(|blob| Attribute::B(blob.into_inner()))
                .collect(),
        )),
        other => Err(StoreError::InvalidData(format!(
            "Unsupported attribute value: {other:?}"
        ))),
    }
}

/// Convert an attribute map into a DynamoDB item.
pub fn attributes_to_item(attrs: AttributeMap) -> HashMap<String, AttributeValue> {
    attrs
        .into_iter()
        .map(|(k, v)| (k, attribute_to_value(v)))
        .collect()
}

/// Convert a DynamoDB item into an attribute map.
pub fn item_to_attributes(item: HashMap<String, AttributeValue>) -> Result<AttributeMap> {
    item.into_iter()
        .map(|(k, v)| Ok((k, value_to_attribute(v)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_round_trips() {
        for attr in [
            Attribute::S("hello".to_string()),
            Attribute::N("12.3400000000000000000001".to_string()),
            Attribute::B(vec![1, 2, 3]),
            Attribute::Bool(true),
            Attribute::Null,
        ] {
            let value = attribute_to_value(attr.clone());
            assert_eq!(value_to_attribute(value).unwrap(), attr);
        }
    }

    #[test]
    fn test_composite_round_trip() {
        let attr = Attribute::M(HashMap::from([
            (
                "tags".to_string(),
                Attribute::L(vec![
                    Attribute::S("a".to_string()),
                    Attribute::Null,
                    Attribute::N("7".to_string()),
                ]),
            ),
            ("done".to_string(), Attribute::Bool(false)),
        ]));
        let value = attribute_to_value(attr.clone());
        assert_eq!(value_to_attribute(value).unwrap(), attr);
    }

    #[test]
    fn test_string_set_reads_back_as_list() {
        let value = AttributeValue::Ss(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            value_to_attribute(value).unwrap(),
            Attribute::L(vec![
                Attribute::S("a".to_string()),
                Attribute::S("b".to_string()),
            ])
        );
    }

    #[test]
    fn test_item_round_trip() {
        let attrs = AttributeMap::from([
            ("pk".to_string(), Attribute::S("Task#U1".to_string())),
            ("count".to_string(), Attribute::N("3".to_string())),
        ]);
        let item = attributes_to_item(attrs.clone());
        assert_eq!(item_to_attributes(item).unwrap(), attrs);
    }
}
