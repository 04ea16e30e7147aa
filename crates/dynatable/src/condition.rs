//! Key-condition construction for queries.
//!
//! Pure translation from a partition key, optional sort-key value and
//! operator into a DynamoDB key-condition expression plus its expression
//! attribute values.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use dynatable_core::{Operator, Result, StoreError};

/// A key-condition expression and its bound values.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyCondition {
    pub expression: String,
    pub values: HashMap<String, AttributeValue>,
}

impl KeyCondition {
    /// Build the condition for a query.
    ///
    /// Without a sort-key value the condition matches the partition only.
    /// `between` splits its value on the first `-` into lower and upper
    /// bounds and fails with [`StoreError::MalformedRange`] when no separator
    /// is present. `contains` has no key-condition translation and is
    /// rejected with [`StoreError::InvalidOperator`].
    pub fn build(
        partition_key: &str,
        sort_key: Option<&str>,
        operator: Option<Operator>,
    ) -> Result<KeyCondition> {
        let mut values = HashMap::from([(
            ":pk".to_string(),
            AttributeValue::S(partition_key.to_string()),
        )]);

        let Some(sk) = sort_key else {
            return Ok(KeyCondition {
                expression: "pk = :pk".to_string(),
                values,
            });
        };

        // Defaults to equality when a sort-key value is given without an
        // explicit operator.
        let operator = operator.unwrap_or(Operator::Eq);

        let expression = match operator {
            op if op.is_comparison() => {
                values.insert(":sk".to_string(), AttributeValue::S(sk.to_string()));
                format!("pk = :pk AND sk {op} :sk")
            }
            Operator::BeginsWith => {
                values.insert(":sk".to_string(), AttributeValue::S(sk.to_string()));
                "pk = :pk AND begins_with(sk, :sk)".to_string()
            }
            Operator::Between => {
                let Some((lower, upper)) = sk.split_once('-') else {
                    return Err(StoreError::MalformedRange(sk.to_string()));
                };
                values.insert(":lo".to_string(), AttributeValue::S(lower.to_string()));
                values.insert(":hi".to_string(), AttributeValue::S(upper.to_string()));
                "pk = :pk AND sk BETWEEN :lo AND :hi".to_string()
            }
            Operator::Contains => {
                // Declared on the wire type but never translated into a key
                // condition; failing beats returning an unfiltered partition.
                return Err(StoreError::InvalidOperator(operator.to_string()));
            }
            _ => unreachable!("comparison handled by guard"),
        };

        Ok(KeyCondition { expression, values })
    }
}
