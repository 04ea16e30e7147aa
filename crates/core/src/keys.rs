//! Key derivation for the single-table design.
//!
//! Pure functions computing partition and sort keys from a record's attribute
//! map. All functions are sync and have no side effects.
//!
//! The partition key is always prefixed with the record type's name and a `#`
//! separator, so multiple record types coexist in one table without
//! colliding. The sort key joins its contributor values with `#` in declared
//! field order.

use crate::attribute::{Attribute, AttributeMap};
use crate::error::{Result, StoreError};
use crate::model::Model;

/// Separator between the type name, key values and sort key parts.
pub const KEY_SEPARATOR: &str = "#";

/// Compute the partition key for a record: `<TYPE_NAME>#<value>`.
///
/// Fails with [`StoreError::MissingKeyField`] when the partition field is
/// absent from the attribute map (null fields are omitted on serialize, so an
/// unset `Option` counts as absent).
pub fn partition_key<M: Model>(attrs: &AttributeMap) -> Result<String> {
    let value = key_part::<M>(attrs, M::PARTITION_KEY)?;
    Ok(format!("{}{KEY_SEPARATOR}{value}", M::TYPE_NAME))
}

/// Compute the composite sort key for a record.
///
/// Fails with [`StoreError::MissingKeyField`] when the type declares no
/// sort-key contributors (every record must be key-bearing) or when a
/// declared contributor has no current value.
pub fn sort_key<M: Model>(attrs: &AttributeMap) -> Result<String> {
    let [first, rest @ ..] = M::SORT_KEY else {
        return Err(StoreError::MissingKeyField {
            type_name: M::TYPE_NAME,
            field: "<sort key>",
        });
    };

    let mut key = key_part::<M>(attrs, *first)?;
    for field in rest {
        key.push_str(KEY_SEPARATOR);
        key.push_str(&key_part::<M>(attrs, *field)?);
    }
    Ok(key)
}

/// Render one contributor field as a key part.
///
/// Strings and numbers contribute their literal text, booleans `true`/`false`.
/// Enum-valued fields already carry their underlying serialized value by the
/// time they reach the attribute map.
fn key_part<M: Model>(attrs: &AttributeMap, field: &'static str) -> Result<String> {
    match attrs.get(field) {
        Some(Attribute::S(s)) => Ok(s.clone()),
        Some(Attribute::N(n)) => Ok(n.clone()),
        Some(Attribute::Bool(b)) => Ok(b.to_string()),
        Some(attr) => Err(StoreError::InvalidData(format!(
            "Field `{field}` of {} is not a scalar key part: {attr:?}",
            M::TYPE_NAME
        ))),
        None => Err(StoreError::MissingKeyField {
            type_name: M::TYPE_NAME,
            field,
        }),
    }
}
