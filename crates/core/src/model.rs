//! The model trait and derived record keys.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::attribute::to_attributes;
use crate::error::Result;
use crate::keys;

/// A typed record stored in the shared single table.
///
/// The key schema is declarative and resolved at compile time: one field
/// contributes the partition key and zero or more fields, in declared order,
/// contribute the composite sort key. Field names must match the record's
/// serde field names.
///
/// ```
/// use dynatable_core::Model;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct Task {
///     user: String,
///     title: String,
///     completed: bool,
/// }
///
/// impl Model for Task {
///     const TYPE_NAME: &'static str = "Task";
///     const PARTITION_KEY: &'static str = "user";
///     const SORT_KEY: &'static [&'static str] = &["completed"];
/// }
/// ```
pub trait Model: Serialize + DeserializeOwned + Send + Sync {
    /// Name of the record type. Prefixes every partition key and contributes
    /// to the shared table name.
    const TYPE_NAME: &'static str;

    /// Field whose value forms the partition key.
    const PARTITION_KEY: &'static str;

    /// Fields whose values, in declared order, form the composite sort key.
    const SORT_KEY: &'static [&'static str];
}

/// The composite key of a record, computed once from its field values.
///
/// A `RecordKey` is a snapshot: mutating a key-contributing field after
/// derivation does not update a previously derived key. Derive again if the
/// record changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKey {
    /// Partition key, `<TYPE_NAME>#<value>`.
    pub pk: String,
    /// Sort key, `#`-joined contributor values in declared order.
    pub sk: String,
}

impl RecordKey {
    /// Compute both keys from a single serialization pass over the record.
    pub fn derive<M: Model>(record: &M) -> Result<RecordKey> {
        let attrs = to_attributes(record)?;
        Ok(RecordKey {
            pk: keys::partition_key::<M>(&attrs)?,
            sk: keys::sort_key::<M>(&attrs)?,
        })
    }
}
