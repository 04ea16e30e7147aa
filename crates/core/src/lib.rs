//! Store-agnostic model layer for the dynatable ODM.
//!
//! Everything in this crate is synchronous and side-effect free: the attribute
//! codec, key derivation, the table registry and the sort-key operator
//! vocabulary. The DynamoDB binding lives in the `dynatable` crate.

pub mod attribute;
pub mod error;
pub mod keys;
pub mod model;
pub mod operator;
pub mod registry;

pub use attribute::{from_attributes, to_attributes, Attribute, AttributeMap};
pub use error::{Result, StoreError};
pub use keys::{partition_key, sort_key};
pub use model::{Model, RecordKey};
pub use operator::Operator;
pub use registry::TableRegistry;
