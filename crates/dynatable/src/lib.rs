//! Single-table DynamoDB object-document mapper.
//!
//! Typed records share one physical table keyed by two string attributes,
//! `pk` and `sk`. Each record type declares which fields contribute its keys;
//! the partition key is prefixed with the type name so types coexist without
//! colliding, and the table name is derived from the set of registered types.
//!
//! # Usage
//!
//! ```no_run
//! use dynatable::{Store, QueryParams};
//! use dynatable_core::{Model, Operator, TableRegistry};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Task {
//!     user: String,
//!     title: String,
//!     completed: bool,
//! }
//!
//! impl Model for Task {
//!     const TYPE_NAME: &'static str = "Task";
//!     const PARTITION_KEY: &'static str = "user";
//!     const SORT_KEY: &'static [&'static str] = &["completed"];
//! }
//!
//! # async fn example() -> dynatable_core::Result<()> {
//! // Register every type before the first table-name-dependent operation.
//! TableRegistry::global().register::<Task>();
//!
//! let store = Store::from_env();
//! store.create_table().await?;
//!
//! let task = Task {
//!     user: "U1".to_string(),
//!     title: "Write report".to_string(),
//!     completed: false,
//! };
//! store.put(&task).await?;
//!
//! let found: Option<Task> = store.get("U1", "false").await?;
//! let open: Vec<Task> = store
//!     .query(
//!         "U1",
//!         QueryParams {
//!             sort_key: Some("false".to_string()),
//!             operator: Some(Operator::Eq),
//!             ..Default::default()
//!         },
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod codec;
mod condition;
mod config;
mod connection;
mod error;
mod lifecycle;
mod store;

pub use codec::{attribute_to_value, value_to_attribute};
pub use condition::KeyCondition;
pub use config::Config;
pub use connection::Connection;
pub use lifecycle::{CreateTableOutcome, DropTableOutcome};
pub use store::{QueryParams, ScanParams, Store};
