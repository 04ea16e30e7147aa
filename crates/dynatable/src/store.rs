//! The query/scan engine: point reads, writes, deletes, queries and scans
//! over the shared single table, generic over any [`Model`].

use aws_sdk_dynamodb::types::AttributeValue;
use dynatable_core::keys::KEY_SEPARATOR;
use dynatable_core::{
    from_attributes, to_attributes, Model, Operator, RecordKey, Result, StoreError, TableRegistry,
};

use crate::codec::{attributes_to_item, item_to_attributes};
use crate::condition::KeyCondition;
use crate::config::Config;
use crate::connection::Connection;
use crate::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error, map_scan_error,
};
use crate::lifecycle::{self, CreateTableOutcome, DropTableOutcome};

/// Modifiers for a partition query.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    /// Sort-key value the operator applies to.
    pub sort_key: Option<String>,
    /// Sort-key operator; defaults to equality when a value is given.
    pub operator: Option<Operator>,
    /// Maximum number of records to return.
    pub limit: Option<i32>,
    /// Records to skip before returning. Applied client-side; see
    /// [`Store::SUPPORTS_NATIVE_OFFSET`].
    pub offset: Option<usize>,
}

/// Modifiers for a full-table scan.
#[derive(Debug, Clone, Default)]
pub struct ScanParams {
    /// Maximum number of records to return.
    pub limit: Option<i32>,
    /// Records to skip before returning. Applied client-side; see
    /// [`Store::SUPPORTS_NATIVE_OFFSET`].
    pub offset: Option<usize>,
}

/// Store over the shared single table.
///
/// Holds a lazily-established client and resolves the table name per
/// operation, either from configuration or from the table registry.
#[derive(Debug)]
pub struct Store {
    config: Config,
    connection: Connection,
    registry: &'static TableRegistry,
}

impl Store {
    /// Whether the backend supports a server-side offset. DynamoDB does not:
    /// `offset` is applied client-side after fetching, as a best-effort skip,
    /// with the fetch limit widened by the offset so `limit` still bounds the
    /// returned rows.
    pub const SUPPORTS_NATIVE_OFFSET: bool = false;

    /// Create a store with the given configuration and the global registry.
    pub fn new(config: Config) -> Store {
        Store::with_registry(config, TableRegistry::global())
    }

    /// Create a store from environment configuration.
    pub fn from_env() -> Store {
        Store::new(Config::from_env())
    }

    /// Create a store bound to an explicit registry.
    pub fn with_registry(config: Config, registry: &'static TableRegistry) -> Store {
        let connection = Connection::new(&config);
        Store {
            config,
            connection,
            registry,
        }
    }

    /// Resolve the table name for this operation.
    ///
    /// An explicit configured name wins; otherwise the registry-derived name
    /// is recomputed, and an empty registry is an error.
    pub fn table_name(&self) -> Result<String> {
        if let Some(name) = &self.config.table_name {
            return Ok(name.clone());
        }
        let name = self.registry.table_name();
        if name.is_empty() {
            return Err(StoreError::NoRegisteredTypes);
        }
        Ok(name)
    }

    /// Point-read a record by its key. A miss is `Ok(None)`.
    ///
    /// `pk` is the raw partition field value; the type-name prefix is applied
    /// here.
    pub async fn get<M: Model>(&self, pk: &str, sk: &str) -> Result<Option<M>> {
        let table = self.table_name()?;
        let result = self
            .connection
            .client()
            .await
            .get_item()
            .table_name(&table)
            .key("pk", AttributeValue::S(prefixed::<M>(pk)))
            .key("sk", AttributeValue::S(sk.to_string()))
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => {
                let mut attrs = item_to_attributes(item)?;
                attrs.remove("pk");
                attrs.remove("sk");
                Ok(Some(from_attributes(attrs)?))
            }
            None => Ok(None),
        }
    }

    /// Write a record, overwriting unconditionally.
    ///
    /// Keys are derived from the record's current field values at call time.
    pub async fn put<M: Model>(&self, record: &M) -> Result<()> {
        let table = self.table_name()?;
        let key = RecordKey::derive(record)?;
        let mut item = attributes_to_item(to_attributes(record)?);
        item.insert("pk".to_string(), AttributeValue::S(key.pk.clone()));
        item.insert("sk".to_string(), AttributeValue::S(key.sk.clone()));

        tracing::debug!(table = %table, pk = %key.pk, sk = %key.sk, "put item");

        self.connection
            .client()
            .await
            .put_item()
            .table_name(&table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(())
    }

    /// Delete a record by its key. Idempotent: deleting an absent key
    /// succeeds.
    pub async fn delete<M: Model>(&self, pk: &str, sk: &str) -> Result<()> {
        let table = self.table_name()?;
        self.connection
            .client()
            .await
            .delete_item()
            .table_name(&table)
            .key("pk", AttributeValue::S(prefixed::<M>(pk)))
            .key("sk", AttributeValue::S(sk.to_string()))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(())
    }

    /// Query one partition, optionally constraining the sort key.
    ///
    /// Records come back in store-native sort-key order.
    pub async fn query<M: Model>(&self, pk: &str, params: QueryParams) -> Result<Vec<M>> {
        let table = self.table_name()?;
        let condition =
            KeyCondition::build(&prefixed::<M>(pk), params.sort_key.as_deref(), params.operator)?;

        tracing::debug!(table = %table, expression = %condition.expression, "query");

        let mut request = self
            .connection
            .client()
            .await
            .query()
            .table_name(&table)
            .key_condition_expression(&condition.expression);
        for (name, value) in condition.values {
            request = request.expression_attribute_values(name, value);
        }
        if let Some(limit) = fetch_limit(params.limit, params.offset) {
            request = request.limit(limit);
        }

        let result = request.send().await.map_err(map_query_error)?;
        let items = apply_window(
            result.items.unwrap_or_default(),
            params.limit,
            params.offset,
        );
        items
            .into_iter()
            .map(|item| {
                let mut attrs = item_to_attributes(item)?;
                attrs.remove("pk");
                attrs.remove("sk");
                from_attributes(attrs)
            })
            .collect()
    }

    /// Scan the whole table.
    pub async fn scan<M: Model>(&self, params: ScanParams) -> Result<Vec<M>> {
        let table = self.table_name()?;

        tracing::debug!(table = %table, "scan");

        let mut request = self.connection.client().await.scan().table_name(&table);
        if let Some(limit) = fetch_limit(params.limit, params.offset) {
            request = request.limit(limit);
        }

        let result = request.send().await.map_err(map_scan_error)?;
        let items = apply_window(
            result.items.unwrap_or_default(),
            params.limit,
            params.offset,
        );
        items
            .into_iter()
            .map(|item| {
                let mut attrs = item_to_attributes(item)?;
                attrs.remove("pk");
                attrs.remove("sk");
                from_attributes(attrs)
            })
            .collect()
    }

    /// Create the shared table and wait until it is active.
    pub async fn create_table(&self) -> Result<CreateTableOutcome> {
        let table = self.table_name()?;
        let client = self.connection.client().await;
        lifecycle::create_table(client, &table, &self.config).await
    }

    /// Drop the shared table and wait until it is gone.
    pub async fn drop_table(&self) -> Result<DropTableOutcome> {
        let table = self.table_name()?;
        let client = self.connection.client().await;
        lifecycle::drop_table(client, &table, &self.config).await
    }
}

/// Prefix a raw partition field value with the record type's name.
fn prefixed<M: Model>(pk: &str) -> String {
    format!("{}{KEY_SEPARATOR}{pk}", M::TYPE_NAME)
}

/// Widen the fetch limit so the client-side offset skip does not eat into the
/// requested row count.
fn fetch_limit(limit: Option<i32>, offset: Option<usize>) -> Option<i32> {
    match (limit, offset) {
        (Some(limit), Some(offset)) => Some(limit.saturating_add(offset as i32)),
        (Some(limit), None) => Some(limit),
        // Without a limit the whole page is fetched and skipped client-side.
        (None, _) => None,
    }
}

/// Apply the best-effort offset/limit window to fetched items.
fn apply_window<T>(items: Vec<T>, limit: Option<i32>, offset: Option<usize>) -> Vec<T> {
    let skip = offset.unwrap_or(0);
    let take = limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
    items.into_iter().skip(skip).take(take).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Task {
        user: String,
        completed: bool,
    }

    impl Model for Task {
        const TYPE_NAME: &'static str = "Task";
        const PARTITION_KEY: &'static str = "user";
        const SORT_KEY: &'static [&'static str] = &["completed"];
    }

    fn config() -> Config {
        Config {
            table_name: None,
            endpoint_url: None,
            ttl_attribute: "ttl".to_string(),
            wait_poll_seconds: 2,
            wait_max_attempts: 60,
        }
    }

    #[test]
    fn test_prefixed_partition_key() {
        assert_eq!(prefixed::<Task>("U1"), "Task#U1");
    }

    #[test]
    fn test_table_name_requires_registration() {
        let empty: &'static TableRegistry = Box::leak(Box::new(TableRegistry::new()));
        let store = Store::with_registry(config(), empty);
        assert_eq!(store.table_name(), Err(StoreError::NoRegisteredTypes));
    }

    #[test]
    fn test_table_name_follows_registry() {
        let registry: &'static TableRegistry = Box::leak(Box::new(TableRegistry::new()));
        registry.register::<Task>();
        let store = Store::with_registry(config(), registry);
        assert_eq!(store.table_name().unwrap(), "Task");
    }

    #[test]
    fn test_explicit_table_name_overrides_registry() {
        let mut config = config();
        config.table_name = Some("provisioned".to_string());
        let store = Store::new(config);
        assert_eq!(store.table_name().unwrap(), "provisioned");
    }

    #[test]
    fn test_fetch_limit_widens_by_offset() {
        assert_eq!(fetch_limit(Some(10), Some(5)), Some(15));
        assert_eq!(fetch_limit(Some(10), None), Some(10));
        assert_eq!(fetch_limit(None, Some(5)), None);
        assert_eq!(fetch_limit(None, None), None);
    }

    #[test]
    fn test_apply_window() {
        let items: Vec<i32> = (0..10).collect();
        assert_eq!(apply_window(items.clone(), Some(3), Some(2)), vec![2, 3, 4]);
        assert_eq!(apply_window(items.clone(), Some(3), None), vec![0, 1, 2]);
        assert_eq!(
            apply_window(items.clone(), None, Some(7)),
            vec![7, 8, 9]
        );
        assert_eq!(apply_window(items.clone(), None, None), items);
    }

    #[test]
    fn test_no_native_offset_capability() {
        assert!(!Store::SUPPORTS_NATIVE_OFFSET);
    }
}
