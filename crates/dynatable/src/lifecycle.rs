//! Table lifecycle: creation, readiness, time-to-live, streams and teardown.
//!
//! Outcomes are typed: "already exists" and "not found" are distinguished
//! from real provisioning failures instead of being collapsed into a boolean.
//! Readiness waits are bounded polls so a stuck table state cannot hang the
//! caller forever.

use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::delete_table::DeleteTableError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
    StreamSpecification, StreamViewType, TableStatus, TimeToLiveSpecification,
};
use aws_sdk_dynamodb::Client;
use dynatable_core::{Result, StoreError};
use tokio::time::sleep;

use crate::config::Config;

/// Outcome of a table-creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateTableOutcome {
    /// The table was created and is active.
    Created,
    /// The table already existed; nothing was changed.
    AlreadyExists,
}

/// Outcome of a table-drop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTableOutcome {
    /// The table was deleted and is gone.
    Dropped,
    /// No such table existed.
    NotFound,
}

/// Create the shared table: `(pk: S, sk: S)` key schema, on-demand billing,
/// change stream with old and new images, TTL on the configured attribute.
/// Waits until the table reports active.
pub(crate) async fn create_table(
    client: &Client,
    table: &str,
    config: &Config,
) -> Result<CreateTableOutcome> {
    let request = client
        .create_table()
        .table_name(table)
        .attribute_definitions(string_attribute("pk")?)
        .attribute_definitions(string_attribute("sk")?)
        .key_schema(key_element("pk", KeyType::Hash)?)
        .key_schema(key_element("sk", KeyType::Range)?)
        .billing_mode(BillingMode::PayPerRequest)
        .stream_specification(
            StreamSpecification::builder()
                .stream_enabled(true)
                .stream_view_type(StreamViewType::NewAndOldImages)
                .build()
                .map_err(|e| StoreError::InvalidData(e.to_string()))?,
        );

    if let Err(err) = request.send().await {
        return match err.into_service_error() {
            CreateTableError::ResourceInUseException(_) => {
                tracing::debug!(table = %table, "table already exists");
                Ok(CreateTableOutcome::AlreadyExists)
            }
            err => Err(StoreError::QueryFailed(format!(
                "CreateTable failed: {:?}",
                err
            ))),
        };
    }

    wait_until_active(client, table, config).await?;

    // TTL can only be configured once the table is active.
    client
        .update_time_to_live()
        .table_name(table)
        .time_to_live_specification(
            TimeToLiveSpecification::builder()
                .enabled(true)
                .attribute_name(&config.ttl_attribute)
                .build()
                .map_err(|e| StoreError::InvalidData(e.to_string()))?,
        )
        .send()
        .await
        .map_err(|e| {
            StoreError::QueryFailed(format!(
                "UpdateTimeToLive failed: {:?}",
                e.into_service_error()
            ))
        })?;

    tracing::info!(table = %table, "table created");
    Ok(CreateTableOutcome::Created)
}

/// Delete the shared table and wait for absence.
pub(crate) async fn drop_table(
    client: &Client,
    table: &str,
    config: &Config,
) -> Result<DropTableOutcome> {
    if let Err(err) = client.delete_table().table_name(table).send().await {
        return match err.into_service_error() {
            DeleteTableError::ResourceNotFoundException(_) => {
                tracing::debug!(table = %table, "table not found");
                Ok(DropTableOutcome::NotFound)
            }
            err => Err(StoreError::QueryFailed(format!(
                "DeleteTable failed: {:?}",
                err
            ))),
        };
    }

    wait_until_absent(client, table, config).await?;

    tracing::info!(table = %table, "table dropped");
    Ok(DropTableOutcome::Dropped)
}

/// Poll until the table reports active, bounded by the configured attempt
/// budget.
async fn wait_until_active(client: &Client, table: &str, config: &Config) -> Result<()> {
    for attempt in 0..config.wait_max_attempts {
        match client.describe_table().table_name(table).send().await {
            Ok(output) => {
                let status = output.table.and_then(|t| t.table_status);
                tracing::debug!(table = %table, attempt, status = ?status, "waiting for active");
                if status == Some(TableStatus::Active) {
                    return Ok(());
                }
            }
            Err(err) => match err.into_service_error() {
                // Creation may not be visible yet.
                DescribeTableError::ResourceNotFoundException(_) => {}
                err => {
                    return Err(StoreError::QueryFailed(format!(
                        "DescribeTable failed: {:?}",
                        err
                    )))
                }
            },
        }
        sleep(config.wait_poll_interval()).await;
    }
    Err(StoreError::WaitTimedOut(table.to_string()))
}

/// Poll until the table no longer exists, bounded by the configured attempt
/// budget.
async fn wait_until_absent(client: &Client, table: &str, config: &Config) -> Result<()> {
    for attempt in 0..config.wait_max_attempts {
        match client.describe_table().table_name(table).send().await {
            Ok(output) => {
                let status = output.table.and_then(|t| t.table_status);
                tracing::debug!(table = %table, attempt, status = ?status, "waiting for absence");
            }
            Err(err) => match err.into_service_error() {
                DescribeTableError::ResourceNotFoundException(_) => return Ok(()),
                err => {
                    return Err(StoreError::QueryFailed(format!(
                        "DescribeTable failed: {:?}",
                        err
                    )))
                }
            },
        }
        sleep(config.wait_poll_interval()).await;
    }
    Err(StoreError::WaitTimedOut(table.to_string()))
}

/// String-typed attribute definition for the key schema.
fn string_attribute(name: &str) -> Result<AttributeDefinition> {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(|e| StoreError::InvalidData(e.to_string()))
}

/// Key schema element for the given key role.
fn key_element(name: &str, key_type: KeyType) -> Result<KeySchemaElement> {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()
        .map_err(|e| StoreError::InvalidData(e.to_string()))
}
