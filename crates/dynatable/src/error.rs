//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError` from `dynatable_core`. Failures map
//! once and propagate; no retry layer sits on top.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use dynatable_core::StoreError;

/// Map a GetItem SDK error to StoreError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> StoreError {
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => {
            StoreError::QueryFailed("Table not found".to_string())
        }
        GetItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::QueryFailed("Throughput exceeded, please retry".to_string())
        }
        GetItemError::RequestLimitExceeded(_) => {
            StoreError::QueryFailed("Request limit exceeded, please retry".to_string())
        }
        GetItemError::InternalServerError(_) => {
            StoreError::ConnectionFailed("DynamoDB internal server error".to_string())
        }
        err => StoreError::QueryFailed(format!("GetItem failed: {:?}", err)),
    }
}

/// Map a PutItem SDK error to StoreError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
) -> StoreError {
    match err.into_service_error() {
        PutItemError::ResourceNotFoundException(_) => {
            StoreError::QueryFailed("Table not found".to_string())
        }
        PutItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::QueryFailed("Throughput exceeded, please retry".to_string())
        }
        PutItemError::RequestLimitExceeded(_) => {
            StoreError::QueryFailed("Request limit exceeded, please retry".to_string())
        }
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::QueryFailed("Item collection size limit exceeded".to_string())
        }
        PutItemError::InternalServerError(_) => {
            StoreError::ConnectionFailed("DynamoDB internal server error".to_string())
        }
        err => StoreError::QueryFailed(format!("PutItem failed: {:?}", err)),
    }
}

/// Map a DeleteItem SDK error to StoreError.
///
/// Deleting an absent key is not a service error in DynamoDB, so idempotence
/// needs no special case here.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
) -> StoreError {
    match err.into_service_error() {
        DeleteItemError::ResourceNotFoundException(_) => {
            StoreError::QueryFailed("Table not found".to_string())
        }
        DeleteItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::QueryFailed("Throughput exceeded, please retry".to_string())
        }
        DeleteItemError::RequestLimitExceeded(_) => {
            StoreError::QueryFailed("Request limit exceeded, please retry".to_string())
        }
        DeleteItemError::InternalServerError(_) => {
            StoreError::ConnectionFailed("DynamoDB internal server error".to_string())
        }
        err => StoreError::QueryFailed(format!("DeleteItem failed: {:?}", err)),
    }
}

/// Map a Query SDK error to StoreError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
) -> StoreError {
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => {
            StoreError::QueryFailed("Table not found".to_string())
        }
        QueryError::ProvisionedThroughputExceededException(_) => {
            StoreError::QueryFailed("Throughput exceeded, please retry".to_string())
        }
        QueryError::RequestLimitExceeded(_) => {
            StoreError::QueryFailed("Request limit exceeded, please retry".to_string())
        }
        QueryError::InternalServerError(_) => {
            StoreError::ConnectionFailed("DynamoDB internal server error".to_string())
        }
        err => StoreError::QueryFailed(format!("Query failed: {:?}", err)),
    }
}

/// Map a Scan SDK error to StoreError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(err: SdkError<ScanError, R>) -> StoreError {
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => {
            StoreError::QueryFailed("Table not found".to_string())
        }
        ScanError::ProvisionedThroughputExceededException(_) => {
            StoreError::QueryFailed("Throughput exceeded, please retry".to_string())
        }
        ScanError::RequestLimitExceeded(_) => {
            StoreError::QueryFailed("Request limit exceeded, please retry".to_string())
        }
        ScanError::InternalServerError(_) => {
            StoreError::ConnectionFailed("DynamoDB internal server error".to_string())
        }
        err => StoreError::QueryFailed(format!("Scan failed: {:?}", err)),
    }
}
