use thiserror::Error;

/// Errors that can occur across the ODM.
///
/// Key-derivation and codec errors are programmer errors: they surface
/// immediately at call time and are never retried. Store-level failures are
/// mapped once by the backend and propagate unchanged. Read misses are not
/// errors; `get` returns `Ok(None)`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{type_name} has no value for key field `{field}`")]
    MissingKeyField {
        type_name: &'static str,
        field: &'static str,
    },
    #[error("Invalid sort key operator: {0}")]
    InvalidOperator(String),
    #[error("Malformed between range `{0}`: expected `<lower>-<upper>`")]
    MalformedRange(String),
    #[error("No record types registered: register models before issuing store operations")]
    NoRegisteredTypes,
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Timed out waiting on table `{0}`")]
    WaitTimedOut(String),
}

/// Result type for ODM operations.
pub type Result<T> = std::result::Result<T, StoreError>;
