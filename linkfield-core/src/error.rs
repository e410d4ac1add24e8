//! Error types for linkfield operations

use thiserror::Error;

/// Content store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error("Query for {collection} failed: {reason}")]
    QueryFailed { collection: String, reason: String },

    #[error("Invalid query argument {key}: {reason}")]
    InvalidArgument { key: String, reason: String },
}

/// Resolution errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Unsupported content type: {requested}")]
    UnsupportedType { requested: String },

    #[error("No strategy registered for {kind}")]
    MissingStrategy { kind: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all linkfield errors.
#[derive(Debug, Clone, Error)]
pub enum LinkfieldError {
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for linkfield operations.
pub type LinkfieldResult<T> = Result<T, LinkfieldError>;

// =============================================================================
// TESTS
// =============================================================================
