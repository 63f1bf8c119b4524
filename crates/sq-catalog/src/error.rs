//! Catalog store error types.

use thiserror::Error;

/// Errors that can occur while reading the catalog.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot open catalog: {0}")]
    Connect(String),

    #[error("catalog query failed: {0}")]
    Query(String),

    #[error("invalid SQL identifier: {0}")]
    InvalidIdentifier(String),

    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Convenience alias for catalog results.
pub type StoreResult<T> = Result<T, StoreError>;
