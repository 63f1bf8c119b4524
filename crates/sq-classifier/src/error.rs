//! Classifier error types.

use thiserror::Error;

/// Errors raised at the classification boundary.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier unavailable: {0}")]
    Unavailable(String),

    #[error("classifier timed out after {0}s")]
    Timeout(u64),

    #[error("invalid classifier response: {0}")]
    InvalidResponse(String),

    #[error("invalid label set: {0}")]
    InvalidLabels(String),
}

/// Convenience alias for classification results.
pub type ClassifierResult<T> = Result<T, ClassifierError>;
