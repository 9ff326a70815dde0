use std::fmt::Display;

use thiserror::Error;
use tracing::error;

use crate::storage::blob_store::BlobError;

/// Failure taxonomy shared by every service operation.
///
/// The `String` payloads are human-readable and safe to hand back to API callers;
/// underlying store errors are logged where they are converted.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("store unavailable: {0}")]
    Store(String),
    #[error("blob store error: {0}")]
    Blob(#[from] BlobError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Wrap a store failure: the cause is logged, the caller only sees `context`.
    pub fn store(context: &str, cause: impl Display) -> Self {
        error!(error = %cause, "{context}");
        Self::Store(context.to_string())
    }

    /// Message suitable for the `error` field of an API response.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Validation(m)
            | ServiceError::Conflict(m)
            | ServiceError::NotFound(m)
            | ServiceError::Unauthorized(m)
            | ServiceError::Store(m)
            | ServiceError::Internal(m) => m.clone(),
            ServiceError::Blob(_) => "Error storing uploaded file".to_string(),
        }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::Conflict(_) => 1002,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Unauthorized(_) => 1004,
            ServiceError::Store(_) => 1200,
            ServiceError::Blob(_) => 1201,
            ServiceError::Internal(_) => 1300,
        }
    }
}
