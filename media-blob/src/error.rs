use thiserror::Error;

use crate::range::RangeRejection;

/// Result type for blob and delivery operations
pub type BlobResult<T> = Result<T, BlobError>;

/// Errors that can occur while resolving and delivering a blob
#[derive(Error, Debug)]
pub enum BlobError {
    #[error("Media not found: {id}")]
    NotFound { id: String },

    #[error("Object not found in backing store: {key}")]
    ObjectNotFound { key: String },

    #[error("Range not satisfiable for object of {size} bytes: {reason}")]
    RangeNotSatisfiable { size: u64, reason: RangeRejection },

    #[error("Invalid request: {message}")]
    Invalid { message: String },

    #[error("Operation not supported by this store")]
    Unsupported,

    #[error("Backing store {operation} timed out after {after_ms}ms for {key}")]
    Timeout {
        operation: &'static str,
        key: String,
        after_ms: u128,
    },

    #[error("Record store error: {source}")]
    RecordStore {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Storage backend error: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl BlobError {
    /// Create a backend error from any error type
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(error),
        }
    }

    /// Wrap a record store failure
    pub fn record_store(error: anyhow::Error) -> Self {
        Self::RecordStore {
            source: error.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error for a media identifier
    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a not found error for a backing-store key
    pub fn object_not_found<S: Into<String>>(key: S) -> Self {
        Self::ObjectNotFound { key: key.into() }
    }

    pub fn range_not_satisfiable(size: u64, reason: RangeRejection) -> Self {
        Self::RangeNotSatisfiable { size, reason }
    }

    /// True for failures of the backing store itself (metadata, open, deadline)
    pub fn is_backing_store(&self) -> bool {
        matches!(
            self,
            Self::ObjectNotFound { .. } | Self::Timeout { .. } | Self::Backend { .. } | Self::Unsupported
        )
    }
}
