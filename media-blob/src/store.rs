use async_trait::async_trait;

use crate::{BlobResult, ByteRange, ByteStream};

/// Read-side blob storage operations - implemented by every backing store
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Get object metadata without content
    async fn head(&self, key: &str) -> BlobResult<ObjectHead>;

    /// Open an object as a stream.
    ///
    /// With `range: None` the stream starts at offset zero. A `Some` range
    /// may only be passed when [`StoreCapabilities::supports_range`] is set.
    async fn get(&self, key: &str, range: Option<ByteRange>) -> BlobResult<GetResult>;

    /// Get store capabilities
    fn capabilities(&self) -> StoreCapabilities;
}

/// Result of a get operation
pub struct GetResult {
    pub stream: ByteStream,
    /// Bytes the stream is expected to yield
    pub size_bytes: u64,
}

impl std::fmt::Debug for GetResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GetResult")
            .field("size_bytes", &self.size_bytes)
            .finish_non_exhaustive()
    }
}

/// Metadata about a stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectHead {
    pub size_bytes: u64,
    pub content_type: Option<String>,
}

impl ObjectHead {
    pub fn new(size_bytes: u64) -> Self {
        Self {
            size_bytes,
            content_type: None,
        }
    }

    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Store capabilities
#[derive(Debug, Clone, Default)]
pub struct StoreCapabilities {
    pub supports_range: bool,
}

impl StoreCapabilities {
    pub fn basic() -> Self {
        Self {
            supports_range: false,
        }
    }

    pub fn with_range(mut self) -> Self {
        self.supports_range = true;
        self
    }
}
