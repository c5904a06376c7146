use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use crate::{
    BlobError, BlobResult, BlobStore, ByteRange, ByteStream, GetResult, ObjectHead,
    StoreCapabilities,
};

const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    content_type: Option<String>,
}

/// In-process blob store.
///
/// Streams are cut into `chunk_size` pieces so consumers see realistic
/// chunk boundaries. Native range reads are off unless enabled with
/// [`MemoryBlobStore::with_range_support`].
#[derive(Debug, Clone)]
pub struct MemoryBlobStore {
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
    chunk_size: usize,
    supports_range: bool,
    opens: Arc<AtomicUsize>,
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
            chunk_size: DEFAULT_CHUNK_SIZE,
            supports_range: false,
            opens: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_range_support(mut self) -> Self {
        self.supports_range = true;
        self
    }

    pub fn insert<K: Into<String>>(&self, key: K, data: Bytes, content_type: Option<&str>) {
        self.objects.write().insert(
            key.into(),
            StoredObject {
                data,
                content_type: content_type.map(str::to_string),
            },
        );
    }

    /// Number of streams opened so far, across clones.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    fn object(&self, key: &str) -> BlobResult<StoredObject> {
        self.objects
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| BlobError::object_not_found(key))
    }

    fn chunk_stream(&self, data: Bytes) -> ByteStream {
        let chunk_size = self.chunk_size;
        let chunks: Vec<std::io::Result<Bytes>> = (0..data.len())
            .step_by(chunk_size)
            .map(|offset| Ok(data.slice(offset..(offset + chunk_size).min(data.len()))))
            .collect();
        Box::pin(futures::stream::iter(chunks))
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn head(&self, key: &str) -> BlobResult<ObjectHead> {
        let object = self.object(key)?;
        Ok(ObjectHead {
            size_bytes: object.data.len() as u64,
            content_type: object.content_type,
        })
    }

    async fn get(&self, key: &str, range: Option<ByteRange>) -> BlobResult<GetResult> {
        let object = self.object(key)?;
        let size = object.data.len() as u64;

        let data = match range {
            None => object.data,
            Some(_) if !self.supports_range => return Err(BlobError::Unsupported),
            Some(range) if !range.is_valid(size) => {
                return Err(BlobError::invalid(format!(
                    "range {} outside object of {size} bytes",
                    range.to_header_value()
                )))
            }
            Some(range) => {
                let end = range.start + range.length(size);
                object.data.slice(range.start as usize..end as usize)
            }
        };

        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(GetResult {
            size_bytes: data.len() as u64,
            stream: self.chunk_stream(data),
        })
    }

    fn capabilities(&self) -> StoreCapabilities {
        if self.supports_range {
            StoreCapabilities::basic().with_range()
        } else {
            StoreCapabilities::basic()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    async fn collect(result: GetResult) -> (Vec<usize>, Vec<u8>) {
        let mut sizes = Vec::new();
        let mut out = Vec::new();
        let mut stream = result.stream;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.unwrap();
            sizes.push(chunk.len());
            out.extend_from_slice(&chunk);
        }
        (sizes, out)
    }

    #[tokio::test]
    async fn head_and_chunked_get() {
        let store = MemoryBlobStore::new().with_chunk_size(4);
        store.insert("a", Bytes::from_static(b"0123456789"), Some("text/plain"));

        let head = store.head("a").await.unwrap();
        assert_eq!(head, ObjectHead::new(10).with_content_type("text/plain"));

        let (sizes, data) = collect(store.get("a", None).await.unwrap()).await;
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(data, b"0123456789");
        assert_eq!(store.open_count(), 1);
    }

    #[tokio::test]
    async fn missing_key() {
        let store = MemoryBlobStore::new();
        assert!(matches!(
            store.head("nope").await,
            Err(BlobError::ObjectNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn range_reads_need_support() {
        let store = MemoryBlobStore::new();
        store.insert("a", Bytes::from_static(b"0123456789"), None);
        assert!(matches!(
            store.get("a", Some(ByteRange::new(2, Some(4)))).await,
            Err(BlobError::Unsupported)
        ));

        let store = store.with_range_support();
        assert!(store.capabilities().supports_range);
        let result = store.get("a", Some(ByteRange::new(2, Some(4)))).await.unwrap();
        assert_eq!(result.size_bytes, 3);
        let (_, data) = collect(result).await;
        assert_eq!(data, b"234");

        let (_, tail) = collect(store.get("a", Some(ByteRange::new(7, None))).await.unwrap()).await;
        assert_eq!(tail, b"789");

        assert!(matches!(
            store.get("a", Some(ByteRange::new(5, Some(10)))).await,
            Err(BlobError::Invalid { .. })
        ));
    }
}
