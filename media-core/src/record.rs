//! Record store capability.
//!
//! The record store owns the mapping from a public media identifier to the
//! backing-object key and the declared descriptive fields. Delivery only
//! ever reads from it.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::errors::MediaResult;

/// A stored media object as the record store describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: String,
    /// Key of the object in the backing store.
    pub key: String,
    pub file_name: String,
    pub content_type: String,
    /// Declared byte length. The backing store's own size wins when they disagree.
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl MediaRecord {
    pub fn new<I, K, F, C>(id: I, key: K, file_name: F, content_type: C) -> Self
    where
        I: Into<String>,
        K: Into<String>,
        F: Into<String>,
        C: Into<String>,
    {
        Self {
            id: id.into(),
            key: key.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            size: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}

/// Lookup capability over the record store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Resolve an identifier. `Ok(None)` means the identifier is unknown.
    async fn lookup(&self, id: &str) -> MediaResult<Option<MediaRecord>>;
}

/// In-process record store.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<String, MediaRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = MediaRecord>,
    {
        let store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Insert or replace a record, keyed by its id.
    pub fn insert(&self, record: MediaRecord) {
        self.records.write().insert(record.id.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn lookup(&self, id: &str) -> MediaResult<Option<MediaRecord>> {
        Ok(self.records.read().get(id).cloned())
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Manifest {
    List(Vec<MediaRecord>),
    Wrapped { records: Vec<MediaRecord> },
}

/// Record store loaded once from a JSON manifest.
///
/// The manifest is either a bare array of records or an object with a
/// `records` array.
#[derive(Debug)]
pub struct ManifestRecordStore {
    inner: MemoryRecordStore,
}

impl ManifestRecordStore {
    pub fn from_json(json: &str) -> MediaResult<Self> {
        let manifest: Manifest =
            serde_json::from_str(json).context("failed to parse media manifest")?;
        let records = match manifest {
            Manifest::List(records) => records,
            Manifest::Wrapped { records } => records,
        };
        Ok(Self {
            inner: MemoryRecordStore::with_records(records),
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> MediaResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read media manifest {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl RecordStore for ManifestRecordStore {
    async fn lookup(&self, id: &str) -> MediaResult<Option<MediaRecord>> {
        self.inner.lookup(id).await
    }
}
