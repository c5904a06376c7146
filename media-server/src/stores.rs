use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use bytes::Bytes;
use media_blob::{BlobStore, MemoryBlobStore, S3CompatibleStore, S3Config};
use media_core::{ManifestRecordStore, MediaConfigSnapshot, MemoryRecordStore, RecordStore};

/// Record store from `manifest.path`, or an empty one.
pub fn record_store(snapshot: &MediaConfigSnapshot) -> anyhow::Result<Arc<dyn RecordStore>> {
    match snapshot.get_string("manifest.path") {
        Some(path) => {
            let manifest = ManifestRecordStore::load(&path)?;
            tracing::info!(path = %path, records = manifest.len(), "media manifest loaded");
            Ok(Arc::new(manifest))
        }
        None => {
            tracing::warn!("manifest.path not set, every media id will be unknown");
            Ok(Arc::new(MemoryRecordStore::new()))
        }
    }
}

/// Blob store selected by `store.kind`.
pub async fn blob_store(snapshot: &MediaConfigSnapshot) -> anyhow::Result<Arc<dyn BlobStore>> {
    let kind = snapshot
        .get_string("store.kind")
        .unwrap_or_else(|| "memory".to_string());

    match kind.as_str() {
        "memory" => {
            let mut store = MemoryBlobStore::new();
            if snapshot.get_bool("store.memory_range").unwrap_or(false) {
                store = store.with_range_support();
            }
            if let Some(root) = snapshot.get_string("store.root") {
                let loaded = preload(&store, Path::new(&root)).await?;
                tracing::info!(root = %root, objects = loaded, "memory store preloaded");
            }
            Ok(Arc::new(store))
        }
        "s3" => {
            let config = S3Config::from_snapshot(snapshot)?;
            tracing::info!(
                bucket = %config.bucket,
                region = %config.region,
                endpoint = config.endpoint_url.as_deref().unwrap_or("aws"),
                "using s3 store"
            );
            Ok(Arc::new(S3CompatibleStore::new(config).await))
        }
        other => bail!("unknown store.kind '{other}', expected 'memory' or 's3'"),
    }
}

/// Load every file under `root` into the store, keyed by its `/`-separated
/// path relative to `root`.
async fn preload(store: &MemoryBlobStore, root: &Path) -> anyhow::Result<usize> {
    let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];
    let mut loaded = 0;

    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .with_context(|| format!("failed to read store root {}", dir.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                pending.push(path);
                continue;
            }

            let key = path
                .strip_prefix(root)?
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let data = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            store.insert(key, Bytes::from(data), None);
            loaded += 1;
        }
    }

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_core::MediaConfig;

    #[tokio::test]
    async fn unknown_kind_is_rejected() {
        let mut config = MediaConfig::new();
        config.set("store.kind", "ftp");
        let err = blob_store(&config.snapshot()).await.err().unwrap();
        assert!(err.to_string().contains("ftp"));
    }

    #[tokio::test]
    async fn s3_kind_needs_a_bucket() {
        let mut config = MediaConfig::new();
        config.set("store.kind", "s3");
        assert!(blob_store(&config.snapshot()).await.is_err());
    }

    #[tokio::test]
    async fn preload_keys_by_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("videos/2024")).unwrap();
        std::fs::write(dir.path().join("videos/2024/clip.mp4"), b"0123456789").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hi").unwrap();

        let store = MemoryBlobStore::new();
        assert_eq!(preload(&store, dir.path()).await.unwrap(), 2);
        assert_eq!(store.head("videos/2024/clip.mp4").await.unwrap().size_bytes, 10);
        assert_eq!(store.head("notes.txt").await.unwrap().size_bytes, 2);
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let mut config = MediaConfig::new();
        config.set("manifest.path", "/definitely/not/here.json");
        let err = record_store(&config.snapshot()).err().unwrap();
        assert!(format!("{err:#}").contains("failed to read media manifest"));
    }
}
