mod app;
mod stores;

use media_axum::{axum, AxumApp};
use media_blob::{DeliveryConfig, MediaDelivery};
use media_core::MediaConfig;

pub use app::{default_config, http_addr, media_config, ENV_PREFIX};

/// Wire stores and delivery settings from `config` into a ready app.
pub async fn build(config: &MediaConfig) -> anyhow::Result<AxumApp> {
    let snapshot = config.snapshot();

    let records = stores::record_store(&snapshot)?;
    let blobs = stores::blob_store(&snapshot).await?;
    let delivery_config = DeliveryConfig::from_snapshot(&snapshot);

    tracing::info!(
        backend_timeout_ms = delivery_config.backend_timeout.as_millis() as u64,
        cache_max_age_secs = delivery_config.cache_max_age.as_secs(),
        suffix_ranges = delivery_config.suffix_ranges,
        native_range = delivery_config.prefer_native_range && blobs.capabilities().supports_range,
        "delivery configured"
    );

    Ok(axum(MediaDelivery::new(records, blobs, delivery_config)))
}
