use std::time::Duration;

use media_core::MediaConfigSnapshot;

use crate::range::RangeOptions;

/// Configuration for delivery
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Deadline for each backing-store metadata lookup and stream open
    pub backend_timeout: Duration,

    /// `max-age` advertised on the streaming path (video and partial responses)
    pub cache_max_age: Duration,

    /// Honor `bytes=-N` suffix ranges instead of answering 416
    pub suffix_ranges: bool,

    /// When the store can read ranges natively, ask it for the interval
    /// instead of opening at offset zero and skipping
    pub prefer_native_range: bool,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            backend_timeout: Duration::from_secs(10),
            cache_max_age: Duration::from_secs(86_400), // 1 day
            suffix_ranges: false,
            prefer_native_range: true,
        }
    }
}

impl DeliveryConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `delivery.*` keys, falling back to defaults for missing ones
    pub fn from_snapshot(snapshot: &MediaConfigSnapshot) -> Self {
        let defaults = Self::default();
        Self {
            backend_timeout: snapshot
                .get_duration_ms("delivery.backend_timeout_ms")
                .unwrap_or(defaults.backend_timeout),
            cache_max_age: snapshot
                .get_u64("delivery.cache_max_age_secs")
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_max_age),
            suffix_ranges: snapshot
                .get_bool("delivery.suffix_ranges")
                .unwrap_or(defaults.suffix_ranges),
            prefer_native_range: snapshot
                .get_bool("delivery.prefer_native_range")
                .unwrap_or(defaults.prefer_native_range),
        }
    }

    /// Set the backing-store deadline
    pub fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = timeout;
        self
    }

    /// Set the cache lifetime for streamed content
    pub fn with_cache_max_age(mut self, max_age: Duration) -> Self {
        self.cache_max_age = max_age;
        self
    }

    /// Accept suffix ranges
    pub fn with_suffix_ranges(mut self) -> Self {
        self.suffix_ranges = true;
        self
    }

    /// Always open at offset zero and skip, even on range-capable stores
    pub fn skip_only(mut self) -> Self {
        self.prefer_native_range = false;
        self
    }

    pub fn range_options(&self) -> RangeOptions {
        RangeOptions::default().with_suffix(self.suffix_ranges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_core::MediaConfig;

    #[test]
    fn snapshot_overrides_defaults() {
        let mut config = MediaConfig::new();
        config.set("delivery.backend_timeout_ms", "250");
        config.set("delivery.suffix_ranges", "true");

        let delivery = DeliveryConfig::from_snapshot(&config.snapshot());
        assert_eq!(delivery.backend_timeout, Duration::from_millis(250));
        assert!(delivery.suffix_ranges);
        assert!(delivery.range_options().allow_suffix);
        assert_eq!(delivery.cache_max_age, Duration::from_secs(86_400));
        assert!(delivery.prefer_native_range);
    }

    #[test]
    fn builders() {
        let delivery = DeliveryConfig::new()
            .with_cache_max_age(Duration::from_secs(60))
            .skip_only();
        assert_eq!(delivery.cache_max_age.as_secs(), 60);
        assert!(!delivery.prefer_native_range);
        assert!(!delivery.range_options().allow_suffix);
    }
}
