use media_core::{MediaConfig, MediaConfigSnapshot};

pub const ENV_PREFIX: &str = "MEDIA__";

/// Defaults for every key the server reads.
pub fn default_config() -> MediaConfig {
    let mut config = MediaConfig::new();
    config.set("http.host", "127.0.0.1");
    config.set("http.port", "3030");
    config.set("store.kind", "memory");
    config.set("delivery.cache_max_age_secs", "86400");
    config.set("delivery.backend_timeout_ms", "10000");
    config.set("delivery.suffix_ranges", "false");
    config.set("delivery.prefer_native_range", "true");
    config
}

/// Defaults overridden by `MEDIA__*` environment variables.
pub fn media_config() -> MediaConfig {
    let mut config = default_config();
    let loaded = config.load_env(ENV_PREFIX);
    tracing::debug!(loaded, "configuration loaded from environment");
    config
}

pub fn http_addr(snapshot: &MediaConfigSnapshot) -> String {
    let host = snapshot
        .get_string("http.host")
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = snapshot
        .get_string("http.port")
        .unwrap_or_else(|| "3030".to_string());
    format!("{host}:{port}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_defaults() {
        let mut config = default_config();
        config.load_vars(
            ENV_PREFIX,
            [
                ("MEDIA__HTTP__PORT".to_string(), "8080".to_string()),
                ("UNRELATED".to_string(), "x".to_string()),
            ],
        );
        let snapshot = config.snapshot();
        assert_eq!(http_addr(&snapshot), "127.0.0.1:8080");
        assert_eq!(snapshot.get("store.kind"), Some("memory"));
    }
}
