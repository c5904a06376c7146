//! # Configuration
//!
//! A minimal key/value configuration store with dotted keys
//! (`http.port`, `delivery.cache_max_age_secs`, ...). Applications layer
//! values however they like: defaults first, then environment overrides.
//!
//! ```rust
//! use media_core::MediaConfig;
//! let mut config = MediaConfig::new();
//!
//! config.set("http.port", "3030");
//! config.set("delivery.suffix_ranges", "true");
//!
//! let snapshot = config.snapshot();
//! assert_eq!(snapshot.get_u64("http.port"), Some(3030));
//! assert_eq!(snapshot.get_bool("delivery.suffix_ranges"), Some(true));
//! ```
//!
//! ## Environment overrides
//!
//! [`MediaConfig::load_env`] maps prefixed variables onto dotted keys:
//!
//! ```bash
//! export MEDIA__DELIVERY__CACHE_MAX_AGE_SECS=600   # delivery.cache_max_age_secs
//! ```

use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct MediaConfig {
    values: HashMap<String, String>,
}

impl MediaConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Set a key only if it has no value yet.
    pub fn set_default<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.entry(key.into()).or_insert_with(|| value.into());
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Check whether a key is present.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Apply overrides from an iterator of `(name, value)` pairs.
    ///
    /// Names must start with `prefix`; the rest is lower-cased and `__`
    /// becomes `.`, so `MEDIA__HTTP__PORT` with prefix `MEDIA__` sets
    /// `http.port`. Returns how many keys were applied.
    pub fn load_vars<I>(&mut self, prefix: &str, vars: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut applied = 0;
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                if stripped.is_empty() {
                    continue;
                }
                let normalized = stripped.to_lowercase().replace("__", ".");
                self.set(normalized, value);
                applied += 1;
            }
        }
        applied
    }

    /// Apply overrides from the process environment.
    pub fn load_env(&mut self, prefix: &str) -> usize {
        self.load_vars(prefix, std::env::vars())
    }

    pub fn snapshot(&self) -> MediaConfigSnapshot {
        MediaConfigSnapshot::new(self.values.clone())
    }
}

/// Read-only, typed view of a [`MediaConfig`].
#[derive(Debug, Clone, Default)]
pub struct MediaConfigSnapshot {
    map: HashMap<String, String>,
}

impl MediaConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.trim().parse::<usize>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| match v.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
    }

    /// Milliseconds stored under `key`, as a `Duration`.
    pub fn get_duration_ms(&self, key: &str) -> Option<Duration> {
        self.get_u64(key).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn env_style_keys_become_dotted() {
        let mut config = MediaConfig::new();
        let applied = config.load_vars(
            "MEDIA__",
            vars(&[
                ("MEDIA__HTTP__PORT", "8080"),
                ("MEDIA__DELIVERY__CACHE_MAX_AGE_SECS", "600"),
                ("PATH", "/usr/bin"),
                ("MEDIA__", "ignored"),
            ]),
        );

        assert_eq!(applied, 2);
        assert_eq!(config.get("http.port"), Some("8080"));
        assert_eq!(config.get("delivery.cache_max_age_secs"), Some("600"));
        assert!(!config.has("path"));
    }

    #[test]
    fn set_default_does_not_override() {
        let mut config = MediaConfig::new();
        config.set("http.host", "0.0.0.0");
        config.set_default("http.host", "127.0.0.1");
        config.set_default("http.port", "3030");

        assert_eq!(config.get("http.host"), Some("0.0.0.0"));
        assert_eq!(config.get("http.port"), Some("3030"));
    }

    #[test]
    fn snapshot_typed_getters() {
        let mut config = MediaConfig::new();
        config.set("a", "42");
        config.set("b", "on");
        config.set("c", "maybe");
        config.set("d", "250");

        let snap = config.snapshot();
        assert_eq!(snap.get_u64("a"), Some(42));
        assert_eq!(snap.get_usize("a"), Some(42));
        assert_eq!(snap.get_bool("b"), Some(true));
        assert_eq!(snap.get_bool("c"), None);
        assert_eq!(snap.get_duration_ms("d"), Some(Duration::from_millis(250)));
        assert_eq!(snap.get_u64("missing"), None);
    }
}
