//! Configuration and response types for the ClinicDesk edge

use adaptive_media::{ImageVariant, QualityTier};
use bounded_cache::{CacheConfig, CacheStats, EvictionStrategy};
use idle_preloader::{PreloaderConfig, PreloaderStats};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Configuration for the edge service
#[derive(Debug, Clone)]
pub struct EdgeConfig {
    pub port: u16,
    pub upstream_url: String,
    pub data_cache: CacheConfig,
    pub clinical_cache: CacheConfig,
    /// Routes the preloader may warm; each maps to the upstream path of the same name
    pub preload_routes: Vec<String>,
    pub preloader: PreloaderConfig,
    /// Upstream path timed by the latency probe
    pub latency_probe_path: String,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            port: 3005,
            upstream_url: "http://localhost:3004".to_string(),
            data_cache: CacheConfig::default(),
            clinical_cache: CacheConfig::clinical(),
            preload_routes: vec![
                "patients".to_string(),
                "appointments".to_string(),
                "documents".to_string(),
            ],
            preloader: PreloaderConfig::default(),
            latency_probe_path: "health".to_string(),
        }
    }
}

impl EdgeConfig {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse configuration from any key lookup; unset or invalid values keep defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u64>().ok());

        let port = lookup("PORT")
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let upstream_url = lookup("UPSTREAM_URL").unwrap_or(defaults.upstream_url);

        let cache_from = |prefix: &str, base: CacheConfig| {
            let mut config = base;
            if let Some(secs) = parsed(&format!("{}CACHE_TTL_SECS", prefix)) {
                config = config.with_ttl(Duration::from_secs(secs));
            }
            if let Some(size) = parsed(&format!("{}CACHE_MAX_SIZE", prefix)) {
                config = config.with_max_size(size as usize);
            }
            if let Some(name) = lookup(&format!("{}CACHE_STRATEGY", prefix)) {
                match name.parse::<EvictionStrategy>() {
                    Ok(strategy) => config = config.with_strategy(strategy),
                    Err(e) => warn!(error = %e, "Ignoring cache strategy"),
                }
            }
            config
        };

        let data_cache = cache_from("", defaults.data_cache);
        let clinical_cache = cache_from("CLINICAL_", defaults.clinical_cache);

        let preload_routes = lookup("PRELOAD_ROUTES")
            .map(|s| {
                s.split(',')
                    .map(|r| r.trim().trim_matches('/').to_string())
                    .filter(|r| !r.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.preload_routes);

        let mut preloader = defaults.preloader;
        if let Some(capacity) = parsed("PRELOAD_HISTORY") {
            preloader = preloader.with_history_capacity(capacity as usize);
        }
        if let Some(top_n) = parsed("PRELOAD_TOP_N") {
            preloader = preloader.with_top_n(top_n as usize);
        }

        let latency_probe_path =
            lookup("LATENCY_PROBE_PATH").unwrap_or(defaults.latency_probe_path);

        Self {
            port,
            upstream_url,
            data_cache,
            clinical_cache,
            preload_routes,
            preloader,
            latency_probe_path,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub foreground_in_flight: usize,
    pub data_cache: CacheStats,
    pub clinical_cache: CacheStats,
    pub preloader: PreloaderStats,
}

/// Response to a recorded navigation
#[derive(Debug, Serialize, Deserialize)]
pub struct NavigateResponse {
    pub route: String,
    pub queued: Vec<String>,
}

/// Query for `/media/variant`; every field is parsed leniently
#[derive(Debug, Default, Deserialize)]
pub struct VariantQuery {
    pub viewport: Option<String>,
    pub quality: Option<String>,
    pub latency_ms: Option<String>,
}

/// Selected media variant
#[derive(Debug, Serialize, Deserialize)]
pub struct VariantResponse {
    pub tier: QualityTier,
    pub latency_ms: Option<f64>,
    pub variant: ImageVariant,
    /// `Accept` hint for the media backend request
    pub content_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = EdgeConfig::default();
        assert_eq!(config.port, 3005);
        assert_eq!(config.data_cache.max_size, 100);
        assert_eq!(config.data_cache.ttl, Duration::from_secs(300));
        assert_eq!(config.clinical_cache.max_size, 200);
        assert_eq!(config.clinical_cache.ttl, Duration::from_secs(600));
        assert_eq!(config.preloader.history_capacity, 10);
        assert_eq!(config.preloader.top_n, 3);
        assert_eq!(config.preload_routes.len(), 3);
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = EdgeConfig::from_lookup(|_| None);
        assert_eq!(config.port, 3005);
        assert_eq!(config.upstream_url, "http://localhost:3004");
        assert_eq!(config.data_cache, CacheConfig::default());
        assert_eq!(config.clinical_cache, CacheConfig::clinical());
    }

    #[test]
    fn test_config_from_lookup() {
        let config = EdgeConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("UPSTREAM_URL", "http://api.internal:9000/v1/"),
            ("CACHE_TTL_SECS", "60"),
            ("CACHE_MAX_SIZE", "10"),
            ("CACHE_STRATEGY", "fifo"),
            ("CLINICAL_CACHE_STRATEGY", "LFU"),
            ("PRELOAD_ROUTES", " patients , /audits/ ,,"),
            ("PRELOAD_HISTORY", "5"),
            ("PRELOAD_TOP_N", "1"),
        ]));

        assert_eq!(config.port, 8080);
        assert_eq!(config.upstream_url, "http://api.internal:9000/v1/");
        assert_eq!(config.data_cache.ttl, Duration::from_secs(60));
        assert_eq!(config.data_cache.max_size, 10);
        assert_eq!(config.data_cache.strategy, EvictionStrategy::Fifo);
        assert_eq!(config.clinical_cache.strategy, EvictionStrategy::Lfu);
        assert_eq!(config.clinical_cache.max_size, 200);
        assert_eq!(config.preload_routes, vec!["patients", "audits"]);
        assert_eq!(config.preloader.history_capacity, 5);
        assert_eq!(config.preloader.top_n, 1);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = EdgeConfig::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("CACHE_MAX_SIZE", "-4"),
            ("CACHE_STRATEGY", "random"),
        ]));

        assert_eq!(config.port, 3005);
        assert_eq!(config.data_cache, CacheConfig::default());
    }

    #[test]
    fn test_navigate_response_serialization() {
        let response = NavigateResponse {
            route: "patients".to_string(),
            queued: vec!["patients".to_string()],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"route":"patients","queued":["patients"]}"#);
    }
}
