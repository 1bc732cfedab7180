//! Cache types

use crate::policy::EvictionStrategy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TTL_SECS: u64 = 5 * 60;
const DEFAULT_MAX_SIZE: usize = 100;
const CLINICAL_TTL_SECS: u64 = 10 * 60;
const CLINICAL_MAX_SIZE: usize = 200;

/// A cached value with its bookkeeping
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub key: String,
    pub value: V,
    pub inserted_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub access_count: u64,
    /// Logical insertion order, kept across overwrites
    pub(crate) insert_seq: u64,
    /// Logical order of the last touch
    pub(crate) access_seq: u64,
}

/// Configuration for a cache instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum age of an entry before reads treat it as absent
    pub ttl: Duration,
    /// Maximum number of entries
    pub max_size: usize,
    /// Eviction policy applied when full
    pub strategy: EvictionStrategy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            max_size: DEFAULT_MAX_SIZE,
            strategy: EvictionStrategy::Lru,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for patient and clinical records: longer TTL, larger capacity
    pub fn clinical() -> Self {
        Self {
            ttl: Duration::from_secs(CLINICAL_TTL_SECS),
            max_size: CLINICAL_MAX_SIZE,
            strategy: EvictionStrategy::Lru,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_strategy(mut self, strategy: EvictionStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Statistics about the cache
///
/// `hit_rate` is the legacy approximation: entries read more than once over
/// total accumulated accesses of live entries. `hits`/`misses` are real
/// lookup counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    pub hit_rate: f64,
    pub memory_estimate_bytes: u64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub strategy: EvictionStrategy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_size, 100);
        assert_eq!(config.strategy, EvictionStrategy::Lru);
    }

    #[test]
    fn test_clinical_config() {
        let config = CacheConfig::clinical();
        assert_eq!(config.ttl, Duration::from_secs(600));
        assert_eq!(config.max_size, 200);
        assert_eq!(config.strategy, EvictionStrategy::Lru);
    }

    #[test]
    fn test_config_builders() {
        let config = CacheConfig::new()
            .with_ttl(Duration::from_millis(1000))
            .with_max_size(2)
            .with_strategy(EvictionStrategy::Fifo);

        assert_eq!(config.ttl, Duration::from_millis(1000));
        assert_eq!(config.max_size, 2);
        assert_eq!(config.strategy, EvictionStrategy::Fifo);
    }

    #[test]
    fn test_cache_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.hit_rate, 0.0);
    }

    #[test]
    fn test_cache_stats_serialization() {
        let stats = CacheStats {
            size: 3,
            max_size: 100,
            hit_rate: 0.25,
            memory_estimate_bytes: 4096,
            hits: 10,
            misses: 2,
            evictions: 1,
            expirations: 0,
            strategy: EvictionStrategy::Lfu,
        };

        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"strategy\":\"lfu\""));
        assert!(json.contains("4096"));

        let deserialized: CacheStats = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, stats);
    }
}
