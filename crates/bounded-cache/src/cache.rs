//! Bounded cache with lazy expiry and single-entry eviction

use crate::clock::{Clock, SystemClock};
use crate::types::{CacheConfig, CacheEntry, CacheStats};
use chrono::TimeDelta;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Rough fixed cost per entry: timestamps, counters and map slot
const ENTRY_OVERHEAD_BYTES: u64 = 64;

/// An in-memory cache bounded by entry count
///
/// Expired entries are dropped lazily when read. When a new key arrives at
/// capacity, exactly one entry is evicted according to the configured
/// strategy.
pub struct BoundedCache<V, C = SystemClock> {
    entries: HashMap<String, CacheEntry<V>>,
    config: CacheConfig,
    ttl: TimeDelta,
    clock: C,
    /// Logical time for insertion and access ordering
    seq: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
    expirations: u64,
}

impl<V> BoundedCache<V> {
    /// Create a new cache using the wall clock
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<V> Default for BoundedCache<V> {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl<V, C: Clock> BoundedCache<V, C> {
    /// Create a new cache with an explicit time source
    pub fn with_clock(mut config: CacheConfig, clock: C) -> Self {
        config.max_size = config.max_size.max(1);
        let ttl = TimeDelta::from_std(config.ttl).unwrap_or(TimeDelta::MAX);

        Self {
            entries: HashMap::with_capacity(config.max_size),
            config,
            ttl,
            clock,
            seq: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
            expirations: 0,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Insert or overwrite a value
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        let now = self.clock.now();
        let seq = self.next_seq();

        // Overwrites never grow the map, so they never evict
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.value = value;
            entry.inserted_at = now;
            entry.last_accessed_at = now;
            entry.access_count = 1;
            entry.access_seq = seq;
            debug!(key = %key, "Overwrote cache entry");
            return;
        }

        if self.entries.len() >= self.config.max_size {
            self.evict_one();
        }

        self.entries.insert(
            key.clone(),
            CacheEntry {
                key,
                value,
                inserted_at: now,
                last_accessed_at: now,
                access_count: 1,
                insert_seq: seq,
                access_seq: seq,
            },
        );
    }

    /// Look up a value, dropping it if it has outlived the TTL
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let now = self.clock.now();

        let expired = match self.entries.get(key) {
            Some(entry) => now - entry.inserted_at > self.ttl,
            None => {
                self.misses += 1;
                return None;
            }
        };

        if expired {
            self.entries.remove(key);
            self.expirations += 1;
            self.misses += 1;
            debug!(key = %key, "Cache entry expired");
            return None;
        }

        let seq = self.next_seq();
        self.hits += 1;

        let entry = self.entries.get_mut(key)?;
        entry.access_count += 1;
        entry.last_accessed_at = now;
        entry.access_seq = seq;
        Some(&entry.value)
    }

    /// Same as `get(key).is_some()`, including the access bump and expiry
    pub fn has(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Remove an entry, returns whether one was present
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Remove all entries. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys currently held, including ones that may already be stale
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Fraction of lookups that returned a value
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn evict_one(&mut self) {
        let victim = self
            .config
            .strategy
            .select_victim(self.entries.values())
            .map(|e| e.key.clone());

        if let Some(key) = victim {
            self.entries.remove(&key);
            self.evictions += 1;
            debug!(key = %key, strategy = %self.config.strategy, "Evicted cache entry");
        }
    }
}

impl<V: Serialize, C: Clock> BoundedCache<V, C> {
    /// Get current cache statistics
    pub fn stats(&self) -> CacheStats {
        let total_accesses: u64 = self.entries.values().map(|e| e.access_count).sum();
        let reused = self
            .entries
            .values()
            .filter(|e| e.access_count > 1)
            .count();

        let hit_rate = if total_accesses == 0 {
            0.0
        } else {
            reused as f64 / total_accesses as f64
        };

        let memory_estimate_bytes = self.entries.values().map(estimate_entry_bytes).sum();

        CacheStats {
            size: self.entries.len(),
            max_size: self.config.max_size,
            hit_rate,
            memory_estimate_bytes,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            expirations: self.expirations,
            strategy: self.config.strategy,
        }
    }
}

fn estimate_entry_bytes<V: Serialize>(entry: &CacheEntry<V>) -> u64 {
    let value_len = serde_json::to_string(&entry.value)
        .map(|s| s.len())
        .unwrap_or(0);
    (entry.key.len() as u64) * 2 + (value_len as u64) * 2 + ENTRY_OVERHEAD_BYTES
}
