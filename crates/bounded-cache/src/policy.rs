//! Eviction strategies

use crate::types::CacheEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Policy used to pick the single entry removed when the cache is full
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionStrategy {
    /// Least recently used
    #[default]
    Lru,
    /// Least frequently used, ties go to the oldest insertion
    Lfu,
    /// First inserted, access ignored
    Fifo,
}

impl EvictionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvictionStrategy::Lru => "lru",
            EvictionStrategy::Lfu => "lfu",
            EvictionStrategy::Fifo => "fifo",
        }
    }

    /// Choose the entry to evict, if any
    pub(crate) fn select_victim<'a, V: 'a>(
        self,
        entries: impl IntoIterator<Item = &'a CacheEntry<V>>,
    ) -> Option<&'a CacheEntry<V>> {
        let entries = entries.into_iter();
        match self {
            // Logical sequence, so wall-clock steps cannot reorder recency
            EvictionStrategy::Lru => entries.min_by_key(|e| e.access_seq),
            EvictionStrategy::Lfu => entries.min_by_key(|e| (e.access_count, e.insert_seq)),
            EvictionStrategy::Fifo => entries.min_by_key(|e| e.insert_seq),
        }
    }
}

impl fmt::Display for EvictionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown strategy name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStrategyError(pub String);

impl fmt::Display for ParseStrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown eviction strategy: {}", self.0)
    }
}

impl std::error::Error for ParseStrategyError {}

impl FromStr for EvictionStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(EvictionStrategy::Lru),
            "lfu" => Ok(EvictionStrategy::Lfu),
            "fifo" => Ok(EvictionStrategy::Fifo),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}
