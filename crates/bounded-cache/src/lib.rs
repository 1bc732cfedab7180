//! Bounded in-memory cache with TTL expiration and pluggable eviction
//!
//! Provides a generic key/value cache with lazy TTL-based expiration,
//! a hard entry-count bound, and LRU, LFU or FIFO eviction. Operations
//! never fail: a miss is an ordinary outcome.

mod cache;
mod clock;
mod policy;
mod types;

pub use cache::BoundedCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use policy::{EvictionStrategy, ParseStrategyError};
pub use types::{CacheConfig, CacheEntry, CacheStats};
