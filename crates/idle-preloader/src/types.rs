//! Preloader configuration and reporting types

use serde::{Deserialize, Serialize};

const DEFAULT_HISTORY_CAPACITY: usize = 10;
const DEFAULT_TOP_N: usize = 3;

/// Configuration for the predictive preloader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreloaderConfig {
    /// Number of recent interactions kept for frequency ranking
    pub history_capacity: usize,
    /// How many top-ranked routes are queued after each interaction
    pub top_n: usize,
}

impl Default for PreloaderConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl PreloaderConfig {
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}

/// Outcome of one drain of the preload queue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreloadReport {
    pub loaded: Vec<String>,
    pub failed: Vec<String>,
}

impl PreloadReport {
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty() && self.failed.is_empty()
    }
}

/// Point-in-time preloader statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreloaderStats {
    pub queued: usize,
    pub loaded: usize,
    pub failed: u64,
    pub history_len: usize,
}
