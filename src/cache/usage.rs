//! Usage Module
//!
//! Per-key write counters plus engine-wide hit/miss/eviction statistics.

use std::collections::HashMap;

use serde::Serialize;

// == Usage Tracker ==
/// Counts writes per logical key.
///
/// Lives as long as the engine; not persisted.
#[derive(Debug, Default, Clone)]
pub struct UsageTracker {
    counts: HashMap<String, u64>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumps the counter for `key`.
    pub fn track(&mut self, key: &str) {
        *self.counts.entry(key.to_string()).or_insert(0) += 1;
    }

    /// Count for `key`, zero if never tracked.
    pub fn count(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }
}

// == Cache Stats ==
/// Engine performance counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads that found a record
    pub hits: u64,
    /// Reads of a missing key
    pub misses: u64,
    /// Keys removed to make room
    pub evictions: u64,
    /// Live records in the namespace
    pub total_entries: usize,
    /// Summed size of those records
    pub total_bytes: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns hits / (hits + misses), or 0.0 if nothing was read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untracked_key_is_zero() {
        let usage = UsageTracker::new();
        assert_eq!(usage.count("nothing"), 0);
    }

    #[test]
    fn test_track_increments_per_key() {
        let mut usage = UsageTracker::new();
        usage.track("a");
        usage.track("a");
        usage.track("b");

        assert_eq!(usage.count("a"), 2);
        assert_eq!(usage.count("b"), 1);
    }

    #[test]
    fn test_hit_rate_no_reads() {
        assert_eq!(CacheStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_eviction() {
        let mut stats = CacheStats::new();
        stats.record_eviction();
        stats.record_eviction();
        assert_eq!(stats.evictions, 2);
    }
}
