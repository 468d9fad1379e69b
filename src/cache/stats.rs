//! Cache Statistics Module
//!
//! Tracks proxy cache metrics: hits, misses, evictions, and fallback serves.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics across all buckets.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of image requests served from a bucket
    pub hits: u64,
    /// Number of image requests that went to the origin
    pub misses: u64,
    /// Number of entries evicted by capacity enforcement
    pub evictions: u64,
    /// Number of requests answered with the fallback image
    pub fallback_serves: u64,
    /// Current number of entries across all buckets
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no image requests have
    /// been intercepted yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Adds to the eviction counter.
    pub fn record_evictions(&mut self, count: u64) {
        self.evictions += count;
    }

    // == Record Fallback ==
    /// Increments the fallback-serve counter.
    pub fn record_fallback(&mut self) {
        self.fallback_serves += 1;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.fallback_serves, 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.5);

        stats.record_hit();
        stats.record_hit();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_evictions_batch() {
        let mut stats = CacheStats::new();
        stats.record_evictions(3);
        stats.record_evictions(1);
        assert_eq!(stats.evictions, 4);
    }

    #[test]
    fn test_record_fallback() {
        let mut stats = CacheStats::new();
        stats.record_fallback();
        stats.record_fallback();
        assert_eq!(stats.fallback_serves, 2);
    }

    #[test]
    fn test_set_total_entries() {
        let mut stats = CacheStats::new();
        stats.set_total_entries(42);
        assert_eq!(stats.total_entries, 42);
    }
}
