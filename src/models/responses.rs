//! Response DTOs for the proxy's JSON endpoints
//!
//! Defines the structure of the stats, health, and error response bodies.

use serde::Serialize;

use crate::cache::{BucketKind, CacheStats};

/// Entry count of one bucket, for the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct BucketUsage {
    /// The bucket kind
    pub bucket: BucketKind,
    /// Current entry count
    pub entries: usize,
    /// Configured maximum entry count
    pub capacity: usize,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of image requests served from cache
    pub hits: u64,
    /// Number of image requests fetched from the origin
    pub misses: u64,
    /// Number of entries evicted by capacity enforcement
    pub evictions: u64,
    /// Number of requests answered with the fallback image
    pub fallback_serves: u64,
    /// Current number of entries across all buckets
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Per-bucket usage for the current version
    pub buckets: Vec<BucketUsage>,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics and bucket sizes.
    pub fn new(stats: &CacheStats, sizes: Vec<(BucketKind, usize)>) -> Self {
        let buckets = sizes
            .into_iter()
            .map(|(bucket, entries)| BucketUsage {
                bucket,
                entries,
                capacity: bucket.capacity(),
            })
            .collect();

        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            fallback_serves: stats.fallback_serves,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            buckets,
        }
    }
}

/// Response body for the health endpoint (GET /healthz)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse.
    #[allow(dead_code)]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stats() -> CacheStats {
        let mut stats = CacheStats::new();
        for _ in 0..80 {
            stats.record_hit();
        }
        for _ in 0..20 {
            stats.record_miss();
        }
        stats.record_evictions(5);
        stats.set_total_entries(42);
        stats
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let resp = StatsResponse::new(&sample_stats(), vec![]);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.evictions, 5);
        assert_eq!(resp.total_entries, 42);
    }

    #[test]
    fn test_stats_response_buckets() {
        let sizes = vec![(BucketKind::Characters, 3), (BucketKind::Critical, 1)];
        let resp = StatsResponse::new(&CacheStats::new(), sizes);

        assert_eq!(resp.buckets.len(), 2);
        assert_eq!(resp.buckets[0].entries, 3);
        assert_eq!(resp.buckets[0].capacity, 50);

        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"characters\""));
        assert!(json.contains("\"capacity\":50"));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
