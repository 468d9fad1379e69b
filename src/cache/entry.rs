//! Cache Entry Module
//!
//! Defines the structure for individual cached image responses.

use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;

// == Cached Image ==
/// A stored image response keyed by its request path.
///
/// Recency is not tracked here; it lives entirely in the owning bucket's
/// access order, refreshed every time the entry is served.
#[derive(Debug, Clone)]
pub struct CachedImage {
    /// The response body
    pub body: Bytes,
    /// The response Content-Type, if the origin reported one
    pub content_type: Option<String>,
    /// Storage timestamp (Unix milliseconds)
    pub stored_at: u64,
}

impl CachedImage {
    // == Constructor ==
    /// Creates a new entry from a fetched response body.
    pub fn new(body: Bytes, content_type: Option<String>) -> Self {
        Self {
            body,
            content_type,
            stored_at: current_timestamp_ms(),
        }
    }

    // == Size ==
    /// Body size in bytes.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
