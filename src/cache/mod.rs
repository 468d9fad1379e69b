//! Cache Module
//!
//! Tiered in-memory image caching with per-bucket LRU eviction and
//! version-tagged bucket names.

mod bucket;
mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use bucket::{classify, is_image_path, BucketKind, BUCKET_PREFIX};
pub use entry::CachedImage;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::TieredStore;

// == Public Constants ==
/// Capacity applied to any bucket without an explicit limit
pub const DEFAULT_BUCKET_CAPACITY: usize = 100;
