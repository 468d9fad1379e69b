//! Tiered Store Module
//!
//! The cache engine: version-tagged buckets, each pairing a key-value map
//! with an LRU tracker, plus capacity enforcement and activation-time
//! cleanup of stale-version buckets.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::cache::{BucketKind, CacheStats, CachedImage, LruTracker};

// == Bucket ==
/// One named, capacity-limited cache partition.
#[derive(Debug)]
pub struct Bucket {
    /// Stored responses keyed by request path
    entries: HashMap<String, CachedImage>,
    /// Access order for eviction
    lru: LruTracker,
    /// Maximum entry count, enforced after insertions
    capacity: usize,
}

impl Bucket {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            capacity,
        }
    }

    /// Looks up an entry, refreshing its recency on hit.
    fn lookup(&mut self, key: &str) -> Option<CachedImage> {
        let entry = self.entries.get(key).cloned()?;
        // Re-insertion at the front is what makes the eviction order LRU
        self.lru.touch(key);
        Some(entry)
    }

    /// Looks up an entry without touching its recency.
    fn peek(&self, key: &str) -> Option<&CachedImage> {
        self.entries.get(key)
    }

    /// Inserts or overwrites an entry; the key becomes most recently used.
    ///
    /// Insertion never evicts by itself. Capacity is restored by a separate
    /// [`Bucket::enforce_capacity`] pass, so a bucket may sit transiently
    /// over its limit between the two steps.
    fn insert(&mut self, key: String, image: CachedImage) {
        self.lru.touch(&key);
        self.entries.insert(key, image);
    }

    /// Evicts oldest entries until the bucket is back within capacity.
    ///
    /// Returns the number of entries removed.
    fn enforce_capacity(&mut self) -> usize {
        let excess = self.entries.len().saturating_sub(self.capacity);
        for _ in 0..excess {
            if let Some(oldest) = self.lru.evict_oldest() {
                self.entries.remove(&oldest);
            }
        }
        excess
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

// == Tiered Store ==
/// The full set of buckets for one deployed cache version.
///
/// Buckets are opened lazily on first use under their version-tagged name.
/// Only names belonging to the current version are valid; anything else is
/// garbage collected by [`TieredStore::purge_stale_buckets`] at activation.
#[derive(Debug)]
pub struct TieredStore {
    /// Buckets keyed by versioned name
    buckets: HashMap<String, Bucket>,
    /// Aggregate performance counters
    stats: CacheStats,
    /// Current deployment version tag
    version: String,
}

impl TieredStore {
    // == Constructor ==
    /// Creates an empty store for the given version tag.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            buckets: HashMap::new(),
            stats: CacheStats::new(),
            version: version.into(),
        }
    }

    /// The version tag this store considers current.
    pub fn version(&self) -> &str {
        &self.version
    }

    // == Open ==
    /// Opens (creating if absent) the bucket for a kind under the current
    /// version.
    fn open(&mut self, kind: BucketKind) -> &mut Bucket {
        let name = kind.versioned_name(&self.version);
        self.buckets
            .entry(name)
            .or_insert_with(|| Bucket::new(kind.capacity()))
    }

    /// Opens a bucket under an explicit storage name.
    ///
    /// Exists so activation cleanup can be exercised against buckets left
    /// behind by earlier versions.
    pub fn open_named(&mut self, name: impl Into<String>, capacity: usize) -> &mut Bucket {
        self.buckets
            .entry(name.into())
            .or_insert_with(|| Bucket::new(capacity))
    }

    /// Stores an entry into an explicitly named bucket.
    pub fn seed_named(&mut self, name: impl Into<String>, key: String, image: CachedImage) {
        self.open_named(name, crate::cache::DEFAULT_BUCKET_CAPACITY)
            .insert(key, image);
        let total = self.len();
        self.stats.set_total_entries(total);
    }

    // == Lookup ==
    /// Retrieves a cached response, counting a hit or miss and refreshing
    /// recency on hit.
    pub fn lookup(&mut self, kind: BucketKind, key: &str) -> Option<CachedImage> {
        match self.open(kind).lookup(key) {
            Some(entry) => {
                self.stats.record_hit();
                debug!(bucket = %kind, key, "cache hit");
                Some(entry)
            }
            None => {
                self.stats.record_miss();
                debug!(bucket = %kind, key, "cache miss");
                None
            }
        }
    }

    /// Retrieves a cached response without counting or touching.
    pub fn peek(&self, kind: BucketKind, key: &str) -> Option<&CachedImage> {
        let name = kind.versioned_name(&self.version);
        self.buckets.get(&name).and_then(|b| b.peek(key))
    }

    // == Insert ==
    /// Stores a response into the bucket for a kind.
    pub fn insert(&mut self, kind: BucketKind, key: String, image: CachedImage) {
        self.open(kind).insert(key, image);
        let total = self.len();
        self.stats.set_total_entries(total);
    }

    // == Enforce Capacity ==
    /// Evicts oldest entries from a bucket until it is within capacity.
    ///
    /// Returns the number of evictions. Called after the insertion path;
    /// between the insert and this pass the bucket may transiently exceed
    /// its limit.
    pub fn enforce_capacity(&mut self, kind: BucketKind) -> usize {
        let evicted = self.open(kind).enforce_capacity();
        if evicted > 0 {
            self.stats.record_evictions(evicted as u64);
            info!(bucket = %kind, evicted, "trimmed bucket to capacity");
        }
        let total = self.len();
        self.stats.set_total_entries(total);
        evicted
    }

    // == Fallback ==
    /// Serves an entry from the fallback bucket, counting the serve.
    ///
    /// The fallback read does not refresh recency; the bucket is preloaded
    /// once at install and never contends for capacity in practice.
    pub fn serve_fallback(&mut self, key: &str) -> Option<CachedImage> {
        let entry = self.peek(BucketKind::Fallback, key).cloned();
        if entry.is_some() {
            self.stats.record_fallback();
        }
        entry
    }

    // == Bucket Inspection ==
    /// All bucket names currently present in storage, valid or stale.
    pub fn bucket_names(&self) -> Vec<String> {
        self.buckets.keys().cloned().collect()
    }

    /// Entry count of the bucket for a kind (0 if never opened).
    pub fn bucket_len(&self, kind: BucketKind) -> usize {
        let name = kind.versioned_name(&self.version);
        self.buckets.get(&name).map_or(0, Bucket::len)
    }

    /// Per-kind entry counts for the current version's buckets.
    pub fn bucket_sizes(&self) -> Vec<(BucketKind, usize)> {
        BucketKind::ALL
            .iter()
            .map(|&kind| (kind, self.bucket_len(kind)))
            .collect()
    }

    // == Activation Cleanup ==
    /// Deletes every bucket whose name is not valid for the current
    /// version. Returns the deleted names.
    pub fn purge_stale_buckets(&mut self) -> Vec<String> {
        let valid = BucketKind::valid_names(&self.version);
        let stale: Vec<String> = self
            .buckets
            .keys()
            .filter(|name| !valid.contains(name))
            .cloned()
            .collect();

        for name in &stale {
            self.buckets.remove(name);
            info!(bucket = %name, "deleted stale cache bucket");
        }

        let total = self.len();
        self.stats.set_total_entries(total);
        stale
    }

    // == Length ==
    /// Total entry count across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Bucket::len).sum()
    }

    /// Returns true if no bucket holds any entry.
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.len());
        stats
    }
}
