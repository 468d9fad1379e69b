//! Bucket Definitions Module
//!
//! Defines the named cache buckets, their capacity limits, and the URL
//! classification rules that route an image request into a bucket.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::cache::DEFAULT_BUCKET_CAPACITY;

/// Name prefix shared by every bucket this proxy owns.
pub const BUCKET_PREFIX: &str = "tiercache";

/// Matches URLs of tier 3 (background) assets.
static BACKGROUNDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(cafe|backgrounds)/").unwrap());

/// Matches request paths for cacheable image assets by extension.
static IMAGE_EXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(png|jpg|jpeg|svg|gif|webp)$").unwrap());

// == Bucket Kind ==
/// The fixed set of cache buckets, one per asset tier.
///
/// Each kind maps to a version-tagged storage name; the five names for the
/// current version form the valid set used at activation-time cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BucketKind {
    /// Icons, logos, and any unclassified image (the catch-all)
    Critical,
    /// Character artwork
    Characters,
    /// Scene backgrounds (cafe and backgrounds paths)
    Backgrounds,
    /// Visual aid illustrations
    VisualAids,
    /// The preloaded fallback assets
    Fallback,
}

impl BucketKind {
    /// All bucket kinds, in declaration order.
    pub const ALL: [BucketKind; 5] = [
        BucketKind::Critical,
        BucketKind::Characters,
        BucketKind::Backgrounds,
        BucketKind::VisualAids,
        BucketKind::Fallback,
    ];

    // == Capacity ==
    /// Maximum entry count for this bucket.
    ///
    /// Unlisted kinds (currently only Fallback) use the default limit.
    pub fn capacity(&self) -> usize {
        match self {
            BucketKind::Critical => 20,
            BucketKind::Characters => 50,
            BucketKind::Backgrounds => 20,
            BucketKind::VisualAids => 50,
            BucketKind::Fallback => DEFAULT_BUCKET_CAPACITY,
        }
    }

    // == Slug ==
    /// Short lowercase name used inside storage names.
    pub fn slug(&self) -> &'static str {
        match self {
            BucketKind::Critical => "critical",
            BucketKind::Characters => "characters",
            BucketKind::Backgrounds => "backgrounds",
            BucketKind::VisualAids => "visual-aids",
            BucketKind::Fallback => "fallback",
        }
    }

    // == Versioned Name ==
    /// Full storage name for this bucket under the given version tag.
    ///
    /// Bucket names double as the migration mechanism: bumping the version
    /// tag changes every name, and activation deletes buckets whose name is
    /// no longer in the valid set.
    pub fn versioned_name(&self, version: &str) -> String {
        format!("{}-{}-{}", BUCKET_PREFIX, self.slug(), version)
    }

    /// The complete set of valid bucket names for a version tag.
    pub fn valid_names(version: &str) -> Vec<String> {
        Self::ALL.iter().map(|k| k.versioned_name(version)).collect()
    }
}

impl fmt::Display for BucketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

// == Classification ==
/// Determines which bucket an image URL belongs to.
///
/// Patterns are checked in fixed priority order; the first match wins.
/// Anything unmatched lands in Critical, the catch-all for icons, logos,
/// and other unclassified images. Fallback is never a classification
/// target; it is only written by the install-time preload.
pub fn classify(url: &str) -> BucketKind {
    if url.contains("/characters/") {
        BucketKind::Characters
    } else if url.contains("/visual-aids/") {
        BucketKind::VisualAids
    } else if BACKGROUNDS_RE.is_match(url) {
        BucketKind::Backgrounds
    } else {
        BucketKind::Critical
    }
}

// == Image Path Check ==
/// Returns true if the path names an image asset by file extension.
///
/// Query strings must be stripped by the caller; this matches on the path
/// component only.
pub fn is_image_path(path: &str) -> bool {
    IMAGE_EXT_RE.is_match(path)
}
