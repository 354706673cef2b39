//! Cache of URLs whose preload has already verified.
//!
//! Resolved URLs are deterministic, so a URL that verified once will verify
//! again: the bytes are immutable thumbnails keyed by their full option set.
//! Remembering verified URLs lets a re-resolution that lands on the same URL
//! (same box after a resize bounce, remount of the same source) commit
//! immediately instead of refetching.

use lru::LruCache;
use tokio::sync::RwLock;

/// Default number of verified URLs to remember.
pub const DEFAULT_PRELOAD_CACHE_CAPACITY: usize = 256;

/// LRU set of URLs whose backing image has been fetched and verified.
///
/// Thread-safe; shared by all in-flight passes of a loader instance.
pub struct PreloadCache {
    /// Verified URLs. The value is unit; only membership matters.
    cache: RwLock<LruCache<String, ()>>,
}

impl PreloadCache {
    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_PRELOAD_CACHE_CAPACITY)
    }

    /// Create a cache holding at most `capacity` URLs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: RwLock::new(LruCache::new(
                std::num::NonZeroUsize::new(capacity.max(1)).unwrap(),
            )),
        }
    }

    /// Whether `url` has previously verified.
    pub async fn contains(&self, url: &str) -> bool {
        let cache = self.cache.read().await;
        cache.peek(url).is_some()
    }

    /// Record `url` as verified.
    pub async fn insert(&self, url: String) {
        let mut cache = self.cache.write().await;
        cache.put(url, ());
    }

    /// Number of remembered URLs.
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.len()
    }

    /// Whether no URLs are remembered.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for PreloadCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
