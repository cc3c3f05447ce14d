//! Bounded LRU store with hierarchical viewport lookup.
//!
//! [`ViewportCache`] maps cache keys to values in recency order. Exact key
//! lookups behave like any LRU cache. When an exact lookup misses and the
//! request carries both bounds and a zoom level, the store scans its entries
//! for a result computed at another zoom level that can stand in:
//!
//! ```text
//!  request (zoom 8) ──► exact key? ──► hit ──────────────────────► value
//!                            │
//!                            ▼ miss
//!                 scan same-method entries, MRU first
//!                   zoom > 8 and overlap > 50%   ──► zoom-out hit
//!                   zoom < 8 and covers request  ──► zoom-in hit
//!                            │
//!                            ▼ nothing usable
//!                          None
//! ```
//!
//! The first qualifying entry wins; there is no ranking by overlap quality.
//! Any hit moves the entry to the most-recently-used position and refreshes
//! its timestamp.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use lru::LruCache;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::bounds::ViewportBounds;
use crate::cache::entry::{CacheEntry, EntryMetadata};
use crate::cache::fetch::SharedCache;
use crate::cache::stats::CacheStats;
use crate::request::{CacheKey, RequestParams};

/// Default age after which an untouched entry is removed by a sweep.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Default)]
struct Counters {
    hits: u64,
    hierarchical_hits: u64,
    misses: u64,
    evictions: u64,
    expired: u64,
}

/// A fixed-capacity, recency-ordered cache of geospatial query results.
///
/// All operations take `&mut self` and complete without suspending. Share an
/// instance between tasks with [`ViewportCache::into_shared`].
pub struct ViewportCache<T> {
    entries: LruCache<CacheKey, CacheEntry<T>>,
    counters: Counters,
}

impl<T: Clone> ViewportCache<T> {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            counters: Counters::default(),
        }
    }

    /// Wrap the cache for shared use across tasks.
    pub fn into_shared(self) -> SharedCache<T> {
        Arc::new(Mutex::new(self))
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if an exact entry exists, without touching it.
    pub fn contains(&self, method: &str, params: &RequestParams) -> bool {
        self.entries.contains(&params.cache_key(method))
    }

    /// Look up a value for a request.
    ///
    /// Tries the exact key first. On a miss, requests carrying bounds and a
    /// zoom level fall back to a hierarchical search across zoom levels.
    pub fn get(&mut self, method: &str, params: &RequestParams) -> Option<T> {
        let key = params.cache_key(method);

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.touch();
            self.counters.hits += 1;
            trace!(key = %key, "Cache hit");
            return Some(entry.value().clone());
        }

        let found = match params.viewport() {
            Some((bounds, zoom)) => self.find_hierarchical(method, bounds, zoom),
            None => None,
        };

        if found.is_none() {
            self.counters.misses += 1;
            trace!(key = %key, "Cache miss");
        }
        found
    }

    /// Scan same-method entries, most recently used first, for one at
    /// another zoom level that can serve `target`.
    fn find_hierarchical(
        &mut self,
        method: &str,
        target: &ViewportBounds,
        target_zoom: u8,
    ) -> Option<T> {
        let (key, stand_in) = self.entries.iter().find_map(|(key, entry)| {
            if entry.method() != method {
                return None;
            }
            let stand_in = entry
                .metadata()?
                .stand_in_for(target, target_zoom)?;
            Some((key.clone(), stand_in))
        })?;

        let entry = self.entries.get_mut(&key)?;
        entry.touch();
        self.counters.hierarchical_hits += 1;
        debug!(
            key = %key,
            ?stand_in,
            target_zoom,
            cached_zoom = ?entry.metadata().and_then(|m| m.zoom_level),
            "Hierarchical cache hit"
        );
        Some(entry.value().clone())
    }

    /// Store a value for a request.
    ///
    /// Inserting a new key into a full cache evicts the least recently used
    /// entry first. Overwriting an existing key never evicts.
    pub fn set(&mut self, method: &str, params: &RequestParams, value: T) {
        let key = params.cache_key(method);
        let entry = CacheEntry::new(method, value, EntryMetadata::from_params(params));

        if let Some((evicted, _)) = self.entries.push(key.clone(), entry) {
            if evicted != key {
                self.counters.evictions += 1;
                debug!(evicted = %evicted, inserted = %key, "Evicted least recently used entry");
            }
        }
    }

    /// Remove every entry untouched for longer than `max_age`.
    ///
    /// # Returns
    ///
    /// The number of entries removed.
    pub fn cleanup(&mut self, max_age: Duration) -> usize {
        let now = Instant::now();
        let expired: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, max_age))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.pop(key);
        }

        let removed = expired.len();
        if removed > 0 {
            self.counters.expired += removed as u64;
            debug!(
                removed,
                remaining = self.entries.len(),
                max_age_secs = max_age.as_secs(),
                "Expired cache entries"
            );
        }
        removed
    }

    /// [`cleanup`](Self::cleanup) with [`DEFAULT_MAX_AGE`].
    pub fn cleanup_default(&mut self) -> usize {
        self.cleanup(DEFAULT_MAX_AGE)
    }

    /// Remove all entries. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Snapshot of size, capacity, keys and counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            capacity: self.capacity(),
            keys: self
                .entries
                .iter()
                .rev()
                .map(|(key, _)| key.to_string())
                .collect(),
            hits: self.counters.hits,
            hierarchical_hits: self.counters.hierarchical_hits,
            misses: self.counters.misses,
            evictions: self.counters.evictions,
            expired: self.counters.expired,
        }
    }
}
