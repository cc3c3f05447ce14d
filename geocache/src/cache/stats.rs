//! Diagnostic statistics for a viewport cache.

use std::fmt;

/// Point-in-time snapshot of a cache's contents and counters.
///
/// Diagnostic only; nothing in the cache depends on these values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries currently stored.
    pub size: usize,
    /// Maximum number of entries.
    pub capacity: usize,
    /// Keys ordered from least to most recently used.
    pub keys: Vec<String>,
    /// Exact-key hits.
    pub hits: u64,
    /// Hits served by an entry at another zoom level.
    pub hierarchical_hits: u64,
    /// Lookups that found nothing usable.
    pub misses: u64,
    /// Entries removed to make room for new keys.
    pub evictions: u64,
    /// Entries removed by expiry sweeps.
    pub expired: u64,
}

impl CacheStats {
    /// Total lookups served or missed.
    pub fn lookups(&self) -> u64 {
        self.hits + self.hierarchical_hits + self.misses
    }

    /// Fraction of lookups answered from the cache, 0.0 with no lookups.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            total => (self.hits + self.hierarchical_hits) as f64 / total as f64,
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} entries, {} hits ({} hierarchical), {} misses, {} evicted, {} expired",
            self.size,
            self.capacity,
            self.hits + self.hierarchical_hits,
            self.hierarchical_hits,
            self.misses,
            self.evictions,
            self.expired
        )
    }
}
