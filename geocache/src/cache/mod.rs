//! Viewport-aware result caching.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  cached_fetch / fetch_request                                │
//! │    lookup ──► ViewportCache::get ──► hit: return clone       │
//! │                    │                                         │
//! │                    ▼ miss                                    │
//! │               caller fetch ──► Err: returned, not cached     │
//! │                    │                                         │
//! │                    ▼ Ok                                      │
//! │               ViewportCache::set (may evict LRU entry)       │
//! └──────────────────────────────────────────────────────────────┘
//!
//!   CleanupDaemon ──(every interval)──► ExpirySweep::sweep(max_age)
//! ```
//!
//! [`ViewportCache`] is a synchronous store. Share it through a
//! [`SharedCache`] handle, which holds the lock only for single store calls.

mod cleanup;
mod entry;
mod fetch;
mod stats;
mod store;

pub use cleanup::{CleanupDaemon, ExpirySweep};
pub use entry::{CacheEntry, EntryMetadata, StandIn};
pub use fetch::{cached_fetch, fetch_request, SharedCache};
pub use stats::CacheStats;
pub use store::{ViewportCache, DEFAULT_MAX_AGE};
