//! geocache - Viewport-aware caching for geospatial query results
//!
//! Map clients issue the same expensive spatial queries again and again as a
//! user pans and zooms. This library caches those results in a bounded LRU
//! store keyed by quantized viewport bounds, and serves a result computed at
//! one zoom level for a request at another when the areas line up:
//!
//! - zooming out reuses finer data that overlaps the new view by more than half
//! - zooming in reuses coarser data whose area covers the new view
//!
//! # Modules
//!
//! - [`bounds`]: viewport bounds, zoom-aware quantization, area relations
//! - [`request`]: request parameters, cache keys, typed request descriptors
//! - [`cache`]: the LRU store, cached-fetch wrapper and expiry daemon
//! - [`config`]: cache settings and INI loading
//! - [`app`]: the standard data and summary cache pair with managed expiry

pub mod app;
pub mod bounds;
pub mod cache;
pub mod config;
pub mod request;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
