//! Application bootstrap and lifecycle management.
//!
//! [`CacheApp`] owns the two standard caches and the daemon that expires
//! their entries, so hosts get a correctly wired set with one call and stop
//! it with another.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        CacheApp                          │
//! │                                                          │
//! │  data cache (capacity 100) ─────┐                        │
//! │                                 ├──► CleanupDaemon       │
//! │  summary cache (capacity 10) ───┘    (sweep every 5 min, │
//! │                                       max age 5 min)     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use geocache::app::CacheApp;
//! use geocache::config::CacheConfig;
//!
//! let app: CacheApp<Clusters, Summary> = CacheApp::start(CacheConfig::default())?;
//!
//! let clusters = fetch_request(&app.data_cache(), &request, || backend.clusters()).await?;
//!
//! app.shutdown().await;
//! ```

mod bootstrap;
mod error;

pub use bootstrap::CacheApp;
pub use error::AppError;
