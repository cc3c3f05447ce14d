//! Application bootstrap implementation.
//!
//! This module contains `CacheApp`, which builds the data and summary caches
//! and starts the cleanup daemon that sweeps them.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::info;

use super::error::AppError;
use crate::cache::{CleanupDaemon, ExpirySweep, SharedCache, ViewportCache};
use crate::config::CacheConfig;

/// The standard cache pair with managed expiry.
///
/// `D` is the value type of the viewport data cache and `S` that of the
/// summary cache. Both are swept by a single [`CleanupDaemon`] that runs
/// until [`shutdown`](Self::shutdown).
pub struct CacheApp<D, S> {
    /// Viewport, cluster and point query results.
    data_cache: SharedCache<D>,

    /// Aggregate summary results.
    summary_cache: SharedCache<S>,

    /// Expiry sweep over both caches.
    cleanup: CleanupDaemon,

    config: CacheConfig,
}

impl<D, S> CacheApp<D, S>
where
    D: Clone + Send + 'static,
    S: Clone + Send + 'static,
{
    /// Start the application on the current Tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `config` - Cache configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or no Tokio runtime
    /// is active on this thread.
    pub fn start(config: CacheConfig) -> Result<Self, AppError> {
        let runtime =
            Handle::try_current().map_err(|e| AppError::RuntimeUnavailable(e.to_string()))?;
        Self::start_on(config, &runtime)
    }

    /// Start the application with the cleanup daemon on the given runtime.
    ///
    /// Usable from threads outside the runtime.
    pub fn start_on(config: CacheConfig, runtime: &Handle) -> Result<Self, AppError> {
        config.validate()?;

        info!(
            data_capacity = config.data_capacity,
            summary_capacity = config.summary_capacity,
            "Starting geocache"
        );

        let data_cache = ViewportCache::new(config.data_capacity).into_shared();
        let summary_cache = ViewportCache::new(config.summary_capacity).into_shared();

        let targets: Vec<Arc<dyn ExpirySweep>> = vec![
            Arc::clone(&data_cache) as Arc<dyn ExpirySweep>,
            Arc::clone(&summary_cache) as Arc<dyn ExpirySweep>,
        ];
        let cleanup =
            CleanupDaemon::spawn(runtime, targets, config.cleanup_interval, config.max_age);

        Ok(Self {
            data_cache,
            summary_cache,
            cleanup,
            config,
        })
    }

    /// Handle to the viewport data cache.
    pub fn data_cache(&self) -> SharedCache<D> {
        Arc::clone(&self.data_cache)
    }

    /// Handle to the summary cache.
    pub fn summary_cache(&self) -> SharedCache<S> {
        Arc::clone(&self.summary_cache)
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns `true` while the cleanup daemon is active.
    pub fn is_running(&self) -> bool {
        self.cleanup.is_running()
    }

    /// Stop the cleanup daemon.
    ///
    /// Cache handles obtained earlier stay usable; their entries simply no
    /// longer expire.
    pub async fn shutdown(self) {
        info!("Shutting down geocache");
        self.cleanup.shutdown().await;
        info!("geocache shutdown complete");
    }
}
