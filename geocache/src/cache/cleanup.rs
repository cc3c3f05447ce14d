//! Periodic expiry sweeps.
//!
//! Caches never expire entries on their own. The host owns a
//! [`CleanupDaemon`], which wakes every `interval` and asks each registered
//! cache to drop entries older than `max_age`. Stopping the daemon is explicit
//! via [`CleanupDaemon::shutdown`].
//!
//! ```ignore
//! let data = ViewportCache::<Clusters>::new(100).into_shared();
//! let summary = ViewportCache::<Summary>::new(10).into_shared();
//!
//! let daemon = CleanupDaemon::spawn(
//!     &Handle::current(),
//!     vec![data.clone(), summary.clone()],
//!     Duration::from_secs(300),
//!     DEFAULT_MAX_AGE,
//! );
//!
//! // ...
//! daemon.shutdown().await;
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::store::ViewportCache;

/// Smallest sweep interval the daemon will use.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// A cache that can drop expired entries.
///
/// Lets one daemon sweep caches holding different value types.
pub trait ExpirySweep: Send + Sync {
    /// Remove entries older than `max_age`, returning how many were removed.
    fn sweep(&self, max_age: Duration) -> usize;
}

impl<T> ExpirySweep for Mutex<ViewportCache<T>>
where
    T: Clone + Send,
{
    fn sweep(&self, max_age: Duration) -> usize {
        self.lock().cleanup(max_age)
    }
}

/// Background task running expiry sweeps on a fixed interval.
pub struct CleanupDaemon {
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl CleanupDaemon {
    /// Start sweeping `targets` on the given runtime.
    ///
    /// The first sweep runs one `interval` after start.
    ///
    /// # Arguments
    ///
    /// * `runtime` - Runtime to spawn the sweep task on
    /// * `targets` - Caches to sweep
    /// * `interval` - Time between sweeps
    /// * `max_age` - Entries untouched for longer than this are removed
    pub fn spawn(
        runtime: &Handle,
        targets: Vec<Arc<dyn ExpirySweep>>,
        interval: Duration,
        max_age: Duration,
    ) -> Self {
        let shutdown = CancellationToken::new();
        let interval = interval.max(MIN_INTERVAL);

        info!(
            caches = targets.len(),
            interval_secs = interval.as_secs(),
            max_age_secs = max_age.as_secs(),
            "Cleanup daemon started"
        );

        let handle = runtime.spawn(run(targets, interval, max_age, shutdown.clone()));
        Self { shutdown, handle }
    }

    /// Returns `true` until the sweep task has exited.
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop the daemon and wait for the sweep task to exit.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Cleanup daemon task failed");
        }
        info!("Cleanup daemon stopped");
    }
}

async fn run(
    targets: Vec<Arc<dyn ExpirySweep>>,
    interval: Duration,
    max_age: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                let removed: usize = targets.iter().map(|t| t.sweep(max_age)).sum();
                if removed > 0 {
                    debug!(removed, "Cleanup sweep complete");
                }
            }
        }
    }
}
