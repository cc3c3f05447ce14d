//! Get-or-populate wrapper around a caller-supplied fetch.
//!
//! [`cached_fetch`] consults the cache, and only on a miss awaits the fetch
//! future and stores its result. The cache lock is held for the lookup and
//! for the insert, never across the fetch itself, so other requests proceed
//! while a fetch is pending.
//!
//! A failed fetch is returned to the caller unchanged and nothing is cached;
//! the next identical call fetches again. Concurrent misses for the same key
//! each run their own fetch.
//!
//! # Example
//!
//! ```ignore
//! use geocache::cache::{cached_fetch, ViewportCache};
//! use geocache::request::RequestParams;
//!
//! let cache = ViewportCache::new(100).into_shared();
//! let params = RequestParams::new().with_bounds(bounds).with_zoom_level(8);
//!
//! let clusters = cached_fetch(&cache, "viewport_clusters", &params, || async {
//!     backend.clusters(8, &bounds).await
//! })
//! .await?;
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{instrument, trace, warn};

use crate::cache::store::ViewportCache;
use crate::request::{CacheRequest, RequestParams};

/// A viewport cache shared between tasks.
pub type SharedCache<T> = Arc<Mutex<ViewportCache<T>>>;

/// Return the cached value for a request, fetching and caching it on a miss.
///
/// # Arguments
///
/// * `cache` - The cache to consult and populate
/// * `method` - Method name of the request
/// * `params` - Request parameters
/// * `fetch` - Produces the value when the cache cannot
///
/// # Errors
///
/// Returns the fetch error verbatim. Errors are never cached.
#[instrument(level = "debug", skip_all, fields(method = %method))]
pub async fn cached_fetch<T, E, F, Fut>(
    cache: &Mutex<ViewportCache<T>>,
    method: &str,
    params: &RequestParams,
    fetch: F,
) -> Result<T, E>
where
    T: Clone,
    E: fmt::Display,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let cached = cache.lock().get(method, params);
    if let Some(value) = cached {
        return Ok(value);
    }

    trace!("Fetching on cache miss");
    let value = fetch().await.map_err(|e| {
        warn!(error = %e, "Fetch failed, result not cached");
        e
    })?;

    cache.lock().set(method, params, value.clone());
    Ok(value)
}

/// [`cached_fetch`] driven by a typed request descriptor.
pub async fn fetch_request<R, T, E, F, Fut>(
    cache: &Mutex<ViewportCache<T>>,
    request: &R,
    fetch: F,
) -> Result<T, E>
where
    R: CacheRequest,
    T: Clone,
    E: fmt::Display,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    cached_fetch(cache, R::METHOD, &request.params(), fetch).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::bounds::ViewportBounds;
    use crate::request::{SummaryRequest, ViewportClustersRequest};

    fn bounds(n: f64, s: f64, e: f64, w: f64) -> ViewportBounds {
        ViewportBounds::new(n, s, e, w).unwrap()
    }

    fn viewport(b: ViewportBounds, zoom: u8) -> RequestParams {
        RequestParams::new().with_bounds(b).with_zoom_level(zoom)
    }

    #[tokio::test]
    async fn test_miss_fetches_and_caches() {
        let cache = ViewportCache::new(10).into_shared();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let params = RequestParams::new().with("limit", 1000u32);

        for _ in 0..3 {
            let value = cached_fetch(&cache, "points", &params, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(vec![1, 2, 3])
            })
            .await
            .unwrap();
            assert_eq!(value, vec![1, 2, 3]);
        }

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(cache.lock().stats().hits, 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_cached() {
        let cache: SharedCache<u32> = ViewportCache::new(10).into_shared();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let params = RequestParams::new().with("limit", 10u32);

        let first = cached_fetch(&cache, "points", &params, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<u32, _>("backend unavailable".to_string())
        })
        .await;
        assert_eq!(first, Err("backend unavailable".to_string()));
        assert!(cache.lock().is_empty());

        let second = cached_fetch(&cache, "points", &params, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(7)
        })
        .await;
        assert_eq!(second, Ok(7));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_repeated_failures_retry_every_time() {
        let cache: SharedCache<u32> = ViewportCache::new(10).into_shared();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        for _ in 0..3 {
            let result =
                cached_fetch(&cache, "summary", &RequestParams::new(), move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, _>("timeout")
                })
                .await;
            assert!(result.is_err());
        }

        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_disjoint_viewport_triggers_fetch() {
        let cache = ViewportCache::new(10).into_shared();
        cache
            .lock()
            .set("clusters", &viewport(bounds(51.6, 51.4, -0.05, -0.25), 14), "london");

        let sydney = viewport(bounds(-33.8, -34.0, 151.3, 151.1), 8);
        let value = cached_fetch(&cache, "clusters", &sydney, || async {
            Ok::<_, String>("sydney")
        })
        .await
        .unwrap();

        assert_eq!(value, "sydney");
        assert_eq!(cache.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_hierarchical_hit_skips_fetch() {
        let cache = ViewportCache::new(10).into_shared();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let zoomed_in = ViewportClustersRequest::new(14, bounds(51.6, 51.4, -0.05, -0.25));
        let zoomed_out = ViewportClustersRequest::new(8, bounds(52.0, 51.0, 0.0, -1.0));

        fetch_request(&cache, &zoomed_in, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>("zoom-14")
        })
        .await
        .unwrap();

        let value = fetch_request(&cache, &zoomed_out, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>("zoom-8")
        })
        .await
        .unwrap();

        assert_eq!(value, "zoom-14");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        // The stand-in is served, not re-keyed under the zoom-8 request.
        assert_eq!(cache.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_request_uses_descriptor_method() {
        let cache = ViewportCache::new(10).into_shared();

        fetch_request(&cache, &SummaryRequest::default(), || async {
            Ok::<_, String>(42u64)
        })
        .await
        .unwrap();

        assert!(cache.lock().contains("summary", &RequestParams::new()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_lock_not_held_during_fetch() {
        let cache = ViewportCache::new(10).into_shared();
        let slow_params = RequestParams::new().with("name", "slow");

        let slow_cache = Arc::clone(&cache);
        let slow = tokio::spawn(async move {
            cached_fetch(&slow_cache, "points", &slow_params, || async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok::<_, String>(1u32)
            })
            .await
        });

        // Let the slow fetch start, then use the cache while it is pending.
        tokio::task::yield_now().await;
        let fast = cached_fetch(
            &cache,
            "points",
            &RequestParams::new().with("name", "fast"),
            || async { Ok::<_, String>(2u32) },
        )
        .await;
        assert_eq!(fast, Ok(2));
        assert_eq!(cache.lock().len(), 1);

        assert_eq!(slow.await.unwrap(), Ok(1));
        assert_eq!(cache.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_each_fetch() {
        let cache: SharedCache<u32> = ViewportCache::new(10).into_shared();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();

        for _ in 0..2 {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                let params = RequestParams::new().with("name", "same");
                cached_fetch(&cache, "points", &params, move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::task::yield_now().await;
                    Ok::<_, String>(5)
                })
                .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Ok(5));
        }
        // Both tasks may observe the miss before either populates the cache.
        let calls = calls.load(Ordering::SeqCst);
        assert!((1..=2).contains(&calls));
        assert_eq!(cache.lock().len(), 1);
    }
}
