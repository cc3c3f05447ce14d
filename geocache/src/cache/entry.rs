//! Cache entries and the metadata used for hierarchical matching.

use std::time::Duration;

use tokio::time::Instant;

use crate::bounds::{contains, overlaps_significantly, ViewportBounds};
use crate::request::RequestParams;

/// How a cached entry at another zoom level can serve a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandIn {
    /// Finer (higher zoom) data overlapping the requested area by more
    /// than half, used to approximate a coarser request.
    ZoomOut,
    /// Coarser (lower zoom) data whose area fully covers the request.
    ZoomIn,
}

/// Viewport information recorded alongside an entry.
///
/// Holds the original, unquantized bounds so that matching reasons about the
/// true geographic area rather than the coarser key grid.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryMetadata {
    pub bounds: ViewportBounds,
    pub zoom_level: Option<u8>,
    pub time: Option<String>,
}

impl EntryMetadata {
    /// Capture metadata from request parameters.
    ///
    /// Returns `None` when the request carries no bounds.
    pub fn from_params(params: &RequestParams) -> Option<Self> {
        Some(Self {
            bounds: *params.bounds()?,
            zoom_level: params.zoom_level(),
            time: params.time().map(str::to_string),
        })
    }

    /// Decide whether this entry can stand in for a request at another zoom.
    ///
    /// Entries without a zoom level or at the same zoom level never match.
    /// The recorded time plays no part in matching.
    pub fn stand_in_for(&self, target: &ViewportBounds, target_zoom: u8) -> Option<StandIn> {
        let zoom = self.zoom_level?;

        if zoom > target_zoom && overlaps_significantly(target, &self.bounds) {
            Some(StandIn::ZoomOut)
        } else if zoom < target_zoom && contains(&self.bounds, target) {
            Some(StandIn::ZoomIn)
        } else {
            None
        }
    }
}

/// A cached value with its method, last-touch time and optional metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    method: String,
    value: T,
    timestamp: Instant,
    metadata: Option<EntryMetadata>,
}

impl<T> CacheEntry<T> {
    /// Create an entry stamped with the current time.
    pub fn new(method: impl Into<String>, value: T, metadata: Option<EntryMetadata>) -> Self {
        Self {
            method: method.into(),
            value,
            timestamp: Instant::now(),
            metadata,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    pub fn metadata(&self) -> Option<&EntryMetadata> {
        self.metadata.as_ref()
    }

    /// Refresh the timestamp to now.
    pub fn touch(&mut self) {
        self.timestamp = Instant::now();
    }

    /// Returns `true` if the entry is strictly older than `max_age` at `now`.
    pub fn is_expired(&self, now: Instant, max_age: Duration) -> bool {
        now.saturating_duration_since(self.timestamp) > max_age
    }
}
