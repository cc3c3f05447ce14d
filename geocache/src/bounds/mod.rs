//! Geographic bounding boxes and the relations used for cache matching.
//!
//! Provides the [`ViewportBounds`] rectangle, zoom-dependent quantization for
//! cache keys, and the two predicates that decide whether a cached result at
//! one resolution can serve a request at another:
//!
//! - [`contains`]: one box fully encloses another
//! - [`overlaps_significantly`]: the shared area exceeds half of either box
//!
//! Areas are planar (latitude × longitude degrees).

mod quantize;
mod types;

pub use quantize::{precision_for_zoom, quantize, DEFAULT_PRECISION};
pub use types::{BoundsError, ViewportBounds};

/// Fraction of a box's area that must be shared for a significant overlap.
pub const OVERLAP_THRESHOLD: f64 = 0.5;

/// Returns `true` if `outer` fully encloses `inner` (edges may coincide).
#[inline]
pub fn contains(outer: &ViewportBounds, inner: &ViewportBounds) -> bool {
    outer.north() >= inner.north()
        && outer.south() <= inner.south()
        && outer.east() >= inner.east()
        && outer.west() <= inner.west()
}

/// Returns `true` if the intersection of `a` and `b` covers more than half
/// of the area of either box.
///
/// Boxes that are disjoint or only touch along an edge never overlap
/// significantly.
pub fn overlaps_significantly(a: &ViewportBounds, b: &ViewportBounds) -> bool {
    let Some(shared) = a.intersection(b) else {
        return false;
    };

    let shared_area = shared.area();
    let ratio_a = shared_area / a.area();
    let ratio_b = shared_area / b.area();

    ratio_a.max(ratio_b) > OVERLAP_THRESHOLD
}
