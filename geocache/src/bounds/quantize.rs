//! Zoom-dependent quantization of bounding boxes.
//!
//! Nearby viewports rarely repeat exactly, so bounds are snapped to a decimal
//! grid before they become part of a cache key. Coarse zoom levels use large
//! buckets so that many requests collapse onto one entry; fine zoom levels use
//! small buckets so that distinct viewports stay distinct.
//!
//! Rounding is always outward (ceil on the north/east edges, floor on the
//! south/west edges), so a quantized box never loses area.

use super::types::ViewportBounds;

/// Decimal precision used when no zoom level accompanies the bounds.
pub const DEFAULT_PRECISION: u32 = 3;

/// Decimal precision of the quantization grid for a zoom level.
///
/// | zoom        | precision |
/// |-------------|-----------|
/// | none        | 3         |
/// | 0 – 5       | 2         |
/// | 6 – 10      | 3         |
/// | 11 – 15     | 4         |
/// | 16 and up   | 5         |
#[inline]
pub fn precision_for_zoom(zoom_level: Option<u8>) -> u32 {
    match zoom_level {
        None => DEFAULT_PRECISION,
        Some(0..=5) => 2,
        Some(6..=10) => 3,
        Some(11..=15) => 4,
        Some(_) => 5,
    }
}

/// Snap a bounding box outward onto the grid for `zoom_level`.
///
/// # Arguments
///
/// * `bounds` - The original viewport bounds
/// * `zoom_level` - Optional zoom level selecting the grid precision
///
/// # Returns
///
/// A box that fully contains `bounds`. Identical inputs always produce
/// identical output.
pub fn quantize(bounds: &ViewportBounds, zoom_level: Option<u8>) -> ViewportBounds {
    let factor = 10f64.powi(precision_for_zoom(zoom_level) as i32);

    let north = round_up(bounds.north(), factor);
    let south = round_down(bounds.south(), factor);
    let east = round_up(bounds.east(), factor);
    let west = round_down(bounds.west(), factor);

    // Outward rounding preserves north ≥ south and east ≥ west, and the
    // scaled values stay finite for any valid geographic input.
    ViewportBounds::new(north, south, east, west).unwrap_or(*bounds)
}

/// `ceil(value·factor)/factor`, stepping one cell further if the product
/// rounded below the true value.
fn round_up(value: f64, factor: f64) -> f64 {
    let cell = (value * factor).ceil();
    let snapped = cell / factor;
    if snapped < value {
        (cell + 1.0) / factor
    } else {
        snapped
    }
}

/// `floor(value·factor)/factor`, stepping one cell further if the product
/// rounded above the true value.
fn round_down(value: f64, factor: f64) -> f64 {
    let cell = (value * factor).floor();
    let snapped = cell / factor;
    if snapped > value {
        (cell - 1.0) / factor
    } else {
        snapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::contains;

    fn bounds(n: f64, s: f64, e: f64, w: f64) -> ViewportBounds {
        ViewportBounds::new(n, s, e, w).unwrap()
    }

    #[test]
    fn test_precision_table() {
        assert_eq!(precision_for_zoom(None), 3);
        assert_eq!(precision_for_zoom(Some(0)), 2);
        assert_eq!(precision_for_zoom(Some(5)), 2);
        assert_eq!(precision_for_zoom(Some(6)), 3);
        assert_eq!(precision_for_zoom(Some(10)), 3);
        assert_eq!(precision_for_zoom(Some(11)), 4);
        assert_eq!(precision_for_zoom(Some(15)), 4);
        assert_eq!(precision_for_zoom(Some(16)), 5);
        assert_eq!(precision_for_zoom(Some(22)), 5);
    }

    #[test]
    fn test_quantize_rounds_outward_at_low_zoom() {
        let q = quantize(&bounds(51.5071, 51.4929, -0.1211, -0.1335), Some(4));

        assert_eq!(q.north(), 51.51);
        assert_eq!(q.south(), 51.49);
        assert_eq!(q.east(), -0.12);
        assert_eq!(q.west(), -0.14);
    }

    #[test]
    fn test_quantize_without_zoom_uses_three_decimals() {
        let q = quantize(&bounds(10.12345, 10.00001, 20.5555, 20.1111), None);

        assert_eq!(q.north(), 10.124);
        assert_eq!(q.south(), 10.0);
        assert_eq!(q.east(), 20.556);
        assert_eq!(q.west(), 20.111);
    }

    #[test]
    fn test_nearby_viewports_share_a_bucket() {
        let a = quantize(&bounds(51.501, 51.402, -0.051, -0.249), Some(5));
        let b = quantize(&bounds(51.503, 51.404, -0.053, -0.247), Some(5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_fine_zoom_keeps_viewports_apart() {
        let a = quantize(&bounds(51.50012, 51.40012, -0.05012, -0.25012), Some(17));
        let b = quantize(&bounds(51.50034, 51.40034, -0.05034, -0.25034), Some(17));
        assert_ne!(a, b);
    }

    #[test]
    fn test_grid_aligned_bounds_are_unchanged() {
        let original = bounds(60.0, 40.0, 10.0, -10.0);
        assert_eq!(quantize(&original, Some(4)), original);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_bounds() -> impl Strategy<Value = ViewportBounds> {
            (-90.0..90.0_f64, 0.0..20.0_f64, -180.0..180.0_f64, 0.0..40.0_f64).prop_map(
                |(south, height, west, width)| {
                    let north = (south + height).min(90.0);
                    let east = (west + width).min(180.0);
                    ViewportBounds::new(north, south, east, west).unwrap()
                },
            )
        }

        proptest! {
            #[test]
            fn test_quantize_never_shrinks(
                original in arb_bounds(),
                zoom in proptest::option::of(0u8..=22)
            ) {
                let q = quantize(&original, zoom);
                prop_assert!(
                    contains(&q, &original),
                    "quantized {} does not contain {} at zoom {:?}",
                    q, original, zoom
                );
            }

            #[test]
            fn test_quantize_is_deterministic(
                original in arb_bounds(),
                zoom in proptest::option::of(0u8..=22)
            ) {
                prop_assert_eq!(quantize(&original, zoom), quantize(&original, zoom));
            }

            #[test]
            fn test_quantize_is_idempotent(
                original in arb_bounds(),
                zoom in proptest::option::of(0u8..=22)
            ) {
                let once = quantize(&original, zoom);
                let twice = quantize(&once, zoom);
                prop_assert!(contains(&twice, &once));
            }
        }
    }
}
