//! Core bounding box types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing a [`ViewportBounds`].
///
/// These indicate a caller bug (malformed input), not a runtime condition
/// the cache can recover from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundsError {
    /// An edge is NaN or infinite.
    #[error("Non-finite bound: {edge} = {value}")]
    NonFinite { edge: &'static str, value: f64 },

    /// The northern edge lies south of the southern edge.
    #[error("Inverted latitude: north {north} < south {south}")]
    InvertedLatitude { north: f64, south: f64 },

    /// The eastern edge lies west of the western edge.
    #[error("Inverted longitude: east {east} < west {west}")]
    InvertedLongitude { east: f64, west: f64 },
}

/// A geographic bounding box in degrees.
///
/// Represents the closed rectangle `[south, north] × [west, east]`. Boxes
/// crossing the antimeridian are not representable; `east ≥ west` always
/// holds. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds")]
pub struct ViewportBounds {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

/// Unvalidated wire form used for deserialization.
#[derive(Deserialize)]
struct RawBounds {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

impl TryFrom<RawBounds> for ViewportBounds {
    type Error = BoundsError;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        ViewportBounds::new(raw.north, raw.south, raw.east, raw.west)
    }
}

impl ViewportBounds {
    /// Create a bounding box, validating edge ordering.
    ///
    /// # Arguments
    ///
    /// * `north` - Northern latitude edge
    /// * `south` - Southern latitude edge (must not exceed `north`)
    /// * `east` - Eastern longitude edge
    /// * `west` - Western longitude edge (must not exceed `east`)
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self, BoundsError> {
        for (edge, value) in [
            ("north", north),
            ("south", south),
            ("east", east),
            ("west", west),
        ] {
            if !value.is_finite() {
                return Err(BoundsError::NonFinite { edge, value });
            }
        }
        if north < south {
            return Err(BoundsError::InvertedLatitude { north, south });
        }
        if east < west {
            return Err(BoundsError::InvertedLongitude { east, west });
        }

        Ok(Self {
            north,
            south,
            east,
            west,
        })
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    /// Latitude extent in degrees.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Longitude extent in degrees.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Planar area in square degrees (no geodesic correction).
    pub fn area(&self) -> f64 {
        self.height() * self.width()
    }

    /// Shared rectangle of two boxes.
    ///
    /// Returns `None` when the boxes are disjoint or only touch along an
    /// edge or corner (zero extent in either dimension).
    pub fn intersection(&self, other: &ViewportBounds) -> Option<ViewportBounds> {
        let north = self.north.min(other.north);
        let south = self.south.max(other.south);
        let east = self.east.min(other.east);
        let west = self.west.max(other.west);

        if north <= south || east <= west {
            return None;
        }

        Some(ViewportBounds {
            north,
            south,
            east,
            west,
        })
    }
}

impl fmt::Display for ViewportBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N{} S{} E{} W{}",
            self.north, self.south, self.east, self.west
        )
    }
}
