//! Regular-hexagon geometry for each grid resolution.
//!
//! Every resolution fixes the hexagon area (one facility per cell).
//! From the area follow the side length, the spacing between adjacent
//! centroids, and the physical search radius for a neighborhood of a
//! given ring count.

use serde::{Deserialize, Serialize};
use windcast_core::{CapacityPercentile, Density, Resolution};

use crate::error::SpaceError;

/// Hexagon area in square metres for a resolution.
pub fn hexagon_area_m2(resolution: Resolution) -> f64 {
    use CapacityPercentile::*;
    use Density::*;
    match (resolution.capacity, resolution.density) {
        (P100, Acres85) => 180_590_968.0,
        (P100, Acres65) => 138_098_975.0,
        (P100, Acres45) => 95_606_983.0,
        (P100, Acres25) => 53_114_991.0,
        (P80, Acres85) => 69_312_533.0,
        (P80, Acres65) => 53_003_702.0,
        (P80, Acres45) => 36_694_871.0,
        (P80, Acres25) => 20_386_039.0,
        (P60, Acres85) => 51_597_419.0,
        (P60, Acres65) => 39_456_850.0,
        (P60, Acres45) => 27_316_281.0,
        (P60, Acres25) => 15_175_712.0,
        (P40, Acres85) => 30_958_452.0,
        (P40, Acres65) => 23_674_110.0,
        (P40, Acres45) => 16_389_769.0,
        (P40, Acres25) => 9_105_427.0,
        (P20, Acres85) => 10_319_484.0,
        (P20, Acres65) => 7_891_370.0,
        (P20, Acres45) => 5_463_256.0,
        (P20, Acres25) => 3_035_142.0,
    }
}

// ── RingCount ──────────────────────────────────────────────────────

/// Neighborhood extent in rings of hexagons around a cell.
///
/// Accepted range is `1..=100`; values above
/// [`RECOMMENDED_MAX`](Self::RECOMMENDED_MAX) are allowed but make the
/// initial neighbor scan expensive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct RingCount(u32);

impl RingCount {
    /// Largest accepted ring count.
    pub const MAX: u32 = 100;
    /// Largest ring count that keeps scans cheap on state-sized grids.
    pub const RECOMMENDED_MAX: u32 = 10;
    /// The immediately adjacent ring.
    pub const ONE: Self = Self(1);

    /// Validate a ring count.
    pub fn new(rings: u32) -> Result<Self, SpaceError> {
        if rings == 0 || rings > Self::MAX {
            return Err(SpaceError::InvalidRingCount { rings });
        }
        Ok(Self(rings))
    }

    /// The ring count.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for RingCount {
    type Error = SpaceError;

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<RingCount> for u32 {
    fn from(r: RingCount) -> Self {
        r.0
    }
}

// ── HexGeometry ────────────────────────────────────────────────────

/// Dimensions of the regular hexagon tiling a grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexGeometry {
    area_m2: f64,
    side_length_m: f64,
}

impl HexGeometry {
    /// Geometry of a hexagon with the given area.
    ///
    /// `side = √(2·area / (3·√3))`.
    pub fn from_area(area_m2: f64) -> Result<Self, SpaceError> {
        if !area_m2.is_finite() || area_m2 <= 0.0 {
            return Err(SpaceError::InvalidSideLength { value: area_m2 });
        }
        let side_length_m = (2.0 * area_m2 / (3.0 * 3f64.sqrt())).sqrt();
        Ok(Self {
            area_m2,
            side_length_m,
        })
    }

    /// Geometry of the hexagons at a grid resolution.
    pub fn from_resolution(resolution: Resolution) -> Self {
        let area_m2 = hexagon_area_m2(resolution);
        Self {
            area_m2,
            side_length_m: (2.0 * area_m2 / (3.0 * 3f64.sqrt())).sqrt(),
        }
    }

    /// Hexagon area in square metres.
    pub fn area_m2(&self) -> f64 {
        self.area_m2
    }

    /// Hexagon side length in metres.
    pub fn side_length_m(&self) -> f64 {
        self.side_length_m
    }

    /// Distance between the centroids of two adjacent hexagons,
    /// `2 · side · sin(60°)`.
    pub fn centroid_spacing_m(&self) -> f64 {
        2.0 * self.side_length_m * 60f64.to_radians().sin()
    }

    /// Physical search radius covering `rings` rings of hexagons.
    pub fn search_radius_m(&self, rings: RingCount) -> f64 {
        self.centroid_spacing_m() * f64::from(rings.get())
    }
}
