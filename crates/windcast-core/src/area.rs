//! Study-area and grid-resolution identity.
//!
//! A run is keyed by a [`StudyArea`] (a contiguous US state or the whole
//! CONUS) and a [`Resolution`] (facility density and capacity
//! percentile, which together fix the hexagon size).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Study areas with fewer than two existing facilities.
///
/// No regional model could be fitted for these; they borrow the CONUS
/// model with nationwide-only predictors removed.
const NATIONAL_MODEL_FALLBACK: [&str; 14] = [
    "Alabama",
    "Arkansas",
    "Connecticut",
    "Delaware",
    "Florida",
    "Georgia",
    "Kentucky",
    "Louisiana",
    "Mississippi",
    "New_Jersey",
    "Rhode_Island",
    "South_Carolina",
    "Tennessee",
    "Virginia",
];

/// Projected capacity gained per five-year step, in MW.
const GAINED_CAPACITY_MW: [(&str, f64); 49] = [
    ("Alabama", 1211.6),
    ("Arizona", 604.0),
    ("Arkansas", 1211.6),
    ("California", 2036.6),
    ("Colorado", 435.5),
    ("Connecticut", 331.4),
    ("Delaware", 332.8),
    ("Florida", 333.2),
    ("Georgia", 414.3),
    ("Idaho", 544.8),
    ("Illinois", 10584.3),
    ("Indiana", 4872.2),
    ("Iowa", 8070.8),
    ("Kansas", 1189.7),
    ("Kentucky", 706.9),
    ("Louisiana", 1513.2),
    ("Maine", 654.8),
    ("Maryland", 1481.3),
    ("Massachusetts", 1191.3),
    ("Michigan", 62.4),
    ("Minnesota", 1854.6),
    ("Mississippi", 333.2),
    ("Missouri", 1867.1),
    ("Montana", 5214.6),
    ("Nebraska", 1070.5),
    ("Nevada", 307.9),
    ("New_Hampshire", 297.5),
    ("New_Jersey", 2612.9),
    ("New_Mexico", 1704.3),
    ("New_York", 2944.9),
    ("North_Carolina", 2375.7),
    ("North_Dakota", 949.1),
    ("Ohio", 3572.5),
    ("Oklahoma", 378.4),
    ("Oregon", 3927.0),
    ("Pennsylvania", 1433.0),
    ("Rhode_Island", 588.7),
    ("South_Carolina", 2410.3),
    ("South_Dakota", 592.4),
    ("Tennessee", 409.5),
    ("Texas", 10623.6),
    ("Utah", 349.2),
    ("Vermont", 308.3),
    ("Virginia", 704.9),
    ("Washington", 954.0),
    ("West_Virginia", 583.2),
    ("Wisconsin", 478.6),
    ("Wyoming", 2525.5),
    ("CONUS", 89190.1),
];

// ── StudyArea ──────────────────────────────────────────────────────

/// The region a run covers.
///
/// Names use underscores for spaces (`"New_Jersey"`), matching the
/// storage keys of fitted models and persisted artifacts.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudyArea(String);

impl StudyArea {
    /// Name of the contiguous-US study area.
    pub const CONUS: &'static str = "CONUS";

    /// Create a study area from a known name.
    ///
    /// Returns `Err(CoreError::UnknownName)` if the name has no entry
    /// in the gained-capacity table.
    pub fn new(name: &str) -> Result<Self, CoreError> {
        if GAINED_CAPACITY_MW.iter().any(|(n, _)| *n == name) {
            Ok(Self(name.to_string()))
        } else {
            Err(CoreError::UnknownName {
                kind: "study area",
                name: name.to_string(),
            })
        }
    }

    /// The whole contiguous United States.
    pub fn conus() -> Self {
        Self(Self::CONUS.to_string())
    }

    /// The area name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Whether this is the CONUS study area.
    pub fn is_conus(&self) -> bool {
        self.0 == Self::CONUS
    }

    /// Whether this area borrows the national (CONUS) fitted model.
    pub fn uses_national_model(&self) -> bool {
        NATIONAL_MODEL_FALLBACK.contains(&self.0.as_str())
    }

    /// The study area whose fitted model this area runs with.
    pub fn model_area(&self) -> Self {
        if self.uses_national_model() {
            Self::conus()
        } else {
            self.clone()
        }
    }

    /// Default capacity gained per step, in MW.
    pub fn default_gained_capacity_mw(&self) -> f64 {
        GAINED_CAPACITY_MW
            .iter()
            .find(|(n, _)| *n == self.0)
            .map(|(_, mw)| *mw)
            .unwrap_or(0.0)
    }
}

impl fmt::Display for StudyArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StudyArea {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ── Resolution ─────────────────────────────────────────────────────

/// Land area per MW of installed capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Density {
    /// 25 acres/MW.
    Acres25,
    /// 45 acres/MW.
    Acres45,
    /// 65 acres/MW.
    Acres65,
    /// 85 acres/MW.
    Acres85,
}

impl Density {
    /// Acres per MW.
    pub fn acres_per_mw(&self) -> u32 {
        match self {
            Self::Acres25 => 25,
            Self::Acres45 => 45,
            Self::Acres65 => 65,
            Self::Acres85 => 85,
        }
    }
}

impl FromStr for Density {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "25" => Ok(Self::Acres25),
            "45" => Ok(Self::Acres45),
            "65" => Ok(Self::Acres65),
            "85" => Ok(Self::Acres85),
            other => Err(CoreError::UnknownName {
                kind: "density",
                name: other.to_string(),
            }),
        }
    }
}

/// Percentile of commercial facility capacity a cell is sized for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapacityPercentile {
    /// 20th percentile (30 MW).
    P20,
    /// 40th percentile (90 MW).
    P40,
    /// 60th percentile (150 MW).
    P60,
    /// 80th percentile (202 MW).
    P80,
    /// 100th percentile (525 MW).
    P100,
}

impl CapacityPercentile {
    /// The percentile as an integer.
    pub fn percentile(&self) -> u32 {
        match self {
            Self::P20 => 20,
            Self::P40 => 40,
            Self::P60 => 60,
            Self::P80 => 80,
            Self::P100 => 100,
        }
    }

    /// Capacity of one facility at this percentile, in MW.
    pub fn unit_capacity_mw(&self) -> f64 {
        match self {
            Self::P20 => 30.0,
            Self::P40 => 90.0,
            Self::P60 => 150.0,
            Self::P80 => 202.0,
            Self::P100 => 525.0,
        }
    }
}

impl FromStr for CapacityPercentile {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "20" => Ok(Self::P20),
            "40" => Ok(Self::P40),
            "60" => Ok(Self::P60),
            "80" => Ok(Self::P80),
            "100" => Ok(Self::P100),
            other => Err(CoreError::UnknownName {
                kind: "capacity percentile",
                name: other.to_string(),
            }),
        }
    }
}

/// Grid resolution identity: one hexagon holds one facility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    /// Facility land density.
    pub density: Density,
    /// Facility capacity percentile.
    pub capacity: CapacityPercentile,
}

impl Resolution {
    /// Create a resolution.
    pub fn new(density: Density, capacity: CapacityPercentile) -> Self {
        Self { density, capacity }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_acres_per_MW_{}th_percentile",
            self.density.acres_per_mw(),
            self.capacity.percentile()
        )
    }
}
