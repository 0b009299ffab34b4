//! Run configuration, validation, and error types.
//!
//! [`RunConfiguration`] holds the resolved, immutable parameters of one
//! run: study area and resolution, quota, horizon, scenario, the
//! persisted [`RunSettings`] and the composite-score table.
//! [`validate()`](RunConfiguration::validate) checks every invariant
//! before any simulation starts.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

use windcast_core::{CapacityPercentile, Density, Horizon, Resolution, StudyArea};
use windcast_model::{CompositeTable, Scenario};
use windcast_space::{HexGeometry, RingCount};

use crate::constraint::ConstraintSet;

// ── Quota ──────────────────────────────────────────────────────────

/// Cells converted per step. Always at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quota(u32);

impl Quota {
    /// Validate a cell count.
    pub fn new(cells: u32) -> Result<Self, ConfigError> {
        if cells == 0 {
            return Err(ConfigError::ZeroQuota);
        }
        Ok(Self(cells))
    }

    /// `ceil(gained_mw / unit_mw)`: facilities needed to add
    /// `gained_mw` of capacity per step.
    pub fn from_capacity(gained_mw: f64, unit_mw: f64) -> Result<Self, ConfigError> {
        if !gained_mw.is_finite() || !unit_mw.is_finite() || gained_mw <= 0.0 || unit_mw <= 0.0 {
            return Err(ConfigError::InvalidCapacity { gained_mw, unit_mw });
        }
        let cells = (gained_mw / unit_mw).ceil();
        if cells > f64::from(u32::MAX) {
            return Err(ConfigError::InvalidCapacity { gained_mw, unit_mw });
        }
        Self::new(cells as u32)
    }

    /// The cell count.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Quota {
    type Error = ConfigError;

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<Quota> for u32 {
    fn from(q: Quota) -> Self {
        q.0
    }
}

// ── RunSettings ────────────────────────────────────────────────────

/// Neighborhood-effect switch and extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborhoodSettings {
    /// Whether converted neighbors raise a cell's score.
    pub enabled: bool,
    /// Search extent in hexagon rings.
    pub rings: RingCount,
}

impl Default for NeighborhoodSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            rings: RingCount::ONE,
        }
    }
}

/// Constraint and neighborhood settings, reusable across runs of the
/// same study area and resolution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    /// Eligibility constraints.
    pub constraints: ConstraintSet,
    /// Neighborhood effects.
    pub neighborhood: NeighborhoodSettings,
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building or validating a [`RunConfiguration`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Quota of zero cells per step.
    ZeroQuota,
    /// Gained or unit capacity is not finite and positive, or their
    /// ratio does not fit a quota.
    InvalidCapacity {
        /// Capacity gained per step, MW.
        gained_mw: f64,
        /// Capacity of one facility, MW.
        unit_mw: f64,
    },
    /// Horizon has no simulated steps or zero-year steps.
    InvalidHorizon {
        /// Description of which invariant was violated.
        reason: String,
    },
    /// A constraint threshold is malformed.
    InvalidConstraint {
        /// Constraint name.
        name: String,
        /// Description of the failure.
        reason: String,
    },
    /// No constraint carries the given name.
    UnknownConstraint {
        /// The requested name.
        name: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroQuota => write!(f, "quota must be at least one cell per step"),
            Self::InvalidCapacity { gained_mw, unit_mw } => write!(
                f,
                "cannot derive a quota from {gained_mw} MW gained at {unit_mw} MW per facility"
            ),
            Self::InvalidHorizon { reason } => write!(f, "invalid horizon: {reason}"),
            Self::InvalidConstraint { name, reason } => {
                write!(f, "invalid constraint '{name}': {reason}")
            }
            Self::UnknownConstraint { name } => write!(f, "unknown constraint '{name}'"),
        }
    }
}

impl Error for ConfigError {}

// ── RunConfiguration ───────────────────────────────────────────────

/// Complete, immutable parameters of one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunConfiguration {
    /// Area being projected.
    pub study_area: StudyArea,
    /// Grid resolution.
    pub resolution: Resolution,
    /// Cells converted per step.
    pub quota: Quota,
    /// Future steps beyond the base year.
    pub horizon: Horizon,
    /// Coefficient deltas shared by every configuration.
    pub scenario: Scenario,
    /// Constraints and neighborhood settings.
    pub settings: RunSettings,
    /// Composite-score rule per subsystem combination.
    pub composite: CompositeTable,
}

impl Default for RunConfiguration {
    /// CONUS at 85 acres/MW, 100th percentile, with the default quota.
    fn default() -> Self {
        Self::for_area(
            StudyArea::conus(),
            Resolution::new(Density::Acres85, CapacityPercentile::P100),
        )
    }
}

impl RunConfiguration {
    /// Defaults for an area and resolution, with the quota derived from
    /// the area's default gained capacity.
    pub fn for_area(study_area: StudyArea, resolution: Resolution) -> Self {
        let quota = Quota::from_capacity(
            study_area.default_gained_capacity_mw(),
            resolution.capacity.unit_capacity_mw(),
        )
        .unwrap_or(Quota(1));
        Self {
            study_area,
            resolution,
            quota,
            horizon: Horizon::default(),
            scenario: Scenario::new(),
            settings: RunSettings::default(),
            composite: CompositeTable::default(),
        }
    }

    /// Replace the quota with one derived from a custom gained capacity.
    pub fn with_gained_capacity(mut self, gained_mw: f64) -> Result<Self, ConfigError> {
        self.quota = Quota::from_capacity(gained_mw, self.resolution.capacity.unit_capacity_mw())?;
        Ok(self)
    }

    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Quota >= 1 (guaranteed by Quota, re-checked for hand-built values).
        if self.quota.get() == 0 {
            return Err(ConfigError::ZeroQuota);
        }
        // 2. Horizon must simulate at least one step of at least one year.
        if self.horizon.steps == 0 {
            return Err(ConfigError::InvalidHorizon {
                reason: "at least one simulated step is required".to_string(),
            });
        }
        if self.horizon.step_years == 0 {
            return Err(ConfigError::InvalidHorizon {
                reason: "step length must be at least one year".to_string(),
            });
        }
        // 3. Constraint thresholds finite, min < max, names unique.
        self.settings.constraints.validate()?;
        // 4. Ring count is range-checked by RingCount; the composite table
        //    has all four rows by construction.
        Ok(())
    }

    /// Hexagon geometry of the configured resolution.
    pub fn geometry(&self) -> HexGeometry {
        HexGeometry::from_resolution(self.resolution)
    }

    /// Physical neighborhood search radius in metres, when neighborhood
    /// effects are enabled.
    pub fn search_radius_m(&self) -> Option<f64> {
        let n = &self.settings.neighborhood;
        n.enabled.then(|| self.geometry().search_radius_m(n.rings))
    }
}
