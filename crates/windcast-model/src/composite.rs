//! Composite score: probability combined with eligibility and the
//! neighborhood factor.
//!
//! Which factors are multiplied in depends on which subsystems a run
//! enables. The mapping is a [`CompositeTable`] with one row per
//! combination, so alternative rule sets can be selected without
//! touching the engine.

use serde::{Deserialize, Serialize};

/// The factors multiplied into the probability for one table row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreFactors {
    /// Multiply by the eligibility flag (0 or 1).
    pub eligibility: bool,
    /// Multiply by the neighborhood factor.
    pub neighborhood: bool,
}

impl ScoreFactors {
    /// Score is the probability alone.
    pub const PROBABILITY: Self = Self {
        eligibility: false,
        neighborhood: false,
    };
    /// `eligibility · p`.
    pub const ELIGIBILITY: Self = Self {
        eligibility: true,
        neighborhood: false,
    };
    /// `neighborhood · p`.
    pub const NEIGHBORHOOD: Self = Self {
        eligibility: false,
        neighborhood: true,
    };
    /// `eligibility · neighborhood · p`.
    pub const BOTH: Self = Self {
        eligibility: true,
        neighborhood: true,
    };

    /// Combine a probability with the selected factors.
    pub fn apply(&self, probability: f64, eligibility: f64, neighborhood: f64) -> f64 {
        let mut score = probability;
        if self.eligibility {
            score *= eligibility;
        }
        if self.neighborhood {
            score *= neighborhood;
        }
        score
    }
}

/// Composite-score rule per (constraints, neighborhood) switch pair.
///
/// A disabled subsystem supplies factor 1, so multiplying it in is a
/// no-op. The [`Default`] table multiplies in exactly the enabled
/// factors: `C·N·p` with both subsystems on, `C·p` or `N·p` with one,
/// and `p` with neither. [`literal`](Self::literal) keeps the older
/// documented table, which scores by probability alone when both
/// subsystems are on and leaves ineligible cells to the allocation
/// filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeTable {
    /// Constraints on, neighborhood on.
    pub both_enabled: ScoreFactors,
    /// Constraints on, neighborhood off.
    pub constraints_only: ScoreFactors,
    /// Constraints off, neighborhood on.
    pub neighborhood_only: ScoreFactors,
    /// Constraints off, neighborhood off.
    pub both_disabled: ScoreFactors,
}

impl Default for CompositeTable {
    fn default() -> Self {
        Self {
            both_enabled: ScoreFactors::BOTH,
            constraints_only: ScoreFactors::ELIGIBILITY,
            neighborhood_only: ScoreFactors::NEIGHBORHOOD,
            both_disabled: ScoreFactors::PROBABILITY,
        }
    }
}

impl CompositeTable {
    /// The documented table: probability alone when both subsystems are
    /// on, every factor when both are off.
    pub fn literal() -> Self {
        Self {
            both_enabled: ScoreFactors::PROBABILITY,
            constraints_only: ScoreFactors::ELIGIBILITY,
            neighborhood_only: ScoreFactors::NEIGHBORHOOD,
            both_disabled: ScoreFactors::BOTH,
        }
    }

    /// Every row multiplies in every factor.
    pub fn multiplicative() -> Self {
        Self {
            both_enabled: ScoreFactors::BOTH,
            constraints_only: ScoreFactors::BOTH,
            neighborhood_only: ScoreFactors::BOTH,
            both_disabled: ScoreFactors::BOTH,
        }
    }

    /// The row for a switch pair.
    pub fn factors(&self, constraints: bool, neighborhood: bool) -> ScoreFactors {
        match (constraints, neighborhood) {
            (true, true) => self.both_enabled,
            (true, false) => self.constraints_only,
            (false, true) => self.neighborhood_only,
            (false, false) => self.both_disabled,
        }
    }
}
