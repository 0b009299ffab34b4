//! Simulation time: step indices and the projection horizon.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a step within the horizon.
///
/// `StepIndex(0)` is the base step (the observed present); simulated
/// steps are numbered from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepIndex(pub u32);

impl StepIndex {
    /// The observed present, before any simulated step.
    pub const BASE: Self = Self(0);

    /// The step after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for StepIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StepIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Fixed sequence of equally spaced future steps beyond a base year.
///
/// The default horizon projects six five-year steps from 2020, giving
/// step labels 2025, 2030, ..., 2050.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    /// Calendar year of the base step.
    pub base_year: u16,
    /// Years between consecutive steps.
    pub step_years: u16,
    /// Number of simulated steps.
    pub steps: u32,
}

impl Default for Horizon {
    fn default() -> Self {
        Self {
            base_year: 2020,
            step_years: 5,
            steps: 6,
        }
    }
}

impl Horizon {
    /// Calendar year labelling `step`.
    pub fn label(&self, step: StepIndex) -> u32 {
        u32::from(self.base_year) + u32::from(self.step_years) * step.0
    }

    /// The simulated steps, `1..=steps`, in execution order.
    pub fn simulated(&self) -> impl Iterator<Item = StepIndex> {
        (1..=self.steps).map(StepIndex)
    }

    /// The last simulated step.
    pub fn last(&self) -> StepIndex {
        StepIndex(self.steps)
    }

    /// Whether `step` is a simulated step of this horizon.
    pub fn contains(&self, step: StepIndex) -> bool {
        step.0 >= 1 && step.0 <= self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_horizon_labels() {
        let h = Horizon::default();
        let labels: Vec<u32> = h.simulated().map(|s| h.label(s)).collect();
        assert_eq!(labels, vec![2025, 2030, 2035, 2040, 2045, 2050]);
        assert_eq!(h.label(StepIndex::BASE), 2020);
        assert_eq!(h.last(), StepIndex(6));
    }

    #[test]
    fn contains_excludes_base_and_overflow() {
        let h = Horizon::default();
        assert!(!h.contains(StepIndex::BASE));
        assert!(h.contains(StepIndex(1)));
        assert!(h.contains(StepIndex(6)));
        assert!(!h.contains(StepIndex(7)));
    }
}
