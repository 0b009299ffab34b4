//! Per-step metrics for the simulation loop.
//!
//! [`StepMetrics`] captures timing and counts for a single step, for
//! logging and profiling.

use serde::{Deserialize, Serialize};

/// Timing and counts collected during a single step.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step, in microseconds.
    pub total_us: u64,
    /// Time spent computing probabilities and composite scores.
    pub scoring_us: u64,
    /// Time spent ranking candidates.
    pub allocation_us: u64,
    /// Time spent refreshing neighborhood factors.
    pub neighborhood_us: u64,
    /// Candidates available at the start of the step.
    pub pool: usize,
    /// Cells converted this step.
    pub converted: usize,
    /// Cells whose neighborhood factor was recomputed after the step.
    pub recomputed: usize,
}
