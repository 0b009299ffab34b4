//! Simulation engine for Windcast land-use projections.
//!
//! This crate runs the cellular-automaton loop. A [`RunConfiguration`]
//! is validated once; a [`Simulator`] then evaluates constraints and
//! scans neighbors for the whole run, and each predictor configuration
//! steps its own [`Simulation`] across the horizon.
//!
//! Each step:
//!
//! 1. scores every cell with the logistic probability, combined with
//!    eligibility and the neighborhood factor per the composite table
//! 2. converts the `quota` best-scoring candidates (ties to the lower
//!    cell id), or every remaining candidate when fewer are left, which
//!    ends the run early
//! 3. refreshes the neighborhood factor of cells next to the new
//!    conversions
//!
//! [`run_batch`] runs the null configuration and the selected fitted
//! configurations concurrently and compares each with null.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod allocation;
pub mod batch;
pub mod config;
pub mod constraint;
pub mod error;
pub mod metrics;
pub mod neighborhood;
pub mod simulation;
pub mod state;

pub use allocation::{allocate, Allocation};
pub use batch::{run_batch, BatchReport, ConfigComparison};
pub use config::{ConfigError, NeighborhoodSettings, Quota, RunConfiguration, RunSettings};
pub use constraint::{
    Constraint, ConstraintCount, ConstraintDiagnostics, ConstraintEvaluation, ConstraintRule,
    ConstraintSet,
};
pub use error::{RunContext, SimulationError, SimulationErrorKind};
pub use metrics::StepMetrics;
pub use neighborhood::NeighborhoodTracker;
pub use simulation::{
    RunOutcome, RunPhase, ScoreHistory, Simulation, SimulationResult, Simulator, StepRecord,
};
pub use state::SimulationState;
