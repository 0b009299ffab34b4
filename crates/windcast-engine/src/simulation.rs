//! The simulation loop: one predictor configuration stepped across the
//! horizon.
//!
//! [`Simulator`] performs the work shared by every configuration of a
//! run: it validates the [`RunConfiguration`], evaluates constraints and
//! scans neighbors once. [`Simulator::start`] then creates an
//! independent [`Simulation`] per configuration, each owning its own
//! [`SimulationState`].
//!
//! # State machine
//!
//! ```text
//! Initializing ─► Stepping(1) ─► … ─► Stepping(n-1) ─► Completed
//!                      │                    │
//!                      └────────────────────┴──► TerminatedEarly(t)
//! ```
//!
//! Each step scores every cell, converts the top-quota candidates, and
//! then refreshes neighborhood factors around the new conversions. The
//! refresh is skipped once the run reaches a terminal phase.

use std::ops::ControlFlow;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use windcast_core::{
    CellClassification, CellId, ClusterTag, Landscape, PredictorConfig, Resolution, StepIndex,
    StudyArea,
};
use windcast_model::{CoefficientSchedule, LinearPredictor};
use windcast_space::{NeighborSource, NeighborTable, RingCount, ScanProgress};

use crate::allocation::allocate;
use crate::config::RunConfiguration;
use crate::constraint::{ConstraintDiagnostics, ConstraintEvaluation};
use crate::error::{RunContext, SimulationError, SimulationErrorKind};
use crate::metrics::StepMetrics;
use crate::neighborhood::NeighborhoodTracker;
use crate::state::SimulationState;

// ── Phases and outcomes ──────────────────────────────────────────

/// Where a [`Simulation`] is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    /// Initialized; no step executed yet.
    Initializing,
    /// The given step has executed and the run continues.
    Stepping(StepIndex),
    /// Every step of the horizon executed.
    Completed,
    /// The candidate pool ran out at the given step.
    TerminatedEarly(StepIndex),
}

impl RunPhase {
    /// Whether no further step can execute.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::TerminatedEarly(_))
    }
}

/// How a finished run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Every step of the horizon executed.
    Completed,
    /// The candidate pool ran out at the given step.
    TerminatedEarly(StepIndex),
}

// ── Results ──────────────────────────────────────────────────────

/// What one step did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// The step executed.
    pub step: StepIndex,
    /// Calendar year of the step.
    pub label: u32,
    /// Cells converted, best score first.
    pub converted: Vec<CellId>,
    /// Timing and counts.
    pub metrics: StepMetrics,
}

/// Per-cell score history of a run, in landscape position order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreHistory {
    /// Probability of every cell, one row per executed step.
    pub probabilities: Vec<Vec<f64>>,
    /// Neighborhood factors before the first step, when enabled.
    pub initial_neighborhood: Option<Vec<f64>>,
    /// Neighborhood factors after the last refresh, when enabled.
    pub final_neighborhood: Option<Vec<f64>>,
}

/// Everything a finished configuration produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Predictor configuration simulated.
    pub config: PredictorConfig,
    /// Study area of the run.
    pub study_area: StudyArea,
    /// Grid resolution of the run.
    pub resolution: Resolution,
    /// How the run ended.
    pub outcome: RunOutcome,
    /// One record per executed step.
    pub steps: Vec<StepRecord>,
    /// Final classification of every cell, ascending id.
    pub cells: Vec<CellClassification>,
    /// Probabilities and neighborhood factors.
    pub history: ScoreHistory,
    /// Coefficients used at each step.
    pub schedule: CoefficientSchedule,
    /// Constraint failure counts.
    pub diagnostics: ConstraintDiagnostics,
}

impl SimulationResult {
    /// Cells converted during the run.
    pub fn conversions(&self) -> usize {
        self.steps.iter().map(|s| s.converted.len()).sum()
    }

    /// The step at which the run stopped.
    pub fn last_step(&self) -> StepIndex {
        self.steps.last().map_or(StepIndex::BASE, |s| s.step)
    }
}

// ── Simulator ────────────────────────────────────────────────────

/// Shared, read-only preparation for every configuration of a run.
///
/// `Simulator` is `Sync`; several [`Simulation`]s may borrow it from
/// different threads.
#[derive(Debug)]
pub struct Simulator<'a> {
    config: RunConfiguration,
    landscape: &'a Landscape,
    constraints: ConstraintEvaluation,
    neighbors: Option<NeighborTable>,
}

impl<'a> Simulator<'a> {
    /// Validate `config`, evaluate constraints and build the neighbor
    /// table.
    ///
    /// The table is only built when the composite rule for the enabled
    /// subsystems multiplies in the neighborhood factor.
    pub fn new(
        config: RunConfiguration,
        landscape: &'a Landscape,
        source: &dyn NeighborSource,
    ) -> Result<Self, SimulationError> {
        Self::with_progress(config, landscape, source, &mut |_| ControlFlow::Continue(()))
    }

    /// Like [`new`](Self::new), reporting neighbor-scan progress.
    ///
    /// Breaking from `progress` cancels the scan and fails with
    /// [`SpaceError::Cancelled`](windcast_space::SpaceError::Cancelled).
    pub fn with_progress(
        config: RunConfiguration,
        landscape: &'a Landscape,
        source: &dyn NeighborSource,
        progress: &mut dyn FnMut(ScanProgress) -> ControlFlow<()>,
    ) -> Result<Self, SimulationError> {
        let context = run_context(&config, None, None);
        config
            .validate()
            .map_err(|e| SimulationError::new(e, context.clone()))?;

        let constraints = config.settings.constraints.evaluate(landscape);

        let uses_neighborhood = config
            .composite
            .factors(constraints.enabled(), config.settings.neighborhood.enabled)
            .neighborhood;
        let neighbors = match config.search_radius_m() {
            Some(_) if !uses_neighborhood => {
                tracing::debug!(
                    study_area = %config.study_area,
                    resolution = %config.resolution,
                    "composite rule ignores the neighborhood factor, skipping the neighbor scan"
                );
                None
            }
            Some(radius) => {
                let rings = config.settings.neighborhood.rings;
                if rings.get() > RingCount::RECOMMENDED_MAX {
                    tracing::warn!(
                        study_area = %config.study_area,
                        resolution = %config.resolution,
                        rings = rings.get(),
                        "large ring count makes the neighbor scan slow"
                    );
                }
                let table = NeighborTable::build_with_progress(landscape, source, radius, progress)
                    .map_err(|e| SimulationError::new(e, context))?;
                Some(table)
            }
            None => None,
        };

        Ok(Self {
            config,
            landscape,
            constraints,
            neighbors,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &RunConfiguration {
        &self.config
    }

    /// The landscape every configuration runs on.
    pub fn landscape(&self) -> &'a Landscape {
        self.landscape
    }

    /// Eligibility and diagnostics.
    pub fn constraints(&self) -> &ConstraintEvaluation {
        &self.constraints
    }

    /// The neighbor table, when the composite score uses it.
    pub fn neighbors(&self) -> Option<&NeighborTable> {
        self.neighbors.as_ref()
    }

    /// Begin a configuration's run.
    pub fn start(&self, schedule: CoefficientSchedule) -> Result<Simulation<'_>, SimulationError> {
        Simulation::new(self, schedule)
    }

    /// Run a configuration from start to finish.
    pub fn run(&self, schedule: CoefficientSchedule) -> Result<SimulationResult, SimulationError> {
        self.start(schedule)?.run_to_end()
    }
}

fn run_context(
    config: &RunConfiguration,
    predictors: Option<PredictorConfig>,
    step: Option<StepIndex>,
) -> RunContext {
    RunContext {
        study_area: config.study_area.clone(),
        resolution: config.resolution,
        config: predictors,
        step,
    }
}

// ── Simulation ───────────────────────────────────────────────────

/// One predictor configuration's run in progress.
pub struct Simulation<'s> {
    config: &'s RunConfiguration,
    landscape: &'s Landscape,
    constraints: &'s ConstraintEvaluation,
    neighbors: Option<&'s NeighborTable>,
    schedule: CoefficientSchedule,
    /// Bound predictors for steps `1..=n`.
    predictors: Vec<LinearPredictor>,
    state: SimulationState,
    tracker: Option<NeighborhoodTracker>,
    phase: RunPhase,
    steps: Vec<StepRecord>,
    cold_start: bool,
}

impl<'s> Simulation<'s> {
    fn new(sim: &'s Simulator<'_>, schedule: CoefficientSchedule) -> Result<Self, SimulationError> {
        let config = &sim.config;
        let landscape = sim.landscape;
        let predictors = config
            .horizon
            .simulated()
            .map(|step| {
                LinearPredictor::bind(schedule.at(step), landscape).map_err(|e| {
                    SimulationError::new(e, run_context(config, Some(schedule.config()), Some(step)))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let state = SimulationState::new(landscape);
        let tracker = sim
            .neighbors
            .as_ref()
            .map(|table| NeighborhoodTracker::new(table, state.states()));
        let cold_start = tracker.is_some() && landscape.existing_count() < 2;

        tracing::info!(
            study_area = %config.study_area,
            resolution = %config.resolution,
            config = %schedule.config(),
            quota = config.quota.get(),
            steps = config.horizon.steps,
            cells = landscape.len(),
            "simulation started"
        );

        Ok(Self {
            config,
            landscape,
            constraints: &sim.constraints,
            neighbors: sim.neighbors.as_ref(),
            schedule,
            predictors,
            state,
            tracker,
            phase: RunPhase::Initializing,
            steps: Vec::new(),
            cold_start,
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Whether the run reached a terminal phase.
    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Per-cell state so far.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Neighborhood factors, when enabled.
    pub fn neighborhood(&self) -> Option<&NeighborhoodTracker> {
        self.tracker.as_ref()
    }

    /// Records of the executed steps.
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// The configuration being simulated.
    pub fn predictor_config(&self) -> PredictorConfig {
        self.schedule.config()
    }

    /// Execute the next step.
    pub fn step(&mut self) -> Result<&StepRecord, SimulationError> {
        let step = match self.phase {
            RunPhase::Initializing => StepIndex(1),
            RunPhase::Stepping(s) => s.next(),
            RunPhase::Completed | RunPhase::TerminatedEarly(_) => {
                return Err(SimulationError::new(
                    SimulationErrorKind::AlreadyFinished,
                    run_context(self.config, Some(self.schedule.config()), None),
                ));
            }
        };
        let step_start = Instant::now();
        let config = self.config;
        let predictor_config = self.schedule.config();

        // 1. Score every cell.
        let scoring_start = Instant::now();
        let factors = config.composite.factors(
            self.constraints.enabled(),
            config.settings.neighborhood.enabled,
        );
        let cold = self.cold_start && step == StepIndex(1);
        if cold {
            tracing::warn!(
                study_area = %config.study_area,
                resolution = %config.resolution,
                config = %predictor_config,
                step = step.0,
                existing = self.landscape.existing_count(),
                "fewer than two existing facilities, neighborhood factor excluded for this step"
            );
        }
        let predictor = &self.predictors[(step.0 - 1) as usize];
        let mut probabilities = Vec::with_capacity(self.landscape.len());
        let scores = self.state.scores_mut();
        for (pos, score) in scores.iter_mut().enumerate() {
            let p = predictor.probability(self.landscape.predictor_row(pos));
            let n = match &self.tracker {
                Some(t) if !cold => t.factor(pos),
                _ => 1.0,
            };
            *score = factors.apply(p, self.constraints.factor(pos), n);
            probabilities.push(p);
        }
        self.state.push_probabilities(probabilities);
        let scoring_us = scoring_start.elapsed().as_micros() as u64;

        // 2. Convert the top-quota candidates.
        let allocation_start = Instant::now();
        let allocation = allocate(
            self.state.states(),
            self.state.scores(),
            self.constraints.eligibility(),
            config.quota,
        );
        for &pos in &allocation.converted {
            self.state.convert(pos, step);
        }
        let allocation_us = allocation_start.elapsed().as_micros() as u64;

        // 3. Advance, refreshing neighbors unless the run just ended.
        let neighborhood_start = Instant::now();
        let mut recomputed = 0;
        self.phase = if allocation.exhausted {
            tracing::warn!(
                study_area = %config.study_area,
                resolution = %config.resolution,
                config = %predictor_config,
                step = step.0,
                pool = allocation.pool,
                quota = config.quota.get(),
                "candidate pool exhausted, terminating early"
            );
            RunPhase::TerminatedEarly(step)
        } else if step == config.horizon.last() {
            RunPhase::Completed
        } else {
            if let (Some(tracker), Some(table)) = (self.tracker.as_mut(), self.neighbors) {
                recomputed = tracker.update(table, self.state.states(), &allocation.converted);
            }
            RunPhase::Stepping(step)
        };
        let neighborhood_us = neighborhood_start.elapsed().as_micros() as u64;

        let metrics = StepMetrics {
            total_us: step_start.elapsed().as_micros() as u64,
            scoring_us,
            allocation_us,
            neighborhood_us,
            pool: allocation.pool,
            converted: allocation.converted.len(),
            recomputed,
        };
        let label = config.horizon.label(step);
        tracing::debug!(
            study_area = %config.study_area,
            resolution = %config.resolution,
            config = %predictor_config,
            step = step.0,
            label,
            converted = metrics.converted,
            pool = metrics.pool,
            recomputed,
            "step executed"
        );
        if self.phase.is_terminal() {
            tracing::info!(
                study_area = %config.study_area,
                resolution = %config.resolution,
                config = %predictor_config,
                outcome = ?self.phase,
                conversions = self.state.converted_count(),
                "simulation finished"
            );
        }

        let converted = allocation
            .converted
            .iter()
            .map(|&pos| self.landscape.id(pos))
            .collect();
        self.steps.push(StepRecord {
            step,
            label,
            converted,
            metrics,
        });
        Ok(&self.steps[self.steps.len() - 1])
    }

    /// Step until a terminal phase, then collect the result.
    pub fn run_to_end(mut self) -> Result<SimulationResult, SimulationError> {
        while !self.is_finished() {
            self.step()?;
        }
        Ok(self.into_result())
    }

    fn into_result(self) -> SimulationResult {
        let outcome = match self.phase {
            RunPhase::TerminatedEarly(step) => RunOutcome::TerminatedEarly(step),
            _ => RunOutcome::Completed,
        };
        let config = self.schedule.config();
        let tag_clusters = !config.is_null() && !self.config.study_area.uses_national_model();

        let initial_neighborhood = self.tracker.as_ref().map(|t| t.initial_factors().to_vec());
        let final_neighborhood = self.tracker.as_ref().map(|t| t.factors().to_vec());
        let (states, probabilities) = self.state.into_parts();
        let cells = states
            .iter()
            .enumerate()
            .map(|(pos, &state)| CellClassification {
                id: self.landscape.id(pos),
                state,
                cluster: if tag_clusters {
                    self.landscape
                        .model_state(pos)
                        .map(|m| ClusterTag::classify(state, m))
                } else {
                    None
                },
            })
            .collect();

        SimulationResult {
            config,
            study_area: self.config.study_area.clone(),
            resolution: self.config.resolution,
            outcome,
            steps: self.steps,
            cells,
            history: ScoreHistory {
                probabilities,
                initial_neighborhood,
                final_neighborhood,
            },
            schedule: self.schedule,
            diagnostics: self.constraints.diagnostics().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Quota;
    use crate::constraint::ConstraintSet;
    use windcast_core::{AttributeValue, CellRecord, ConversionState, ModelCellState};
    use windcast_model::{CoefficientSet, Scenario};
    use windcast_space::CentroidIndex;

    /// Distance between adjacent centroids at the default resolution.
    fn spacing() -> f64 {
        RunConfiguration::default().geometry().centroid_spacing_m()
    }

    fn centroids(n: u32) -> CentroidIndex {
        let s = spacing();
        CentroidIndex::from_points(s, (0..n).map(|i| (CellId(i), f64::from(i) * s, 0.0))).unwrap()
    }

    /// Adjacent cells on a line; `x` rises with id.
    fn line(n: u32, existing: &[u32]) -> (Landscape, CentroidIndex) {
        let records = (0..n)
            .map(|i| {
                CellRecord::new(CellId(i), existing.contains(&i))
                    .with_predictor("x", f64::from(i))
                    .with_attribute("Avg_Wind", AttributeValue::Number(10.0))
            })
            .collect();
        (Landscape::new(records).unwrap(), centroids(n))
    }

    fn config(quota: u32, neighborhood: bool) -> RunConfiguration {
        let mut cfg = RunConfiguration::default();
        cfg.quota = Quota::new(quota).unwrap();
        cfg.settings.constraints = ConstraintSet::disabled();
        cfg.settings.neighborhood.enabled = neighborhood;
        cfg
    }

    fn schedule(cfg: &RunConfiguration, landscape: &Landscape, coef: f64) -> CoefficientSchedule {
        CoefficientSchedule::build(
            PredictorConfig::Full,
            CoefficientSet::intercept_only(0.0).with("x", coef),
            &Scenario::new(),
            &cfg.study_area,
            landscape,
            &cfg.horizon,
        )
        .unwrap()
    }

    #[test]
    fn phases_advance_to_completed() {
        let (landscape, index) = line(20, &[]);
        let cfg = config(2, false);
        let sim = Simulator::new(cfg.clone(), &landscape, &index).unwrap();
        let mut run = sim.start(schedule(&cfg, &landscape, 1.0)).unwrap();
        assert_eq!(run.phase(), RunPhase::Initializing);

        let first = run.step().unwrap();
        assert_eq!(first.step, StepIndex(1));
        assert_eq!(first.label, 2025);
        assert_eq!(first.converted, vec![CellId(19), CellId(18)]);
        assert_eq!(run.phase(), RunPhase::Stepping(StepIndex(1)));

        for _ in 2..=6 {
            run.step().unwrap();
        }
        assert_eq!(run.phase(), RunPhase::Completed);
        match run.step() {
            Err(SimulationError {
                kind: SimulationErrorKind::AlreadyFinished,
                ..
            }) => {}
            other => panic!("expected AlreadyFinished, got {other:?}"),
        }
    }

    #[test]
    fn exhaustion_terminates_early() {
        let (landscape, index) = line(5, &[]);
        let cfg = config(2, false);
        let result = Simulator::new(cfg.clone(), &landscape, &index)
            .unwrap()
            .run(schedule(&cfg, &landscape, 1.0))
            .unwrap();
        assert_eq!(result.outcome, RunOutcome::TerminatedEarly(StepIndex(3)));
        assert_eq!(result.steps.len(), 3);
        assert_eq!(result.steps[2].converted, vec![CellId(0)]);
        assert_eq!(result.conversions(), 5);
        assert_eq!(result.last_step(), StepIndex(3));
    }

    #[test]
    fn neighborhood_pulls_growth_toward_existing_cells() {
        // Flat probabilities: only the neighborhood factor separates cells.
        let (landscape, index) = line(12, &[0, 1]);
        let mut cfg = config(1, true);
        cfg.composite = windcast_model::CompositeTable::multiplicative();
        let result = Simulator::new(cfg.clone(), &landscape, &index)
            .unwrap()
            .run(schedule(&cfg, &landscape, 0.0))
            .unwrap();
        let order: Vec<CellId> = result.steps.iter().map(|s| s.converted[0]).collect();
        assert_eq!(
            order,
            vec![CellId(2), CellId(3), CellId(4), CellId(5), CellId(6), CellId(7)]
        );
        let initial = result.history.initial_neighborhood.unwrap();
        assert_eq!(initial[2], 0.5);
        assert_eq!(initial[5], 0.0);
    }

    #[test]
    fn cold_start_ignores_neighborhood_on_first_step() {
        // One existing cell: without the cold-start rule every score but
        // cell 1's would be zero.
        let (landscape, index) = line(6, &[0]);
        let mut cfg = config(1, true);
        cfg.composite = windcast_model::CompositeTable::multiplicative();
        let sim = Simulator::new(cfg.clone(), &landscape, &index).unwrap();
        let mut run = sim.start(schedule(&cfg, &landscape, 1.0)).unwrap();
        assert_eq!(run.step().unwrap().converted, vec![CellId(5)]);
        // Step 2 uses the factor: cell 4 now has a converted neighbor.
        assert_eq!(run.step().unwrap().converted, vec![CellId(4)]);
    }

    #[test]
    fn constraints_filter_candidates() {
        let mut records: Vec<CellRecord> = (0..8)
            .map(|id| {
                let wind = if id >= 6 { 2.0 } else { 10.0 };
                CellRecord::new(CellId(id), false)
                    .with_predictor("x", f64::from(id))
                    .with_attribute("Avg_Wind", AttributeValue::Number(wind))
            })
            .collect();
        records.reverse();
        let index = centroids(8);
        let landscape = Landscape::new(records).unwrap();
        let mut cfg = config(1, false);
        cfg.settings.constraints = ConstraintSet::default();
        let result = Simulator::new(cfg.clone(), &landscape, &index)
            .unwrap()
            .run(schedule(&cfg, &landscape, 1.0))
            .unwrap();
        assert_eq!(result.steps[0].converted, vec![CellId(5)]);
        assert_eq!(result.diagnostics.prohibited, 2);
        assert!(result
            .cells
            .iter()
            .filter(|c| c.id.0 >= 6)
            .all(|c| c.state == ConversionState::NeverConverted));
    }

    #[test]
    fn default_rule_clusters_growth_with_both_subsystems_on() {
        // Flat probabilities and every cell eligible: only the
        // neighborhood factor separates cells.
        let (landscape, index) = line(12, &[10, 11]);
        let mut cfg = config(1, true);
        cfg.settings.constraints = ConstraintSet::default();
        let sim = Simulator::new(cfg.clone(), &landscape, &index).unwrap();
        assert!(sim.constraints().enabled());
        assert!(sim.neighbors().is_some());
        let result = sim.run(schedule(&cfg, &landscape, 0.0)).unwrap();
        let order: Vec<CellId> = result.steps.iter().map(|s| s.converted[0]).collect();
        assert_eq!(
            order,
            vec![CellId(9), CellId(8), CellId(7), CellId(6), CellId(5), CellId(4)]
        );
        assert_eq!(result.history.initial_neighborhood.unwrap()[9], 0.5);
    }

    #[test]
    fn literal_rule_skips_the_neighbor_scan() {
        let (landscape, index) = line(12, &[10, 11]);
        let mut cfg = config(1, true);
        cfg.settings.constraints = ConstraintSet::default();
        cfg.composite = windcast_model::CompositeTable::literal();
        let sim = Simulator::new(cfg.clone(), &landscape, &index).unwrap();
        assert!(sim.neighbors().is_none());

        // Ties fall back to ascending id, far from the existing cells.
        let result = sim.run(schedule(&cfg, &landscape, 0.0)).unwrap();
        assert_eq!(result.steps[0].converted, vec![CellId(0)]);
        assert!(result.history.initial_neighborhood.is_none());
    }

    #[test]
    fn ineligible_cells_exhaust_the_pool_early() {
        // The six best-scoring cells are on military land.
        let records: Vec<CellRecord> = (0..8)
            .map(|id| {
                let record = CellRecord::new(CellId(id), false)
                    .with_predictor("x", f64::from(7 - id));
                if id < 6 {
                    record.with_attribute("Military", AttributeValue::Flag(true))
                } else {
                    record
                }
            })
            .collect();
        let landscape = Landscape::new(records).unwrap();
        let index = centroids(8);
        let mut cfg = config(1, false);
        cfg.settings.constraints = ConstraintSet::default();
        let sim = Simulator::new(cfg.clone(), &landscape, &index).unwrap();
        let mut run = sim.start(schedule(&cfg, &landscape, 1.0)).unwrap();

        assert_eq!(run.step().unwrap().converted, vec![CellId(6)]);
        assert_eq!(run.step().unwrap().converted, vec![CellId(7)]);
        assert_eq!(run.phase(), RunPhase::Stepping(StepIndex(2)));
        let third = run.step().unwrap();
        assert!(third.converted.is_empty());
        assert_eq!(third.metrics.pool, 0);
        assert_eq!(run.phase(), RunPhase::TerminatedEarly(StepIndex(3)));
        assert!(run.step().is_err());

        let result = run.run_to_end().unwrap();
        assert_eq!(result.outcome, RunOutcome::TerminatedEarly(StepIndex(3)));
        assert_eq!(result.steps.len(), 3);
        assert_eq!(result.diagnostics.prohibited, 6);
        assert!(result.cells[..6]
            .iter()
            .all(|c| c.state == ConversionState::NeverConverted));
    }

    #[test]
    fn cluster_tags_follow_model_states() {
        let records = vec![
            CellRecord::new(CellId(0), false)
                .with_predictor("x", 1.0)
                .with_model_state(ModelCellState::FalsePositive),
            CellRecord::new(CellId(1), false)
                .with_predictor("x", 0.0)
                .with_model_state(ModelCellState::TrueNegative),
        ];
        let landscape = Landscape::new(records).unwrap();
        let index = CentroidIndex::from_points(
            10.0,
            [(CellId(0), 0.0, 0.0), (CellId(1), 100.0, 0.0)],
        )
        .unwrap();
        let mut cfg = config(1, false);
        cfg.horizon.steps = 1;
        let result = Simulator::new(cfg.clone(), &landscape, &index)
            .unwrap()
            .run(schedule(&cfg, &landscape, 1.0))
            .unwrap();
        assert_eq!(result.cells[0].cluster, Some(ClusterTag::ConvertedFalsePositive));
        assert_eq!(result.cells[1].cluster, Some(ClusterTag::NotConverted));
    }

    #[test]
    fn scan_can_be_cancelled() {
        let (landscape, index) = line(10, &[]);
        let cfg = config(1, true);
        let err = Simulator::with_progress(cfg, &landscape, &index, &mut |p| {
            if p.scanned >= 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap_err();
        assert!(matches!(
            err.kind,
            SimulationErrorKind::Space(windcast_space::SpaceError::Cancelled { scanned: 3, .. })
        ));
        assert_eq!(err.context.config, None);
    }

    #[test]
    fn invalid_config_fails_before_scan() {
        let (landscape, index) = line(4, &[]);
        let mut cfg = config(1, true);
        cfg.horizon.steps = 0;
        let err = Simulator::new(cfg, &landscape, &index).unwrap_err();
        assert!(matches!(err.kind, SimulationErrorKind::Config(_)));
    }
}
