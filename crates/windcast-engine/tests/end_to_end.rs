//! Integration test: a full run on the ten-cell grid.
//!
//! Two existing facilities, one conversion per step, constraints off,
//! neutral scenario and a one-ring neighborhood. Every step must
//! convert exactly the best-scoring remaining cell, and the whole run
//! must be reproducible.

use windcast_core::{ConversionState, PredictorConfig, StepIndex};
use windcast_engine::{
    ConstraintSet, Quota, RunConfiguration, RunOutcome, RunPhase, SimulationResult, Simulator,
};
use windcast_model::{CoefficientSchedule, Scenario};
use windcast_test_utils::fixtures::{default_resolution, ten_cell_grid, x_model};

fn config() -> RunConfiguration {
    let mut cfg = RunConfiguration::default();
    assert_eq!(cfg.resolution, default_resolution());
    cfg.quota = Quota::new(1).unwrap();
    cfg.settings.constraints = ConstraintSet::disabled();
    cfg
}

fn schedule(cfg: &RunConfiguration, landscape: &windcast_core::Landscape) -> CoefficientSchedule {
    CoefficientSchedule::build(
        PredictorConfig::Full,
        x_model(-0.5, 1.2),
        &Scenario::new(),
        &cfg.study_area,
        landscape,
        &cfg.horizon,
    )
    .unwrap()
}

#[test]
fn each_step_converts_the_best_remaining_cell() {
    let (landscape, grid) = ten_cell_grid();
    let cfg = config();
    let sim = Simulator::new(cfg.clone(), &landscape, &grid).unwrap();
    let mut run = sim.start(schedule(&cfg, &landscape)).unwrap();

    let mut steps = 0;
    while !run.is_finished() {
        let before: Vec<ConversionState> = run.state().states().to_vec();
        let record = run.step().unwrap().clone();
        steps += 1;
        assert_eq!(record.step, StepIndex(steps));
        assert_eq!(record.converted.len(), 1, "step {steps}");

        let scores = run.state().scores();
        assert!(scores.iter().all(|&s| (0.0..=1.0).contains(&s)));
        let best = (0..landscape.len())
            .filter(|&p| before[p] == ConversionState::NeverConverted)
            .max_by(|&a, &b| scores[a].total_cmp(&scores[b]).then(b.cmp(&a)))
            .unwrap();
        assert_eq!(record.converted[0], landscape.id(best), "step {steps}");
    }
    assert_eq!(steps, 6);
    assert_eq!(run.phase(), RunPhase::Completed);
}

#[test]
fn six_conversions_and_existing_cells_untouched() {
    let (landscape, grid) = ten_cell_grid();
    let cfg = config();
    let sim = Simulator::new(cfg.clone(), &landscape, &grid).unwrap();
    let result = sim.run(schedule(&cfg, &landscape)).unwrap();

    assert_eq!(result.outcome, RunOutcome::Completed);
    assert_eq!(result.conversions(), 6);
    let labels: Vec<u32> = result.steps.iter().map(|s| s.label).collect();
    assert_eq!(labels, vec![2025, 2030, 2035, 2040, 2045, 2050]);

    assert_eq!(result.cells[0].state, ConversionState::ExistingPriorToRun);
    assert_eq!(result.cells[1].state, ConversionState::ExistingPriorToRun);
    let never = result
        .cells
        .iter()
        .filter(|c| c.state == ConversionState::NeverConverted)
        .count();
    assert_eq!(never, 2);
    for record in &result.steps {
        let pos = landscape.position(record.converted[0]).unwrap();
        assert_eq!(result.cells[pos].state, ConversionState::Converted(record.step));
    }

    assert_eq!(result.history.probabilities.len(), 6);
    assert!(result.history.initial_neighborhood.is_some());
}

#[test]
fn runs_are_deterministic() {
    let (landscape, grid) = ten_cell_grid();
    let cfg = config();
    let sim = Simulator::new(cfg.clone(), &landscape, &grid).unwrap();
    let a: SimulationResult = sim.run(schedule(&cfg, &landscape)).unwrap();
    let b: SimulationResult = sim.run(schedule(&cfg, &landscape)).unwrap();
    assert_eq!(a.cells, b.cells);
    let order = |r: &SimulationResult| -> Vec<_> { r.steps.iter().map(|s| s.converted.clone()).collect() };
    assert_eq!(order(&a), order(&b));
}

#[test]
fn result_serializes_for_reporting() {
    let (landscape, grid) = ten_cell_grid();
    let cfg = config();
    let sim = Simulator::new(cfg.clone(), &landscape, &grid).unwrap();
    let result = sim.run(schedule(&cfg, &landscape)).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let back: SimulationResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.cells, result.cells);
    assert_eq!(back.outcome, result.outcome);
}
