//! Integration test: batch runs over mock collaborators.

use windcast_core::{Landscape, PredictorConfig, StepIndex, StudyArea};
use windcast_engine::{
    run_batch, ConstraintSet, Quota, RunConfiguration, RunOutcome, SimulationErrorKind, Simulator,
};
use windcast_model::{ModelError, Scenario, ScenarioPreset};
use windcast_space::SpaceError;
use windcast_test_utils::fixtures::{default_resolution, ten_cell_grid, x_model};
use windcast_test_utils::{FailingNeighbors, MockCellSource, MockModelSource};

fn models(area: StudyArea) -> MockModelSource {
    let res = default_resolution();
    MockModelSource::new()
        .with(area.clone(), res, PredictorConfig::Full, x_model(-0.5, 1.2))
        .with(area.clone(), res, PredictorConfig::WindOnly, x_model(0.4, -0.9))
        .with(
            area,
            res,
            PredictorConfig::Reduced,
            x_model(-0.5, 1.2).with("Tax_Prop", 2.0),
        )
}

fn config(area: StudyArea) -> RunConfiguration {
    let mut cfg = RunConfiguration::for_area(area, default_resolution());
    cfg.settings.constraints = ConstraintSet::disabled();
    cfg
}

#[test]
fn batch_runs_null_first_and_compares_each() {
    let (landscape, grid) = ten_cell_grid();
    let mut cfg = config(StudyArea::conus());
    cfg.quota = Quota::new(1).unwrap();
    let sim = Simulator::new(cfg, &landscape, &grid).unwrap();
    let models = models(StudyArea::conus());

    let report = run_batch(
        &sim,
        &models,
        &[PredictorConfig::Full, PredictorConfig::WindOnly, PredictorConfig::Full],
    )
    .unwrap();
    assert_eq!(models.calls(), 2);

    let configs: Vec<PredictorConfig> = report.results.iter().map(|r| r.config).collect();
    assert_eq!(
        configs,
        vec![PredictorConfig::Null, PredictorConfig::Full, PredictorConfig::WindOnly]
    );
    assert_eq!(report.null().schedule.base().intercept, -0.5);
    assert!(report.null().cells.iter().all(|c| c.cluster.is_none()));

    for comparison in &report.comparisons {
        let r = &comparison.report;
        let agree: u64 = (0..r.table.buckets()).map(|k| r.table.diagonal(k)).sum();
        assert_eq!(r.quantity + r.allocation, r.table.total() - agree);
        assert!(r.qadi >= 0.0 && r.qadi <= 1.0);
        // Eight cells without a facility before the run.
        assert_eq!(r.table.total(), 8);
        // Both configurations convert six cells, so the totals agree.
        assert_eq!(r.table.row_total(0), 2);
        assert_eq!(r.table.col_total(0), 2);
    }
}

#[test]
fn identical_models_do_not_disagree() {
    let (landscape, grid) = ten_cell_grid();
    let mut cfg = config(StudyArea::conus());
    cfg.quota = Quota::new(1).unwrap();
    cfg.settings.neighborhood.enabled = false;
    let sim = Simulator::new(cfg, &landscape, &grid).unwrap();
    // A zero-slope model scores every cell alike, exactly like null.
    let models = MockModelSource::new().with(
        StudyArea::conus(),
        default_resolution(),
        PredictorConfig::Full,
        x_model(0.3, 0.0),
    );
    let report = run_batch(&sim, &models, &[PredictorConfig::Full]).unwrap();
    let r = report.comparison(PredictorConfig::Full).unwrap();
    assert_eq!(r.quantity, 0);
    assert_eq!(r.allocation, 0);
    assert_eq!(r.qadi, 0.0);
}

#[test]
fn fallback_area_uses_national_model_and_terminates_early() {
    let alabama = StudyArea::new("Alabama").unwrap();
    let (landscape, grid) = ten_cell_grid();
    let mut cfg = config(alabama);
    cfg.scenario = Scenario::from_presets(&[ScenarioPreset::Nationwide], &cfg.study_area);
    // ceil(1211.6 / 525)
    assert_eq!(cfg.quota.get(), 3);
    let sim = Simulator::new(cfg, &landscape, &grid).unwrap();

    let report = run_batch(&sim, &models(StudyArea::conus()), &[PredictorConfig::Reduced]).unwrap();
    let reduced = report.result(PredictorConfig::Reduced).unwrap();
    assert_eq!(
        reduced.schedule.dropped_predictors(),
        &["Tax_Prop".to_string()]
    );
    // Eight candidates at three per step: 3, 3, then the last 2.
    assert_eq!(reduced.outcome, RunOutcome::TerminatedEarly(StepIndex(3)));
    assert_eq!(reduced.conversions(), 8);
    assert_eq!(report.null().outcome, RunOutcome::TerminatedEarly(StepIndex(3)));
}

#[test]
fn missing_model_aborts_before_any_run() {
    let (landscape, grid) = ten_cell_grid();
    let sim = Simulator::new(config(StudyArea::conus()), &landscape, &grid).unwrap();
    let err = run_batch(
        &sim,
        &models(StudyArea::conus()),
        &[PredictorConfig::Full, PredictorConfig::NoWind],
    )
    .unwrap_err();
    assert!(matches!(
        err.kind,
        SimulationErrorKind::Model(ModelError::MissingModel {
            config: PredictorConfig::NoWind,
            ..
        })
    ));
    assert_eq!(err.context.study_area, StudyArea::conus());
    assert!(err.to_string().contains("No_Wind"));
}

#[test]
fn neighbor_failure_names_the_run() {
    let (landscape, _) = ten_cell_grid();
    let err = Simulator::new(config(StudyArea::conus()), &landscape, &FailingNeighbors).unwrap_err();
    assert!(matches!(
        err.kind,
        SimulationErrorKind::Space(SpaceError::QueryFailed { .. })
    ));
    assert_eq!(err.context.resolution, default_resolution());
}

#[test]
fn cells_come_from_a_cell_source() {
    use windcast_core::CellSource;

    let (landscape, grid) = ten_cell_grid();
    let mut source = MockCellSource::new();
    let records: Vec<_> = landscape
        .ids()
        .iter()
        .map(|&id| {
            let pos = landscape.position(id).unwrap();
            windcast_core::CellRecord::new(id, landscape.initial_state(pos).is_converted())
                .with_predictor("x", landscape.predictor_row(pos)[0])
        })
        .collect();
    source.insert(StudyArea::conus(), default_resolution(), records);

    let fetched = source
        .cell_records(&StudyArea::conus(), default_resolution())
        .unwrap();
    let rebuilt = Landscape::new(fetched).unwrap();
    assert_eq!(rebuilt.existing_count(), 2);

    let mut cfg = config(StudyArea::conus());
    cfg.quota = Quota::new(1).unwrap();
    let sim = Simulator::new(cfg, &rebuilt, &grid).unwrap();
    let report = run_batch(&sim, &models(StudyArea::conus()), &[PredictorConfig::Full]).unwrap();
    assert_eq!(report.result(PredictorConfig::Full).unwrap().conversions(), 6);
    assert!(source
        .cell_records(&StudyArea::new("Iowa").unwrap(), default_resolution())
        .is_err());
}
