//! Integration test: a batch persisted to disk and read back.

use windcast_core::{PredictorConfig, StudyArea};
use windcast_engine::{run_batch, ConstraintSet, Quota, RunConfiguration, Simulator};
use windcast_store::{ArtifactStore, JsonDirStore, MemoryStore, RunKey};
use windcast_test_utils::fixtures::{default_resolution, ten_cell_grid, x_model};
use windcast_test_utils::MockModelSource;

fn batch() -> (RunConfiguration, windcast_engine::BatchReport) {
    let (landscape, grid) = ten_cell_grid();
    let mut cfg = RunConfiguration::default();
    cfg.quota = Quota::new(1).unwrap();
    cfg.settings.constraints = ConstraintSet::disabled();
    let models = MockModelSource::new()
        .with(
            StudyArea::conus(),
            default_resolution(),
            PredictorConfig::Full,
            x_model(-0.5, 1.2),
        )
        .with(
            StudyArea::conus(),
            default_resolution(),
            PredictorConfig::WindOnly,
            x_model(0.4, -0.9),
        );
    let sim = Simulator::new(cfg.clone(), &landscape, &grid).unwrap();
    let report = run_batch(
        &sim,
        &models,
        &[PredictorConfig::Full, PredictorConfig::WindOnly],
    )
    .unwrap();
    (cfg, report)
}

fn check_round_trip(store: &dyn ArtifactStore) {
    let (cfg, report) = batch();
    store.save_batch(&cfg.settings, &report).unwrap();

    let key = RunKey::new(StudyArea::conus(), default_resolution());
    assert_eq!(store.settings_or_default(&key).unwrap(), cfg.settings);
    for result in &report.results {
        let schedule = store.coefficients(&key, result.config).unwrap().unwrap();
        assert_eq!(schedule, result.schedule);
        let cells = store.require_classification(&key, result.config).unwrap();
        assert_eq!(cells, result.cells);
    }
    assert!(store
        .coefficients(&key, PredictorConfig::NoWind)
        .unwrap()
        .is_none());
}

#[test]
fn batch_round_trips_in_memory() {
    check_round_trip(&MemoryStore::new());
}

#[test]
fn batch_round_trips_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    check_round_trip(&JsonDirStore::open(dir.path().join("artifacts")).unwrap());

    // A second handle on the same directory sees the same artifacts.
    let reopened = JsonDirStore::open(dir.path().join("artifacts")).unwrap();
    let key = RunKey::new(StudyArea::conus(), default_resolution());
    assert!(reopened
        .classification(&key, PredictorConfig::Null)
        .unwrap()
        .is_some());
}
