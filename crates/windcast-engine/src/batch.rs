//! Multi-configuration batch runner.
//!
//! A batch runs the null configuration plus every selected fitted
//! configuration over one prepared [`Simulator`], one thread per
//! configuration, then compares each fitted result with the null one.
//!
//! Every fitted model is fetched before any thread starts, so a missing
//! model aborts the batch without simulating anything.

use std::thread;

use windcast_compare::{compare_configurations, DisagreementReport};
use windcast_core::PredictorConfig;
use windcast_model::{CoefficientSchedule, ModelError, ModelSource};

use crate::error::{RunContext, SimulationError, SimulationErrorKind};
use crate::simulation::{SimulationResult, Simulator};

/// Disagreement of one fitted configuration with the null one.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigComparison {
    /// The fitted configuration.
    pub config: PredictorConfig,
    /// Its disagreement statistics.
    pub report: DisagreementReport,
}

/// Results of a batch.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchReport {
    /// Every run, null first, then fitted configurations in selection
    /// order.
    pub results: Vec<SimulationResult>,
    /// One comparison per fitted configuration, in selection order.
    pub comparisons: Vec<ConfigComparison>,
}

impl BatchReport {
    /// The null configuration's run.
    pub fn null(&self) -> &SimulationResult {
        &self.results[0]
    }

    /// The run of `config`, if it was part of the batch.
    pub fn result(&self, config: PredictorConfig) -> Option<&SimulationResult> {
        self.results.iter().find(|r| r.config == config)
    }

    /// The comparison of `config` with the null run.
    pub fn comparison(&self, config: PredictorConfig) -> Option<&DisagreementReport> {
        self.comparisons
            .iter()
            .find(|c| c.config == config)
            .map(|c| &c.report)
    }
}

/// Run the null configuration and `selected` fitted configurations.
///
/// `Null` entries and duplicates in `selected` are ignored. The null
/// configuration borrows the intercept of the first selected fitted
/// configuration, so at least one is required.
pub fn run_batch(
    sim: &Simulator<'_>,
    models: &dyn ModelSource,
    selected: &[PredictorConfig],
) -> Result<BatchReport, SimulationError> {
    let config = sim.config();
    let context = |predictors: Option<PredictorConfig>| RunContext {
        study_area: config.study_area.clone(),
        resolution: config.resolution,
        config: predictors,
        step: None,
    };

    let mut fitted: Vec<PredictorConfig> = Vec::with_capacity(selected.len());
    for &c in selected {
        if !c.is_null() && !fitted.contains(&c) {
            fitted.push(c);
        }
    }
    if fitted.is_empty() {
        return Err(SimulationError::new(
            ModelError::NoReferenceIntercept,
            context(Some(PredictorConfig::Null)),
        ));
    }

    // 1. Fetch every fitted model; any miss is fatal.
    let model_area = config.study_area.model_area();
    let mut bases = Vec::with_capacity(fitted.len());
    for &c in &fitted {
        let base = models
            .fitted_model(&model_area, config.resolution, c)
            .map_err(|e| SimulationError::new(e, context(Some(c))))?;
        bases.push(base);
    }

    // 2. Evolve coefficients; null borrows the first fitted intercept.
    let mut schedules = Vec::with_capacity(fitted.len() + 1);
    let null = CoefficientSchedule::null(bases[0].intercept, &config.horizon)
        .map_err(|e| SimulationError::new(e, context(Some(PredictorConfig::Null))))?;
    schedules.push(null);
    for (&c, base) in fitted.iter().zip(bases) {
        let schedule = CoefficientSchedule::build(
            c,
            base,
            &config.scenario,
            &config.study_area,
            sim.landscape(),
            &config.horizon,
        )
        .map_err(|e| SimulationError::new(e, context(Some(c))))?;
        schedules.push(schedule);
    }

    tracing::info!(
        study_area = %config.study_area,
        resolution = %config.resolution,
        configs = schedules.len(),
        "batch started"
    );

    // 3. One thread per configuration.
    let order: Vec<PredictorConfig> = schedules.iter().map(|s| s.config()).collect();
    let (tx, rx) = crossbeam_channel::unbounded();
    let panicked = thread::scope(|scope| {
        let handles: Vec<_> = schedules
            .into_iter()
            .enumerate()
            .map(|(i, schedule)| {
                let tx = tx.clone();
                scope.spawn(move || {
                    // The receiver outlives every worker.
                    let _ = tx.send((i, sim.run(schedule)));
                })
            })
            .collect();
        let failed: Vec<PredictorConfig> = handles
            .into_iter()
            .zip(&order)
            .filter_map(|(h, &c)| h.join().is_err().then_some(c))
            .collect();
        failed.first().copied()
    });
    drop(tx);
    if let Some(c) = panicked {
        return Err(SimulationError::new(
            SimulationErrorKind::WorkerPanicked,
            context(Some(c)),
        ));
    }

    let mut slots: Vec<Option<Result<SimulationResult, SimulationError>>> =
        (0..order.len()).map(|_| None).collect();
    for (i, result) in rx.iter() {
        slots[i] = Some(result);
    }
    let mut results = Vec::with_capacity(order.len());
    for (slot, &c) in slots.into_iter().zip(&order) {
        match slot {
            Some(result) => results.push(result?),
            None => {
                return Err(SimulationError::new(
                    SimulationErrorKind::WorkerPanicked,
                    context(Some(c)),
                ))
            }
        }
    }

    // 4. Compare each fitted run with null.
    let steps = config.horizon.steps;
    let mut comparisons = Vec::with_capacity(results.len() - 1);
    for other in &results[1..] {
        let report = compare_configurations(&results[0].cells, &other.cells, steps)
            .map_err(|e| SimulationError::new(e, context(Some(other.config))))?;
        tracing::info!(
            study_area = %config.study_area,
            resolution = %config.resolution,
            config = %other.config,
            quantity = report.quantity,
            allocation = report.allocation,
            qadi = report.qadi,
            "compared with null configuration"
        );
        comparisons.push(ConfigComparison {
            config: other.config,
            report,
        });
    }

    Ok(BatchReport {
        results,
        comparisons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Quota, RunConfiguration};
    use crate::constraint::ConstraintSet;
    use windcast_core::{CellId, CellRecord, Landscape, Resolution, StudyArea};
    use windcast_model::CoefficientSet;
    use windcast_space::CentroidIndex;

    struct OnlyFull;

    impl ModelSource for OnlyFull {
        fn fitted_model(
            &self,
            study_area: &StudyArea,
            resolution: Resolution,
            config: PredictorConfig,
        ) -> Result<CoefficientSet, ModelError> {
            match config {
                PredictorConfig::Full => Ok(CoefficientSet::intercept_only(-1.0).with("x", 0.5)),
                _ => Err(ModelError::MissingModel {
                    study_area: study_area.clone(),
                    resolution,
                    config,
                }),
            }
        }
    }

    fn prepared(landscape: &Landscape) -> Simulator<'_> {
        let mut cfg = RunConfiguration::default();
        cfg.quota = Quota::new(1).unwrap();
        cfg.settings.constraints = ConstraintSet::disabled();
        cfg.settings.neighborhood.enabled = false;
        let index = CentroidIndex::new(1.0).unwrap();
        Simulator::new(cfg, landscape, &index).unwrap()
    }

    fn landscape() -> Landscape {
        Landscape::new(
            (0..10)
                .map(|i| CellRecord::new(CellId(i), i < 2).with_predictor("x", f64::from(i)))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn null_runs_first_and_is_compared() {
        let landscape = landscape();
        let sim = prepared(&landscape);
        let report = run_batch(&sim, &OnlyFull, &[PredictorConfig::Null, PredictorConfig::Full])
            .unwrap();
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.null().config, PredictorConfig::Null);
        let null_intercept = report.null().schedule.base().intercept;
        assert_eq!(null_intercept, -1.0);
        assert_eq!(report.comparisons.len(), 1);
        assert!(report.comparison(PredictorConfig::Full).is_some());
        assert_eq!(report.result(PredictorConfig::Full).unwrap().conversions(), 6);
    }

    #[test]
    fn missing_model_is_fatal_and_named() {
        let landscape = landscape();
        let sim = prepared(&landscape);
        let err = run_batch(&sim, &OnlyFull, &[PredictorConfig::Full, PredictorConfig::NoWind])
            .unwrap_err();
        assert!(matches!(
            err.kind,
            SimulationErrorKind::Model(ModelError::MissingModel { .. })
        ));
        assert_eq!(err.context.config, Some(PredictorConfig::NoWind));
    }

    #[test]
    fn null_alone_has_no_intercept() {
        let landscape = landscape();
        let sim = prepared(&landscape);
        let err = run_batch(&sim, &OnlyFull, &[PredictorConfig::Null]).unwrap_err();
        assert_eq!(
            err.kind,
            SimulationErrorKind::Model(ModelError::NoReferenceIntercept)
        );
    }
}
