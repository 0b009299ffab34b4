//! The [`ArtifactStore`] trait.

use tracing::debug;
use windcast_core::{CellClassification, PredictorConfig};
use windcast_engine::{BatchReport, RunSettings, SimulationResult};
use windcast_model::CoefficientSchedule;

use crate::error::StoreError;
use crate::key::RunKey;

/// Durable storage for run artifacts.
///
/// Three artifact kinds are kept:
///
/// - **Settings**: constraint and neighborhood settings per
///   [`RunKey`], so repeated runs can reuse or override them.
/// - **Coefficients**: the evolved coefficient table per run key and
///   predictor configuration.
/// - **Classifications**: every cell's final state and cluster tag per
///   run key and predictor configuration.
///
/// A `put` replaces whatever was stored under the same key. A getter
/// returns `Ok(None)` for a key that was never written.
pub trait ArtifactStore: Send + Sync {
    /// Store settings for `key`.
    fn put_settings(&self, key: &RunKey, settings: &RunSettings) -> Result<(), StoreError>;

    /// Settings stored for `key`.
    fn settings(&self, key: &RunKey) -> Result<Option<RunSettings>, StoreError>;

    /// Store a coefficient table.
    fn put_coefficients(
        &self,
        key: &RunKey,
        schedule: &CoefficientSchedule,
    ) -> Result<(), StoreError>;

    /// The coefficient table stored for `key` and `config`.
    fn coefficients(
        &self,
        key: &RunKey,
        config: PredictorConfig,
    ) -> Result<Option<CoefficientSchedule>, StoreError>;

    /// Store a final classification.
    fn put_classification(
        &self,
        key: &RunKey,
        config: PredictorConfig,
        cells: &[CellClassification],
    ) -> Result<(), StoreError>;

    /// The classification stored for `key` and `config`.
    fn classification(
        &self,
        key: &RunKey,
        config: PredictorConfig,
    ) -> Result<Option<Vec<CellClassification>>, StoreError>;

    /// Settings for `key`, or the defaults when none were stored.
    fn settings_or_default(&self, key: &RunKey) -> Result<RunSettings, StoreError> {
        Ok(self.settings(key)?.unwrap_or_default())
    }

    /// The classification for `key` and `config`, failing with
    /// [`StoreError::Missing`] if it was never stored.
    fn require_classification(
        &self,
        key: &RunKey,
        config: PredictorConfig,
    ) -> Result<Vec<CellClassification>, StoreError> {
        self.classification(key, config)?
            .ok_or_else(|| StoreError::Missing {
                artifact: format!("{config} classification for {key}"),
            })
    }

    /// Store the coefficient table and classification of one run.
    fn save_result(&self, result: &SimulationResult) -> Result<(), StoreError> {
        let key = RunKey::new(result.study_area.clone(), result.resolution);
        self.put_coefficients(&key, &result.schedule)?;
        self.put_classification(&key, result.config, &result.cells)?;
        debug!(%key, config = %result.config, "stored run artifacts");
        Ok(())
    }

    /// Store every run of a batch, plus the settings they shared.
    fn save_batch(&self, settings: &RunSettings, report: &BatchReport) -> Result<(), StoreError> {
        let null = report.null();
        let key = RunKey::new(null.study_area.clone(), null.resolution);
        self.put_settings(&key, settings)?;
        for result in &report.results {
            self.save_result(result)?;
        }
        Ok(())
    }
}
