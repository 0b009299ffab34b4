//! In-memory artifact store.

use std::collections::HashMap;
use std::sync::RwLock;

use windcast_core::{CellClassification, PredictorConfig};
use windcast_engine::RunSettings;
use windcast_model::CoefficientSchedule;

use crate::error::StoreError;
use crate::key::RunKey;
use crate::store::ArtifactStore;

type ConfigKey = (RunKey, PredictorConfig);

/// Artifacts held in process memory. Lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    settings: RwLock<HashMap<RunKey, RunSettings>>,
    coefficients: RwLock<HashMap<ConfigKey, CoefficientSchedule>>,
    classifications: RwLock<HashMap<ConfigKey, Vec<CellClassification>>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_err(context: &'static str) -> StoreError {
    StoreError::Poisoned { context }
}

impl ArtifactStore for MemoryStore {
    fn put_settings(&self, key: &RunKey, settings: &RunSettings) -> Result<(), StoreError> {
        self.settings
            .write()
            .map_err(|_| lock_err("settings write"))?
            .insert(key.clone(), settings.clone());
        Ok(())
    }

    fn settings(&self, key: &RunKey) -> Result<Option<RunSettings>, StoreError> {
        Ok(self
            .settings
            .read()
            .map_err(|_| lock_err("settings read"))?
            .get(key)
            .cloned())
    }

    fn put_coefficients(
        &self,
        key: &RunKey,
        schedule: &CoefficientSchedule,
    ) -> Result<(), StoreError> {
        self.coefficients
            .write()
            .map_err(|_| lock_err("coefficients write"))?
            .insert((key.clone(), schedule.config()), schedule.clone());
        Ok(())
    }

    fn coefficients(
        &self,
        key: &RunKey,
        config: PredictorConfig,
    ) -> Result<Option<CoefficientSchedule>, StoreError> {
        Ok(self
            .coefficients
            .read()
            .map_err(|_| lock_err("coefficients read"))?
            .get(&(key.clone(), config))
            .cloned())
    }

    fn put_classification(
        &self,
        key: &RunKey,
        config: PredictorConfig,
        cells: &[CellClassification],
    ) -> Result<(), StoreError> {
        self.classifications
            .write()
            .map_err(|_| lock_err("classification write"))?
            .insert((key.clone(), config), cells.to_vec());
        Ok(())
    }

    fn classification(
        &self,
        key: &RunKey,
        config: PredictorConfig,
    ) -> Result<Option<Vec<CellClassification>>, StoreError> {
        Ok(self
            .classifications
            .read()
            .map_err(|_| lock_err("classification read"))?
            .get(&(key.clone(), config))
            .cloned())
    }
}
