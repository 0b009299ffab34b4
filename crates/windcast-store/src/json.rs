//! Artifact store backed by a directory of JSON files.
//!
//! Layout under the root:
//!
//! ```text
//! <area>/<resolution>/settings.json
//! <area>/<resolution>/<config>/coefficients.json
//! <area>/<resolution>/<config>/classification.json
//! ```
//!
//! Files are written to a temporary sibling and renamed into place, so
//! a reader never sees a half-written artifact.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};
use windcast_core::{CellClassification, PredictorConfig};
use windcast_engine::RunSettings;
use windcast_model::CoefficientSchedule;

use crate::error::StoreError;
use crate::key::RunKey;
use crate::store::ArtifactStore;

const SETTINGS_FILE: &str = "settings.json";
const COEFFICIENTS_FILE: &str = "coefficients.json";
const CLASSIFICATION_FILE: &str = "classification.json";

/// Artifacts persisted as JSON files under a root directory.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        debug!(root = %root.display(), "opened artifact directory");
        Ok(Self { root })
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write<T: Serialize + ?Sized>(&self, relative: PathBuf, value: &T) -> Result<(), StoreError> {
        let path = self.root.join(relative);
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serialization {
            artifact: path.display().to_string(),
            source,
        })?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        trace!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, relative: PathBuf) -> Result<Option<T>, StoreError> {
        let path = self.root.join(relative);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(io_err(path, source)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Serialization {
                artifact: path.display().to_string(),
                source,
            })
    }
}

fn io_err(path: PathBuf, source: io::Error) -> StoreError {
    StoreError::Io { path, source }
}

impl ArtifactStore for JsonDirStore {
    fn put_settings(&self, key: &RunKey, settings: &RunSettings) -> Result<(), StoreError> {
        self.write(key.dir().join(SETTINGS_FILE), settings)
    }

    fn settings(&self, key: &RunKey) -> Result<Option<RunSettings>, StoreError> {
        self.read(key.dir().join(SETTINGS_FILE))
    }

    fn put_coefficients(
        &self,
        key: &RunKey,
        schedule: &CoefficientSchedule,
    ) -> Result<(), StoreError> {
        self.write(
            key.config_dir(schedule.config()).join(COEFFICIENTS_FILE),
            schedule,
        )
    }

    fn coefficients(
        &self,
        key: &RunKey,
        config: PredictorConfig,
    ) -> Result<Option<CoefficientSchedule>, StoreError> {
        self.read(key.config_dir(config).join(COEFFICIENTS_FILE))
    }

    fn put_classification(
        &self,
        key: &RunKey,
        config: PredictorConfig,
        cells: &[CellClassification],
    ) -> Result<(), StoreError> {
        self.write(key.config_dir(config).join(CLASSIFICATION_FILE), cells)
    }

    fn classification(
        &self,
        key: &RunKey,
        config: PredictorConfig,
    ) -> Result<Option<Vec<CellClassification>>, StoreError> {
        self.read(key.config_dir(config).join(CLASSIFICATION_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use windcast_core::StudyArea;
    use windcast_test_utils::fixtures::default_resolution;

    fn key() -> RunKey {
        RunKey::new(StudyArea::conus(), default_resolution())
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(dir.path()).unwrap();
        assert!(store.settings(&key()).unwrap().is_none());
        assert!(store.coefficients(&key(), PredictorConfig::Full).unwrap().is_none());
    }

    #[test]
    fn settings_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = RunSettings::default();
        settings.neighborhood.enabled = false;
        JsonDirStore::open(dir.path())
            .unwrap()
            .put_settings(&key(), &settings)
            .unwrap();

        let reopened = JsonDirStore::open(dir.path()).unwrap();
        assert_eq!(reopened.settings(&key()).unwrap(), Some(settings));
        assert!(!reopened.root().join(key().dir()).join("settings.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(dir.path()).unwrap();
        let path = dir.path().join(key().dir());
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join(SETTINGS_FILE), b"{ not json").unwrap();
        let err = store.settings(&key()).unwrap_err();
        assert!(matches!(err, StoreError::Serialization { .. }));
        assert!(err.to_string().contains("settings.json"));
    }
}
