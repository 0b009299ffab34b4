//! Artifact keys.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use windcast_core::{PredictorConfig, Resolution, StudyArea};

/// A (study area, resolution) pair. Settings are stored per run key,
/// coefficient tables and classifications per run key and configuration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunKey {
    /// Study area.
    pub study_area: StudyArea,
    /// Grid resolution.
    pub resolution: Resolution,
}

impl RunKey {
    /// Create a key.
    pub fn new(study_area: StudyArea, resolution: Resolution) -> Self {
        Self {
            study_area,
            resolution,
        }
    }

    /// Relative directory holding this key's artifacts.
    pub(crate) fn dir(&self) -> PathBuf {
        PathBuf::from(self.study_area.name()).join(self.resolution.to_string())
    }

    /// Relative directory holding one configuration's artifacts.
    pub(crate) fn config_dir(&self, config: PredictorConfig) -> PathBuf {
        self.dir().join(config.name())
    }
}

impl fmt::Display for RunKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.study_area, self.resolution)
    }
}
