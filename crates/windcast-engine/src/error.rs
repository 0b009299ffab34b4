//! Errors returned by simulations and batches.

use std::error::Error;
use std::fmt;

use windcast_compare::CompareError;
use windcast_core::{CoreError, PredictorConfig, Resolution, StepIndex, StudyArea};
use windcast_model::ModelError;
use windcast_space::SpaceError;

use crate::config::ConfigError;

/// The underlying cause of a [`SimulationError`].
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationErrorKind {
    /// The run configuration failed validation.
    Config(ConfigError),
    /// A fitted model was missing or malformed.
    Model(ModelError),
    /// The neighbor scan failed or was cancelled.
    Space(SpaceError),
    /// Cell data was malformed or unavailable.
    Core(CoreError),
    /// Two configurations' outputs could not be compared.
    Compare(CompareError),
    /// `step()` was called after the run finished.
    AlreadyFinished,
    /// A configuration's worker thread panicked.
    WorkerPanicked,
}

impl fmt::Display for SimulationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::Model(e) => write!(f, "model error: {e}"),
            Self::Space(e) => write!(f, "neighbor search failed: {e}"),
            Self::Core(e) => write!(f, "{e}"),
            Self::Compare(e) => write!(f, "comparison failed: {e}"),
            Self::AlreadyFinished => write!(f, "simulation already finished"),
            Self::WorkerPanicked => write!(f, "simulation worker panicked"),
        }
    }
}

/// Where in a batch an error happened.
#[derive(Debug, Clone, PartialEq)]
pub struct RunContext {
    /// Study area of the run.
    pub study_area: StudyArea,
    /// Grid resolution of the run.
    pub resolution: Resolution,
    /// Predictor configuration, once one was selected.
    pub config: Option<PredictorConfig>,
    /// Step being executed, once stepping started.
    pub step: Option<StepIndex>,
}

impl fmt::Display for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.study_area, self.resolution)?;
        if let Some(config) = self.config {
            write!(f, ", {config} configuration")?;
        }
        if let Some(step) = self.step {
            write!(f, ", step {step}")?;
        }
        Ok(())
    }
}

/// Error returned from simulation and batch operations.
///
/// Carries the failing run's identity so a batch caller can tell which
/// configuration failed.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationError {
    /// The underlying error.
    pub kind: SimulationErrorKind,
    /// Identity of the failing run.
    pub context: RunContext,
}

impl SimulationError {
    pub(crate) fn new(kind: impl Into<SimulationErrorKind>, context: RunContext) -> Self {
        Self {
            kind: kind.into(),
            context,
        }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.context)
    }
}

impl Error for SimulationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            SimulationErrorKind::Config(e) => Some(e),
            SimulationErrorKind::Model(e) => Some(e),
            SimulationErrorKind::Space(e) => Some(e),
            SimulationErrorKind::Core(e) => Some(e),
            SimulationErrorKind::Compare(e) => Some(e),
            SimulationErrorKind::AlreadyFinished | SimulationErrorKind::WorkerPanicked => None,
        }
    }
}

impl From<ConfigError> for SimulationErrorKind {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ModelError> for SimulationErrorKind {
    fn from(e: ModelError) -> Self {
        Self::Model(e)
    }
}

impl From<SpaceError> for SimulationErrorKind {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

impl From<CoreError> for SimulationErrorKind {
    fn from(e: CoreError) -> Self {
        Self::Core(e)
    }
}

impl From<CompareError> for SimulationErrorKind {
    fn from(e: CompareError) -> Self {
        Self::Compare(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use windcast_core::{CapacityPercentile, Density};

    #[test]
    fn display_names_the_run() {
        let err = SimulationError::new(
            ModelError::NoReferenceIntercept,
            RunContext {
                study_area: StudyArea::new("Iowa").unwrap(),
                resolution: Resolution::new(Density::Acres25, CapacityPercentile::P20),
                config: Some(PredictorConfig::Full),
                step: Some(StepIndex(3)),
            },
        );
        let text = err.to_string();
        assert!(text.contains("Iowa"), "{text}");
        assert!(text.contains("step 3"), "{text}");
        assert!(err.source().is_some());
    }

    #[test]
    fn already_finished_has_no_source() {
        let err = SimulationError::new(
            SimulationErrorKind::AlreadyFinished,
            RunContext {
                study_area: StudyArea::conus(),
                resolution: Resolution::new(Density::Acres85, CapacityPercentile::P100),
                config: None,
                step: None,
            },
        );
        assert!(err.source().is_none());
    }
}
