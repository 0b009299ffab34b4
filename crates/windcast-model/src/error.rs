//! Error types for fitted models, scenarios and scoring.

use std::error::Error;
use std::fmt;

use windcast_core::{CoreError, PredictorConfig, Resolution, StudyArea};

/// Errors arising from model lookup, scenario input, or scoring.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// No fitted model exists for the requested key.
    MissingModel {
        /// Study area the model was requested for.
        study_area: StudyArea,
        /// Grid resolution the model was requested for.
        resolution: Resolution,
        /// Predictor configuration requested.
        config: PredictorConfig,
    },
    /// A coefficient names a predictor the landscape does not carry.
    MissingPredictor {
        /// The predictor name.
        predictor: String,
    },
    /// A coefficient or intercept is NaN or infinite.
    NonFiniteCoefficient {
        /// The predictor name, or `"(intercept)"`.
        predictor: String,
    },
    /// A scenario delta is NaN or infinite.
    NonFiniteDelta {
        /// The predictor name.
        predictor: String,
    },
    /// The null configuration needs an intercept but no fitted
    /// configuration was selected to borrow it from.
    NoReferenceIntercept,
    /// A core data-model error.
    Core(CoreError),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingModel {
                study_area,
                resolution,
                config,
            } => write!(
                f,
                "no fitted model for {study_area} at {resolution} with configuration {config}"
            ),
            Self::MissingPredictor { predictor } => {
                write!(f, "predictor '{predictor}' is not present in the landscape")
            }
            Self::NonFiniteCoefficient { predictor } => {
                write!(f, "coefficient for '{predictor}' is not finite")
            }
            Self::NonFiniteDelta { predictor } => {
                write!(f, "scenario delta for '{predictor}' is not finite")
            }
            Self::NoReferenceIntercept => {
                write!(f, "null configuration requires at least one fitted configuration")
            }
            Self::Core(e) => write!(f, "core: {e}"),
        }
    }
}

impl Error for ModelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Core(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CoreError> for ModelError {
    fn from(e: CoreError) -> Self {
        Self::Core(e)
    }
}
