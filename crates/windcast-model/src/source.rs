//! The [`ModelSource`] collaborator trait.

use windcast_core::{PredictorConfig, Resolution, StudyArea};

use crate::coefficients::CoefficientSet;
use crate::error::ModelError;

/// Supplies base coefficients produced by the model-fitting pipeline.
///
/// Implementations return `Err(ModelError::MissingModel)` when nothing
/// was fitted for the key. Callers resolve fallback areas (see
/// [`StudyArea::model_area`]) before asking.
pub trait ModelSource: Send + Sync {
    /// Step-0 coefficients and intercept for one configuration.
    fn fitted_model(
        &self,
        study_area: &StudyArea,
        resolution: Resolution,
        config: PredictorConfig,
    ) -> Result<CoefficientSet, ModelError>;
}

impl<T: ModelSource + ?Sized> ModelSource for &T {
    fn fitted_model(
        &self,
        study_area: &StudyArea,
        resolution: Resolution,
        config: PredictorConfig,
    ) -> Result<CoefficientSet, ModelError> {
        (**self).fitted_model(study_area, resolution, config)
    }
}
