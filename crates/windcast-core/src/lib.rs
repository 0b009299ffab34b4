//! Core types and traits for the Windcast simulation framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Windcast workspace:
//! cell and step identifiers, study-area and grid-resolution identity,
//! the per-cell input record, the validated [`Landscape`], predictor
//! normalization, and the collaborator trait that supplies cell records.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod area;
pub mod cell;
pub mod error;
pub mod id;
pub mod landscape;
pub mod normalize;
pub mod time;
pub mod traits;

pub use area::{CapacityPercentile, Density, Resolution, StudyArea};
pub use cell::{
    AttributeValue, CellClassification, CellRecord, ClusterTag, ConversionState, ModelCellState,
};
pub use error::CoreError;
pub use id::{CellId, PredictorConfig};
pub use landscape::Landscape;
pub use normalize::{NormalizationReport, PredictorNormalizer};
pub use time::{Horizon, StepIndex};
pub use traits::CellSource;
