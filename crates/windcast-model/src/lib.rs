//! Coefficient evolution and probability scoring for Windcast.
//!
//! A fitted model supplies a base [`CoefficientSet`] per predictor
//! configuration. A [`Scenario`] names per-predictor percentage deltas;
//! [`CoefficientSchedule`] compounds them into one set per simulated
//! step. [`LinearPredictor`] binds a set to landscape columns and
//! evaluates the logistic probability, which [`CompositeTable`] then
//! combines with eligibility and the neighborhood factor.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod coefficients;
pub mod composite;
pub mod error;
pub mod probability;
pub mod scenario;
pub mod source;

pub use coefficients::{evolve_coefficient, CoefficientSchedule, CoefficientSet, NATIONWIDE_PREDICTORS};
pub use composite::{CompositeTable, ScoreFactors};
pub use error::ModelError;
pub use probability::{logistic, LinearPredictor};
pub use scenario::{Scenario, ScenarioPreset};
pub use source::ModelSource;
