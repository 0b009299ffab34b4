//! Error types shared by the Windcast crates.

use std::error::Error;
use std::fmt;

use crate::id::CellId;

/// Errors from building or querying the core data model.
#[derive(Clone, Debug, PartialEq)]
pub enum CoreError {
    /// A name did not match any known value of an enumerated kind.
    UnknownName {
        /// What was being parsed (e.g. `"study area"`).
        kind: &'static str,
        /// The offending input.
        name: String,
    },
    /// Two cell records share the same identifier.
    DuplicateCell {
        /// The repeated identifier.
        id: CellId,
    },
    /// A cell identifier is not part of the landscape.
    UnknownCell {
        /// The missing identifier.
        id: CellId,
    },
    /// A landscape was built from zero cell records.
    EmptyLandscape,
    /// A predictor value is NaN or infinite.
    NonFinitePredictor {
        /// Cell carrying the value.
        id: CellId,
        /// Predictor name.
        predictor: String,
    },
    /// Cells disagree on which predictors they carry.
    InconsistentPredictors {
        /// First cell lacking the predictor.
        id: CellId,
        /// Predictor present elsewhere but missing here.
        predictor: String,
    },
    /// A collaborator failed to supply data.
    SourceFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownName { kind, name } => write!(f, "unknown {kind} '{name}'"),
            Self::DuplicateCell { id } => write!(f, "duplicate cell id {id}"),
            Self::UnknownCell { id } => write!(f, "cell {id} is not part of the landscape"),
            Self::EmptyLandscape => write!(f, "landscape must contain at least one cell"),
            Self::NonFinitePredictor { id, predictor } => {
                write!(f, "predictor '{predictor}' of cell {id} is not finite")
            }
            Self::InconsistentPredictors { id, predictor } => {
                write!(f, "cell {id} is missing predictor '{predictor}'")
            }
            Self::SourceFailed { reason } => write!(f, "cell source failed: {reason}"),
        }
    }
}

impl Error for CoreError {}
