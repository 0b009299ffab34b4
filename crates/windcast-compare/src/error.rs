//! Error types for configuration comparison.

use std::error::Error;
use std::fmt;

use windcast_core::{CellId, StepIndex};

/// Errors arising when two classifications cannot be cross-tabulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    /// The classifications cover different numbers of cells.
    LengthMismatch {
        /// Cells in the null classification.
        null: usize,
        /// Cells in the target classification.
        other: usize,
    },
    /// The classifications list different cells at the same position.
    CellMismatch {
        /// Position of the first disagreement.
        position: usize,
        /// Cell in the null classification.
        null: CellId,
        /// Cell in the target classification.
        other: CellId,
    },
    /// A cell is pre-existing in one classification but not the other.
    ExistingMismatch {
        /// The cell.
        id: CellId,
    },
    /// A cell converted at a step beyond the compared horizon.
    StepOutOfRange {
        /// The cell.
        id: CellId,
        /// Its conversion step.
        step: StepIndex,
        /// Number of steps being compared.
        steps: u32,
    },
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { null, other } => {
                write!(f, "null classification has {null} cells, target has {other}")
            }
            Self::CellMismatch {
                position,
                null,
                other,
            } => write!(
                f,
                "classifications disagree at position {position}: cell {null} vs cell {other}"
            ),
            Self::ExistingMismatch { id } => {
                write!(f, "cell {id} is pre-existing in only one classification")
            }
            Self::StepOutOfRange { id, step, steps } => {
                write!(f, "cell {id} converted at step {step}, beyond {steps} compared steps")
            }
        }
    }
}

impl Error for CompareError {}
