//! Error types for geometry construction and neighbor queries.

use std::error::Error;
use std::fmt;

use windcast_core::{CellId, CoreError};

/// Errors arising from spatial construction or neighbor queries.
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceError {
    /// Attempted to construct a grid with zero cells.
    EmptySpace,
    /// A grid dimension exceeds the supported range.
    DimensionTooLarge {
        /// Which dimension (`"rows"` or `"cols"`).
        name: &'static str,
        /// The requested size.
        value: u32,
        /// Largest accepted size.
        max: u32,
    },
    /// Ring count outside `1..=100`.
    InvalidRingCount {
        /// The rejected ring count.
        rings: u32,
    },
    /// A search radius is negative, NaN, or infinite.
    InvalidRadius {
        /// The rejected radius.
        value: f64,
    },
    /// A hexagon side length or area is not finite and positive.
    InvalidSideLength {
        /// The rejected value.
        value: f64,
    },
    /// The queried cell is unknown to the neighbor source.
    UnknownCell {
        /// The missing identifier.
        id: CellId,
    },
    /// A cell was registered twice.
    DuplicateCell {
        /// The repeated identifier.
        id: CellId,
    },
    /// A neighbor scan was stopped by its progress hook.
    Cancelled {
        /// Cells scanned before cancellation.
        scanned: usize,
        /// Cells in the landscape.
        total: usize,
    },
    /// An external neighbor source failed.
    QueryFailed {
        /// The cell being queried.
        id: CellId,
        /// Human-readable description of the failure.
        reason: String,
    },
    /// A core data-model error surfaced during a scan.
    Core(CoreError),
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySpace => write!(f, "space must have at least one cell"),
            Self::DimensionTooLarge { name, value, max } => {
                write!(f, "{name} {value} exceeds maximum {max}")
            }
            Self::InvalidRingCount { rings } => {
                write!(f, "ring count must be in 1..=100, got {rings}")
            }
            Self::InvalidRadius { value } => {
                write!(f, "search radius must be finite and non-negative, got {value}")
            }
            Self::InvalidSideLength { value } => {
                write!(f, "hexagon size must be finite and positive, got {value}")
            }
            Self::UnknownCell { id } => write!(f, "cell {id} is unknown to the neighbor source"),
            Self::DuplicateCell { id } => write!(f, "cell {id} registered twice"),
            Self::Cancelled { scanned, total } => {
                write!(f, "neighbor scan cancelled after {scanned} of {total} cells")
            }
            Self::QueryFailed { id, reason } => {
                write!(f, "neighbor query for cell {id} failed: {reason}")
            }
            Self::Core(e) => write!(f, "core: {e}"),
        }
    }
}

impl Error for SpaceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Core(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CoreError> for SpaceError {
    fn from(e: CoreError) -> Self {
        Self::Core(e)
    }
}
