//! Collaborator trait for retrieving cell records.

use crate::area::{Resolution, StudyArea};
use crate::cell::CellRecord;
use crate::error::CoreError;

/// Supplies the grid cells of a study area at a given resolution.
///
/// Implemented by whatever owns the spatial data store. Calls are
/// synchronous; an asynchronous host should treat each call as a
/// potential suspension point.
pub trait CellSource: Send + Sync {
    /// Every cell of `area` at `resolution`, with raw attributes and
    /// prior conversion state.
    fn cell_records(
        &self,
        area: &StudyArea,
        resolution: Resolution,
    ) -> Result<Vec<CellRecord>, CoreError>;
}
