//! The [`NeighborSource`] trait.

use windcast_core::CellId;

use crate::error::SpaceError;

/// Answers "which cells lie within distance D of cell C".
///
/// This is the only spatial capability the simulation consumes. It is
/// queried once per cell while building a
/// [`NeighborTable`](crate::NeighborTable), never during stepping.
///
/// # Contract
///
/// - The result never contains `cell` itself.
/// - The result is deterministic for a given `(cell, radius)`.
/// - Order is not significant; callers sort and deduplicate.
///
/// `Sync` is required so independent configurations can share one
/// source across threads.
pub trait NeighborSource: Send + Sync {
    /// Cells whose centroids lie within `radius` metres of `cell`'s.
    fn find_neighbors(&self, cell: CellId, radius: f64) -> Result<Vec<CellId>, SpaceError>;
}

impl<T: NeighborSource + ?Sized> NeighborSource for &T {
    fn find_neighbors(&self, cell: CellId, radius: f64) -> Result<Vec<CellId>, SpaceError> {
        (**self).find_neighbors(cell, radius)
    }
}

/// Reject radii a source cannot answer.
pub(crate) fn check_radius(radius: f64) -> Result<(), SpaceError> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(SpaceError::InvalidRadius { value: radius });
    }
    Ok(())
}

/// Relative slack applied to the radius comparison so that cells exactly
/// on the boundary (e.g. ring corners) are not lost to rounding.
pub(crate) const RADIUS_TOLERANCE: f64 = 1e-9;
