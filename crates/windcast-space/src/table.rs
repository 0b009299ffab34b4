//! Precomputed neighbor lists in compressed sparse row form.

use std::ops::ControlFlow;

use windcast_core::Landscape;

use crate::error::SpaceError;
use crate::source::NeighborSource;

/// Progress of a neighbor scan, reported after each cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanProgress {
    /// Cells whose neighbors have been resolved.
    pub scanned: usize,
    /// Cells in the landscape.
    pub total: usize,
}

/// Neighbor positions of every cell in a [`Landscape`].
///
/// Lists hold landscape positions (not ids), sorted ascending, without
/// duplicates and without the cell itself. Cells the source reports
/// but the landscape does not contain are dropped: only cells delivered
/// for the study area take part in the simulation.
#[derive(Clone, Debug)]
pub struct NeighborTable {
    offsets: Vec<usize>,
    targets: Vec<u32>,
}

impl NeighborTable {
    /// Resolve every cell's neighbors within `radius` metres.
    pub fn build(
        landscape: &Landscape,
        source: &dyn NeighborSource,
        radius: f64,
    ) -> Result<Self, SpaceError> {
        Self::build_with_progress(landscape, source, radius, &mut |_| ControlFlow::Continue(()))
    }

    /// Like [`build`](Self::build), calling `progress` after each cell.
    ///
    /// Returning `ControlFlow::Break` from the hook abandons the scan
    /// with [`SpaceError::Cancelled`].
    pub fn build_with_progress(
        landscape: &Landscape,
        source: &dyn NeighborSource,
        radius: f64,
        progress: &mut dyn FnMut(ScanProgress) -> ControlFlow<()>,
    ) -> Result<Self, SpaceError> {
        let total = landscape.len();
        let mut offsets = Vec::with_capacity(total + 1);
        let mut targets = Vec::new();
        offsets.push(0);

        let mut row: Vec<u32> = Vec::new();
        for (pos, &id) in landscape.ids().iter().enumerate() {
            row.clear();
            for found in source.find_neighbors(id, radius)? {
                match landscape.position(found) {
                    Some(p) if p != pos => row.push(p as u32),
                    _ => {}
                }
            }
            row.sort_unstable();
            row.dedup();
            targets.extend_from_slice(&row);
            offsets.push(targets.len());

            let report = ScanProgress {
                scanned: pos + 1,
                total,
            };
            if progress(report).is_break() {
                return Err(SpaceError::Cancelled {
                    scanned: report.scanned,
                    total,
                });
            }
        }

        tracing::debug!(cells = total, links = targets.len(), radius, "neighbor table built");
        Ok(Self { offsets, targets })
    }

    /// Neighbor positions of the cell at `pos`.
    pub fn neighbors(&self, pos: usize) -> &[u32] {
        &self.targets[self.offsets[pos]..self.offsets[pos + 1]]
    }

    /// Number of neighbors of the cell at `pos`.
    pub fn degree(&self, pos: usize) -> usize {
        self.offsets[pos + 1] - self.offsets[pos]
    }

    /// Number of cells covered.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Whether the table covers no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of all neighbor list lengths.
    pub fn total_links(&self) -> usize {
        self.targets.len()
    }
}
