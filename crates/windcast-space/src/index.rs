//! Uniform-bucket index over arbitrary cell centroids.

use smallvec::SmallVec;
use std::collections::HashMap;
use windcast_core::CellId;

use crate::error::SpaceError;
use crate::source::{check_radius, NeighborSource, RADIUS_TOLERANCE};

type Bucket = (i64, i64);

/// Cell centroids bucketed on a square grid for radius queries.
///
/// A query scans only the buckets overlapping the search disk, so cost
/// is proportional to the number of cells near the query point rather
/// than to the size of the whole index. Bucket size should be on the
/// order of the typical search radius.
///
/// # Examples
///
/// ```
/// use windcast_core::CellId;
/// use windcast_space::{CentroidIndex, NeighborSource};
///
/// let mut index = CentroidIndex::new(10.0).unwrap();
/// index.insert(CellId(0), 0.0, 0.0).unwrap();
/// index.insert(CellId(1), 3.0, 4.0).unwrap();
/// index.insert(CellId(2), 30.0, 0.0).unwrap();
///
/// assert_eq!(index.find_neighbors(CellId(0), 5.0).unwrap(), vec![CellId(1)]);
/// ```
#[derive(Debug, Clone)]
pub struct CentroidIndex {
    bucket_size: f64,
    points: HashMap<CellId, (f64, f64)>,
    buckets: HashMap<Bucket, SmallVec<[CellId; 8]>>,
}

impl CentroidIndex {
    /// Create an empty index with square buckets of `bucket_size` metres.
    pub fn new(bucket_size: f64) -> Result<Self, SpaceError> {
        if !bucket_size.is_finite() || bucket_size <= 0.0 {
            return Err(SpaceError::InvalidSideLength { value: bucket_size });
        }
        Ok(Self {
            bucket_size,
            points: HashMap::new(),
            buckets: HashMap::new(),
        })
    }

    /// Build an index from `(id, x, y)` triples.
    pub fn from_points<I>(bucket_size: f64, points: I) -> Result<Self, SpaceError>
    where
        I: IntoIterator<Item = (CellId, f64, f64)>,
    {
        let mut index = Self::new(bucket_size)?;
        for (id, x, y) in points {
            index.insert(id, x, y)?;
        }
        Ok(index)
    }

    /// Register a centroid.
    pub fn insert(&mut self, id: CellId, x: f64, y: f64) -> Result<(), SpaceError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(SpaceError::QueryFailed {
                id,
                reason: format!("centroid ({x}, {y}) is not finite"),
            });
        }
        if self.points.insert(id, (x, y)).is_some() {
            return Err(SpaceError::DuplicateCell { id });
        }
        self.buckets.entry(self.bucket_of(x, y)).or_default().push(id);
        Ok(())
    }

    /// Number of indexed cells.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the index holds no cells.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Centroid of an indexed cell.
    pub fn centroid(&self, id: CellId) -> Option<(f64, f64)> {
        self.points.get(&id).copied()
    }

    fn bucket_of(&self, x: f64, y: f64) -> Bucket {
        (
            (x / self.bucket_size).floor() as i64,
            (y / self.bucket_size).floor() as i64,
        )
    }
}

impl NeighborSource for CentroidIndex {
    fn find_neighbors(&self, cell: CellId, radius: f64) -> Result<Vec<CellId>, SpaceError> {
        check_radius(radius)?;
        let (cx, cy) = self
            .centroid(cell)
            .ok_or(SpaceError::UnknownCell { id: cell })?;
        let reach = radius * (1.0 + RADIUS_TOLERANCE);
        let reach_sq = reach * reach;
        let (bx0, by0) = self.bucket_of(cx - reach, cy - reach);
        let (bx1, by1) = self.bucket_of(cx + reach, cy + reach);

        let mut out = Vec::new();
        for by in by0..=by1 {
            for bx in bx0..=bx1 {
                let Some(bucket) = self.buckets.get(&(bx, by)) else {
                    continue;
                };
                for &id in bucket {
                    if id == cell {
                        continue;
                    }
                    let (x, y) = self.points[&id];
                    let (dx, dy) = (x - cx, y - cy);
                    if dx * dx + dy * dy <= reach_sq {
                        out.push(id);
                    }
                }
            }
        }
        out.sort_unstable();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn line(n: u32, spacing: f64) -> CentroidIndex {
        CentroidIndex::from_points(spacing, (0..n).map(|i| (CellId(i), i as f64 * spacing, 0.0)))
            .unwrap()
    }

    #[test]
    fn excludes_self_and_far_cells() {
        let idx = line(10, 1.0);
        assert_eq!(
            idx.find_neighbors(CellId(5), 1.0).unwrap(),
            vec![CellId(4), CellId(6)]
        );
    }

    #[test]
    fn boundary_distance_is_inclusive() {
        let idx = line(3, 0.1);
        // Cell 2 sits exactly on the radius.
        assert_eq!(
            idx.find_neighbors(CellId(0), 0.2).unwrap(),
            vec![CellId(1), CellId(2)]
        );
    }

    #[test]
    fn isolated_cell_has_no_neighbors() {
        let idx = CentroidIndex::from_points(
            5.0,
            vec![(CellId(0), 0.0, 0.0), (CellId(1), 100.0, 100.0)],
        )
        .unwrap();
        assert!(idx.find_neighbors(CellId(0), 10.0).unwrap().is_empty());
    }

    #[test]
    fn unknown_cell_and_bad_radius() {
        let idx = line(2, 1.0);
        assert_eq!(
            idx.find_neighbors(CellId(9), 1.0),
            Err(SpaceError::UnknownCell { id: CellId(9) })
        );
        assert!(matches!(
            idx.find_neighbors(CellId(0), -1.0),
            Err(SpaceError::InvalidRadius { .. })
        ));
    }

    #[test]
    fn duplicate_insert_rejected() {
        let mut idx = CentroidIndex::new(1.0).unwrap();
        idx.insert(CellId(1), 0.0, 0.0).unwrap();
        assert_eq!(
            idx.insert(CellId(1), 2.0, 2.0),
            Err(SpaceError::DuplicateCell { id: CellId(1) })
        );
    }

    proptest! {
        #[test]
        fn matches_brute_force(
            pts in prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 1..60),
            radius in 0.0f64..30.0,
            bucket in 1.0f64..20.0,
        ) {
            let idx = CentroidIndex::from_points(
                bucket,
                pts.iter().enumerate().map(|(i, (x, y))| (CellId(i as u32), *x, *y)),
            ).unwrap();
            let (cx, cy) = pts[0];
            let mut expected: Vec<CellId> = pts
                .iter()
                .enumerate()
                .skip(1)
                .filter(|(_, (x, y))| {
                    let d = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
                    d <= radius * (1.0 + RADIUS_TOLERANCE)
                })
                .map(|(i, _)| CellId(i as u32))
                .collect();
            expected.sort_unstable();
            prop_assert_eq!(idx.find_neighbors(CellId(0), radius).unwrap(), expected);
        }
    }
}
