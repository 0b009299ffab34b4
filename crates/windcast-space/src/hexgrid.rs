//! Rectangular patch of pointy-top hexagons with axial coordinates.

use windcast_core::CellId;

use crate::error::SpaceError;
use crate::geometry::HexGeometry;
use crate::source::{check_radius, NeighborSource, RADIUS_TOLERANCE};

/// A hexagonal grid of `rows * cols` cells with physical centroids.
///
/// Each cell has axial coordinate `(q, r)` with `0 <= q < cols` and
/// `0 <= r < rows`. Cell ids follow the canonical r-then-q ordering:
/// `id = r * cols + q`.
///
/// Centroids use the pointy-top layout, `x = s·√3·(q + r/2)` and
/// `y = 1.5·s·r`, so adjacent centroids are exactly
/// [`centroid_spacing_m`](HexGeometry::centroid_spacing_m) apart and a
/// search radius of `k` spacings reaches every cell within `k` rings.
/// Boundary behavior is Absorb: edge cells simply have fewer neighbors.
///
/// # Examples
///
/// ```
/// use windcast_core::CellId;
/// use windcast_space::{HexGeometry, HexGrid, NeighborSource, RingCount};
///
/// let geometry = HexGeometry::from_area(1_000_000.0).unwrap();
/// let grid = HexGrid::new(5, 5, geometry).unwrap();
/// assert_eq!(grid.cell_count(), 25);
///
/// let radius = geometry.search_radius_m(RingCount::new(1).unwrap());
/// // Interior cell (2, 2) has 6 neighbours.
/// let centre = grid.cell_id(2, 2).unwrap();
/// assert_eq!(grid.find_neighbors(centre, radius).unwrap().len(), 6);
/// // Corner cell (0, 0) has 2.
/// assert_eq!(grid.find_neighbors(CellId(0), radius).unwrap().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct HexGrid {
    rows: u32,
    cols: u32,
    geometry: HexGeometry,
}

impl HexGrid {
    /// Maximum dimension size: axial coordinates use `i32` and ids `u32`.
    pub const MAX_DIM: u32 = u16::MAX as u32;

    /// Create a new hex grid with `rows * cols` cells.
    ///
    /// Returns `Err(SpaceError::EmptySpace)` if either dimension is 0, or
    /// `Err(SpaceError::DimensionTooLarge)` if either exceeds
    /// [`MAX_DIM`](Self::MAX_DIM).
    pub fn new(rows: u32, cols: u32, geometry: HexGeometry) -> Result<Self, SpaceError> {
        if rows == 0 || cols == 0 {
            return Err(SpaceError::EmptySpace);
        }
        if rows > Self::MAX_DIM {
            return Err(SpaceError::DimensionTooLarge {
                name: "rows",
                value: rows,
                max: Self::MAX_DIM,
            });
        }
        if cols > Self::MAX_DIM {
            return Err(SpaceError::DimensionTooLarge {
                name: "cols",
                value: cols,
                max: Self::MAX_DIM,
            });
        }
        Ok(Self {
            rows,
            cols,
            geometry,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        (self.rows as usize) * (self.cols as usize)
    }

    /// Hexagon dimensions.
    pub fn geometry(&self) -> HexGeometry {
        self.geometry
    }

    /// Every cell id in canonical order.
    pub fn ids(&self) -> impl Iterator<Item = CellId> {
        (0..self.rows * self.cols).map(CellId)
    }

    /// Id of the cell at axial `(q, r)`, if in bounds.
    pub fn cell_id(&self, q: i32, r: i32) -> Option<CellId> {
        if q >= 0 && q < self.cols as i32 && r >= 0 && r < self.rows as i32 {
            Some(CellId(r as u32 * self.cols + q as u32))
        } else {
            None
        }
    }

    /// Axial `(q, r)` of a cell, if it belongs to the grid.
    pub fn axial(&self, id: CellId) -> Option<(i32, i32)> {
        if id.0 >= self.rows * self.cols {
            return None;
        }
        Some(((id.0 % self.cols) as i32, (id.0 / self.cols) as i32))
    }

    /// Centroid of a cell in metres.
    pub fn centroid(&self, id: CellId) -> Option<(f64, f64)> {
        self.axial(id).map(|(q, r)| self.centroid_qr(q, r))
    }

    fn centroid_qr(&self, q: i32, r: i32) -> (f64, f64) {
        let s = self.geometry.side_length_m();
        let x = s * 3f64.sqrt() * (f64::from(q) + f64::from(r) / 2.0);
        let y = 1.5 * s * f64::from(r);
        (x, y)
    }

    /// Cube distance between two axial coordinates.
    fn cube_distance(q1: i32, r1: i32, q2: i32, r2: i32) -> i32 {
        let dq = (q1 - q2).abs();
        let dr = (r1 - r2).abs();
        let ds = ((q1 + r1) - (q2 + r2)).abs(); // |ds| where s = -q - r
        dq.max(dr).max(ds)
    }
}

impl NeighborSource for HexGrid {
    fn find_neighbors(&self, cell: CellId, radius: f64) -> Result<Vec<CellId>, SpaceError> {
        check_radius(radius)?;
        let (cq, cr) = self.axial(cell).ok_or(SpaceError::UnknownCell { id: cell })?;
        let (cx, cy) = self.centroid_qr(cq, cr);
        let reach = radius * (1.0 + RADIUS_TOLERANCE);
        let reach_sq = reach * reach;

        // The nearest cell at hex distance k is 1.5·s·k away, so no cell
        // beyond this ring can fall inside the disk.
        let max_useful = (self.rows as u64 + self.cols as u64).min(i32::MAX as u64) as i32;
        let ring_reach = (reach / (1.5 * self.geometry.side_length_m())).floor();
        let k = if ring_reach >= f64::from(max_useful) {
            max_useful
        } else {
            ring_reach as i32 + 1
        };

        let mut out = Vec::new();
        for dr in -k..=k {
            for dq in -k..=k {
                if (dq, dr) == (0, 0) || Self::cube_distance(0, 0, dq, dr) > k {
                    continue;
                }
                let Some(id) = self.cell_id(cq + dq, cr + dr) else {
                    continue;
                };
                let (x, y) = self.centroid_qr(cq + dq, cr + dr);
                let (ex, ey) = (x - cx, y - cy);
                if ex * ex + ey * ey <= reach_sq {
                    out.push(id);
                }
            }
        }
        // Outer loop over r, inner over q: already canonical order.
        Ok(out)
    }
}
