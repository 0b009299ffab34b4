//! Reusable synthetic landscapes.
//!
//! - [`hex_landscape`]: a hex grid whose cells carry one predictor `x`.
//! - [`military_hex_landscape`]: the same grid with some cells flagged
//!   as military land.
//! - [`ten_cell_grid`]: the 2×5 grid with two existing facilities used
//!   by the end-to-end tests.
//! - [`sited_records`]: records with raw siting attributes for
//!   constraint tests.

use windcast_core::{
    AttributeValue, CapacityPercentile, CellId, CellRecord, Density, Landscape, Resolution,
};
use windcast_model::CoefficientSet;
use windcast_space::{HexGeometry, HexGrid};

/// 85 acres/MW at the 100th capacity percentile.
pub fn default_resolution() -> Resolution {
    Resolution::new(Density::Acres85, CapacityPercentile::P100)
}

/// A `rows × cols` grid at [`default_resolution`].
///
/// Each cell carries predictor `x = predictor(id)`; ids in `existing`
/// start with a facility.
pub fn hex_landscape(
    rows: u32,
    cols: u32,
    existing: &[u32],
    predictor: impl Fn(CellId) -> f64,
) -> (Landscape, HexGrid) {
    military_hex_landscape(rows, cols, existing, predictor, &[])
}

/// Like [`hex_landscape`], with a `Military` flag on the ids in
/// `military`. The default constraint set prohibits those cells.
pub fn military_hex_landscape(
    rows: u32,
    cols: u32,
    existing: &[u32],
    predictor: impl Fn(CellId) -> f64,
    military: &[u32],
) -> (Landscape, HexGrid) {
    let geometry = HexGeometry::from_resolution(default_resolution());
    let grid = HexGrid::new(rows, cols, geometry).expect("valid grid dimensions");
    let records = grid
        .ids()
        .map(|id| {
            let record = CellRecord::new(id, existing.contains(&id.0))
                .with_predictor("x", predictor(id));
            if military.contains(&id.0) {
                record.with_attribute("Military", AttributeValue::Flag(true))
            } else {
                record
            }
        })
        .collect();
    let landscape = Landscape::new(records).expect("valid landscape");
    (landscape, grid)
}

/// Ten cells in two rows of five, with facilities on cells 0 and 1.
///
/// `x` is a fixed permutation, so probabilities are distinct.
pub fn ten_cell_grid() -> (Landscape, HexGrid) {
    const X: [f64; 10] = [0.3, -0.2, 1.1, -0.7, 0.5, 0.9, -1.3, 0.1, 1.6, -0.4];
    hex_landscape(2, 5, &[0, 1], |id| X[id.0 as usize])
}

/// Base coefficients scoring on `x` alone.
pub fn x_model(intercept: f64, coefficient: f64) -> CoefficientSet {
    CoefficientSet::intercept_only(intercept).with("x", coefficient)
}

/// Records with raw siting attributes.
///
/// Cell `i` has wind speed `3 + i` m/s, airport distance `1000 · (i + 1)`
/// m and a military flag on every fourth cell.
pub fn sited_records(n: u32) -> Vec<CellRecord> {
    (0..n)
        .map(|i| {
            CellRecord::new(CellId(i), false)
                .with_predictor("x", f64::from(i))
                .with_attribute("Avg_Wind", AttributeValue::Number(3.0 + f64::from(i)))
                .with_attribute("Near_Air", AttributeValue::Number(1000.0 * f64::from(i + 1)))
                .with_attribute("Military", AttributeValue::Flag(i % 4 == 3))
        })
        .collect()
}
