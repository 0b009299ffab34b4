//! Neighborhood-effect tracking.
//!
//! A cell's factor is the fraction of its neighbors that hold a
//! facility. Factors are computed once against the state before the
//! run, then refreshed after each step for the cells around that step's
//! conversions only.

use windcast_core::ConversionState;
use windcast_space::NeighborTable;

/// Per-cell neighborhood factors for one simulation.
#[derive(Clone, Debug)]
pub struct NeighborhoodTracker {
    initial: Vec<f64>,
    current: Vec<f64>,
    /// Scratch marks for the cells refreshed by one update.
    dirty: Vec<bool>,
}

impl NeighborhoodTracker {
    /// Full scan over every cell.
    ///
    /// # Panics
    ///
    /// Panics if `states` and `table` cover different numbers of cells.
    pub fn new(table: &NeighborTable, states: &[ConversionState]) -> Self {
        assert_eq!(table.len(), states.len(), "neighbor table and states disagree");
        let initial: Vec<f64> = (0..states.len()).map(|pos| ratio(table, states, pos)).collect();
        Self {
            current: initial.clone(),
            initial,
            dirty: vec![false; states.len()],
        }
    }

    /// Refresh the neighbors of newly converted cells.
    ///
    /// Each affected cell is re-read against its full neighbor list, so
    /// several conversions around one cell within a step are counted
    /// once each. Returns the number of cells recomputed.
    pub fn update(
        &mut self,
        table: &NeighborTable,
        states: &[ConversionState],
        newly_converted: &[usize],
    ) -> usize {
        let mut touched: Vec<usize> = Vec::new();
        for &pos in newly_converted {
            for &n in table.neighbors(pos) {
                let n = n as usize;
                if !self.dirty[n] {
                    self.dirty[n] = true;
                    touched.push(n);
                }
            }
        }
        for &n in &touched {
            self.current[n] = ratio(table, states, n);
            self.dirty[n] = false;
        }
        touched.len()
    }

    /// Current factor of the cell at `pos`.
    pub fn factor(&self, pos: usize) -> f64 {
        self.current[pos]
    }

    /// Factor computed before the first step.
    pub fn initial(&self, pos: usize) -> f64 {
        self.initial[pos]
    }

    /// Current factors in position order.
    pub fn factors(&self) -> &[f64] {
        &self.current
    }

    /// Initial factors in position order.
    pub fn initial_factors(&self) -> &[f64] {
        &self.initial
    }
}

/// Converted neighbors over all neighbors; 0 for an isolated cell.
fn ratio(table: &NeighborTable, states: &[ConversionState], pos: usize) -> f64 {
    let neighbors = table.neighbors(pos);
    if neighbors.is_empty() {
        return 0.0;
    }
    let converted = neighbors
        .iter()
        .filter(|&&n| states[n as usize].is_converted())
        .count();
    converted as f64 / neighbors.len() as f64
}
