//! Mutable per-configuration simulation state.

use windcast_core::{ConversionState, Landscape, StepIndex};

/// Evolving per-cell fields of one configuration's run.
///
/// Each configuration owns its own state; nothing here is shared between
/// configurations. The landscape's predictor vectors stay untouched.
#[derive(Clone, Debug)]
pub struct SimulationState {
    states: Vec<ConversionState>,
    scores: Vec<f64>,
    /// Probability of every cell, one row per executed step.
    probabilities: Vec<Vec<f64>>,
    converted: usize,
}

impl SimulationState {
    /// State before the first step.
    pub fn new(landscape: &Landscape) -> Self {
        Self {
            states: landscape.initial_states().to_vec(),
            scores: vec![0.0; landscape.len()],
            probabilities: Vec::new(),
            converted: 0,
        }
    }

    /// Conversion state of every cell.
    pub fn states(&self) -> &[ConversionState] {
        &self.states
    }

    /// Composite scores from the latest step.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub(crate) fn scores_mut(&mut self) -> &mut [f64] {
        &mut self.scores
    }

    /// Record the probabilities computed at a step.
    pub(crate) fn push_probabilities(&mut self, row: Vec<f64>) {
        self.probabilities.push(row);
    }

    /// Probabilities per executed step (row `k` is step `k + 1`).
    pub fn probabilities(&self) -> &[Vec<f64>] {
        &self.probabilities
    }

    /// Mark the cell at `pos` converted at `step`.
    ///
    /// Returns `false` and leaves the cell alone if it already holds a
    /// facility.
    pub fn convert(&mut self, pos: usize, step: StepIndex) -> bool {
        match self.states[pos] {
            ConversionState::NeverConverted => {
                self.states[pos] = ConversionState::Converted(step);
                self.converted += 1;
                true
            }
            _ => false,
        }
    }

    /// Cells converted during the run so far.
    pub fn converted_count(&self) -> usize {
        self.converted
    }

    pub(crate) fn into_parts(self) -> (Vec<ConversionState>, Vec<Vec<f64>>) {
        (self.states, self.probabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use windcast_core::{CellId, CellRecord};

    #[test]
    fn conversion_is_monotonic() {
        let landscape = Landscape::new(vec![
            CellRecord::new(CellId(0), true),
            CellRecord::new(CellId(1), false),
        ])
        .unwrap();
        let mut s = SimulationState::new(&landscape);
        assert!(!s.convert(0, StepIndex(1)));
        assert!(s.convert(1, StepIndex(1)));
        assert!(!s.convert(1, StepIndex(2)));
        assert_eq!(s.states()[1], ConversionState::Converted(StepIndex(1)));
        assert_eq!(s.states()[0], ConversionState::ExistingPriorToRun);
        assert_eq!(s.converted_count(), 1);
    }
}
