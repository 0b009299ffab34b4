//! Contingency table of null versus target classification buckets.

use serde::{Deserialize, Serialize};
use std::fmt;

use windcast_core::{CellClassification, ConversionState, StepIndex};

use crate::error::CompareError;

/// Classification bucket of a cell with no pre-existing facility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bucket {
    /// Still without a facility at the end of the run.
    NotConverted,
    /// Converted at the given step.
    Step(StepIndex),
}

impl Bucket {
    /// Row/column index: 0 for not converted, `k` for step `k`.
    pub fn index(&self) -> usize {
        match self {
            Self::NotConverted => 0,
            Self::Step(s) => s.0 as usize,
        }
    }

    /// Bucket at a row/column index.
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            Self::NotConverted
        } else {
            Self::Step(StepIndex(index as u32))
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConverted => f.write_str("N"),
            Self::Step(s) => write!(f, "Y (step {s})"),
        }
    }
}

/// Counts of cells per (null bucket, target bucket) pair.
///
/// Rows are the null configuration's buckets and columns the target's.
/// With the default six-step horizon this is a 7×7 table; row and
/// column totals make up the eighth row and column of the printed form.
/// Cells holding a facility before the run are not counted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisagreementTable {
    buckets: usize,
    counts: Vec<u64>,
}

impl DisagreementTable {
    /// An all-zero table for a horizon of `steps` steps.
    pub fn new(steps: u32) -> Self {
        let buckets = steps as usize + 1;
        Self {
            buckets,
            counts: vec![0; buckets * buckets],
        }
    }

    /// Cross-tabulate two final classifications of the same cells.
    pub fn from_classifications(
        null: &[CellClassification],
        other: &[CellClassification],
        steps: u32,
    ) -> Result<Self, CompareError> {
        if null.len() != other.len() {
            return Err(CompareError::LengthMismatch {
                null: null.len(),
                other: other.len(),
            });
        }
        let mut table = Self::new(steps);
        for (position, (n, o)) in null.iter().zip(other).enumerate() {
            if n.id != o.id {
                return Err(CompareError::CellMismatch {
                    position,
                    null: n.id,
                    other: o.id,
                });
            }
            match (bucket_of(n, steps)?, bucket_of(o, steps)?) {
                (Some(row), Some(col)) => table.record(row, col),
                (None, None) => {}
                _ => return Err(CompareError::ExistingMismatch { id: n.id }),
            }
        }
        Ok(table)
    }

    /// Count one cell.
    ///
    /// # Panics
    ///
    /// Panics if either bucket lies beyond the table's horizon.
    pub fn record(&mut self, null: Bucket, other: Bucket) {
        let i = null.index() * self.buckets + other.index();
        self.counts[i] += 1;
    }

    /// Number of buckets per axis.
    pub fn buckets(&self) -> usize {
        self.buckets
    }

    /// Cells in null bucket `row` and target bucket `col`.
    pub fn count(&self, row: usize, col: usize) -> u64 {
        self.counts[row * self.buckets + col]
    }

    /// Cells the null configuration placed in bucket `k`.
    pub fn row_total(&self, k: usize) -> u64 {
        (0..self.buckets).map(|c| self.count(k, c)).sum()
    }

    /// Cells the target configuration placed in bucket `k`.
    pub fn col_total(&self, k: usize) -> u64 {
        (0..self.buckets).map(|r| self.count(r, k)).sum()
    }

    /// Cells both configurations placed in bucket `k`.
    pub fn diagonal(&self, k: usize) -> u64 {
        self.count(k, k)
    }

    /// Grand total of counted cells.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Rows including a trailing totals column, followed by the totals
    /// row, as printed in reports.
    pub fn with_totals(&self) -> Vec<Vec<u64>> {
        let mut rows: Vec<Vec<u64>> = (0..self.buckets)
            .map(|r| {
                let mut row: Vec<u64> = (0..self.buckets).map(|c| self.count(r, c)).collect();
                row.push(self.row_total(r));
                row
            })
            .collect();
        let mut bottom: Vec<u64> = (0..self.buckets).map(|c| self.col_total(c)).collect();
        bottom.push(self.total());
        rows.push(bottom);
        rows
    }
}

fn bucket_of(cell: &CellClassification, steps: u32) -> Result<Option<Bucket>, CompareError> {
    match cell.state {
        ConversionState::ExistingPriorToRun => Ok(None),
        ConversionState::NeverConverted => Ok(Some(Bucket::NotConverted)),
        ConversionState::Converted(step) if step.0 >= 1 && step.0 <= steps => {
            Ok(Some(Bucket::Step(step)))
        }
        ConversionState::Converted(step) => Err(CompareError::StepOutOfRange {
            id: cell.id,
            step,
            steps,
        }),
    }
}
