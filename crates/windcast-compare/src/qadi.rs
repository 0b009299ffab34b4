//! Quantity and allocation disagreement (QADI).
//!
//! For a table with row totals `r_k`, column totals `c_k` and diagonal
//! `d_k`:
//!
//! ```text
//! Q    = ½ Σ |r_k − c_k|
//! Q*   = |Σ_{k<n} r_k − Σ_{k<n} c_k|
//! A    = Σ min(r_k − d_k, c_k − d_k)
//! QADI = √((A/T)² + (Q/T)²)
//! ```
//!
//! where `n` is the index of the last bucket, so `Q*` sums every bucket
//! except the final step. When the two quantity derivations disagree,
//! `Q*` is reported and `A` grows by `|Q − Q*|`. Since `Q* ≤ Q` the
//! reported `Q + A` always equals the off-diagonal total.

use serde::{Deserialize, Serialize};

use windcast_core::CellClassification;

use crate::error::CompareError;
use crate::table::DisagreementTable;

/// Disagreement statistics for one target configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisagreementReport {
    /// The cross-tabulation the statistics derive from.
    pub table: DisagreementTable,
    /// Reported quantity disagreement.
    pub quantity: u64,
    /// Quantity disagreement from row and column totals (`Q`).
    pub quantity_from_totals: u64,
    /// Quantity disagreement from off-diagonal sums (`Q*`).
    pub quantity_from_off_diagonals: u64,
    /// Reported allocation disagreement.
    pub allocation: u64,
    /// Combined index in `[0, √2]`; 0 means identical allocations.
    pub qadi: f64,
}

impl DisagreementReport {
    /// Compute the statistics of a table.
    pub fn from_table(table: DisagreementTable) -> Self {
        let last = table.buckets().saturating_sub(1);
        let mut abs_diff = 0u64;
        let (mut head_rows, mut head_cols) = (0u64, 0u64);
        let mut allocation = 0u64;
        for k in 0..table.buckets() {
            let (r, c, d) = (table.row_total(k), table.col_total(k), table.diagonal(k));
            abs_diff += r.abs_diff(c);
            if k < last {
                head_rows += r;
                head_cols += c;
            }
            allocation += (r - d).min(c - d);
        }
        // Σ(r − c) = 0, so the absolute differences sum to an even number.
        let q = abs_diff / 2;
        let q_star = head_rows.abs_diff(head_cols);

        let quantity = if q != q_star {
            tracing::warn!(q, q_star, "quantity disagreement cross-check failed, reporting Q*");
            allocation += q.abs_diff(q_star);
            q_star
        } else {
            q
        };

        let total = table.total();
        let qadi = if total == 0 {
            0.0
        } else {
            let t = total as f64;
            ((allocation as f64 / t).powi(2) + (quantity as f64 / t).powi(2)).sqrt()
        };

        Self {
            table,
            quantity,
            quantity_from_totals: q,
            quantity_from_off_diagonals: q_star,
            allocation,
            qadi,
        }
    }

    /// Whether both quantity derivations agreed.
    pub fn is_consistent(&self) -> bool {
        self.quantity_from_totals == self.quantity_from_off_diagonals
    }
}

/// Compare a target configuration's final classification with the null
/// configuration's.
///
/// Both slices must list the same cells in the same order. `steps` is
/// the number of simulated steps in the horizon.
pub fn compare_configurations(
    null: &[CellClassification],
    other: &[CellClassification],
    steps: u32,
) -> Result<DisagreementReport, CompareError> {
    let table = DisagreementTable::from_classifications(null, other, steps)?;
    Ok(DisagreementReport::from_table(table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Bucket;
    use proptest::prelude::*;
    use windcast_core::StepIndex;

    fn fill(steps: u32, entries: &[(usize, usize, u64)]) -> DisagreementTable {
        let mut t = DisagreementTable::new(steps);
        for &(r, c, n) in entries {
            for _ in 0..n {
                t.record(Bucket::from_index(r), Bucket::from_index(c));
            }
        }
        t
    }

    #[test]
    fn identical_allocations_score_zero() {
        let t = fill(6, &[(0, 0, 10), (1, 1, 2), (6, 6, 1)]);
        let r = DisagreementReport::from_table(t);
        assert_eq!(r.quantity, 0);
        assert_eq!(r.allocation, 0);
        assert_eq!(r.qadi, 0.0);
        assert!(r.is_consistent());
    }

    #[test]
    fn swapped_steps_are_pure_allocation() {
        // Null converts cell a at step 1 and b at step 2; target swaps them.
        let t = fill(2, &[(0, 0, 8), (1, 2, 1), (2, 1, 1)]);
        let r = DisagreementReport::from_table(t);
        assert_eq!(r.quantity, 0);
        assert_eq!(r.allocation, 2);
        assert!((r.qadi - 0.2).abs() < 1e-12);
    }

    #[test]
    fn fewer_conversions_is_quantity() {
        // Target leaves one cell unconverted that null converted at step 1.
        let t = fill(1, &[(0, 0, 3), (1, 0, 1)]);
        let r = DisagreementReport::from_table(t);
        assert_eq!(r.quantity, 1);
        assert_eq!(r.allocation, 0);
        assert!((r.qadi - 0.25).abs() < 1e-12);
    }

    #[test]
    fn mixed_hand_computed_example() {
        // rows (null): N=5, s1=3, s2=2; cols (target): N=4, s1=2, s2=4.
        let t = fill(2, &[(0, 0, 3), (0, 2, 2), (1, 0, 1), (1, 1, 2), (2, 2, 2)]);
        assert_eq!(t.row_total(0), 5);
        assert_eq!(t.col_total(2), 4);
        let r = DisagreementReport::from_table(t);
        // |5-4| + |3-2| + |2-4| = 4
        assert_eq!(r.quantity, 2);
        // |(5+3) - (4+2)|
        assert_eq!(r.quantity_from_off_diagonals, 2);
        // min(2,1) + min(1,0) + min(0,2) = 1
        assert_eq!(r.allocation, 1);
        let expected = ((1.0f64 / 10.0).powi(2) + (2.0f64 / 10.0).powi(2)).sqrt();
        assert!((r.qadi - expected).abs() < 1e-12);
    }

    #[test]
    fn late_step_mismatch_is_moved_into_allocation() {
        // Null converts one cell at step 1 that the target leaves alone;
        // the target converts another at step 2 that null leaves alone.
        let t = fill(6, &[(0, 0, 8), (1, 0, 1), (0, 2, 1)]);
        let r = DisagreementReport::from_table(t);
        assert_eq!(r.quantity_from_totals, 1);
        assert_eq!(r.quantity_from_off_diagonals, 0);
        assert!(!r.is_consistent());
        assert_eq!(r.quantity, 0);
        // min(1, 1) plus the |Q - Q*| correction.
        assert_eq!(r.allocation, 2);
        assert!((r.qadi - 0.2).abs() < 1e-12);
    }

    #[test]
    fn final_step_mismatch_keeps_both_derivations_equal() {
        let t = fill(2, &[(0, 0, 4), (2, 0, 1)]);
        let r = DisagreementReport::from_table(t);
        assert!(r.is_consistent());
        assert_eq!(r.quantity, 1);
        assert_eq!(r.allocation, 0);
    }

    #[test]
    fn empty_table_scores_zero() {
        let r = DisagreementReport::from_table(DisagreementTable::new(6));
        assert_eq!(r.qadi, 0.0);
    }

    #[test]
    fn compare_uses_classifications() {
        use windcast_core::{CellId, ConversionState};
        let cell = |id, state| CellClassification {
            id: CellId(id),
            state,
            cluster: None,
        };
        let null = vec![
            cell(0, ConversionState::Converted(StepIndex(1))),
            cell(1, ConversionState::NeverConverted),
        ];
        let other = vec![
            cell(0, ConversionState::NeverConverted),
            cell(1, ConversionState::Converted(StepIndex(1))),
        ];
        let r = compare_configurations(&null, &other, 6).unwrap();
        assert_eq!(r.quantity, 0);
        assert_eq!(r.allocation, 2);
        assert!((r.qadi - 1.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn reported_components_cover_the_off_diagonal(
            entries in prop::collection::vec((0usize..7, 0usize..7), 0..200),
        ) {
            let mut t = DisagreementTable::new(6);
            for (r, c) in entries {
                t.record(Bucket::from_index(r), Bucket::from_index(c));
            }
            let total = t.total();
            let agree: u64 = (0..t.buckets()).map(|k| t.diagonal(k)).sum();
            let r = DisagreementReport::from_table(t);
            prop_assert!(r.quantity_from_off_diagonals <= r.quantity_from_totals);
            if r.is_consistent() {
                prop_assert_eq!(r.quantity, r.quantity_from_totals);
            } else {
                prop_assert_eq!(r.quantity, r.quantity_from_off_diagonals);
            }
            prop_assert_eq!(r.quantity + r.allocation, total - agree);
            prop_assert!(r.qadi >= 0.0 && r.qadi <= 1.0 + 1e-12);
        }
    }
}
