//! Rank-based site allocation.
//!
//! Each step converts the `quota` highest-scoring candidates. A
//! candidate is a cell without a facility that passes the constraint
//! filter. Ties are broken by ascending position, which is ascending
//! cell id.

use std::cmp::Ordering;

use windcast_core::ConversionState;

use crate::config::Quota;

/// Cells chosen by one allocation step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    /// Positions to convert, best score first.
    pub converted: Vec<usize>,
    /// Candidates available before this step.
    pub pool: usize,
    /// Fewer candidates than the quota remained.
    pub exhausted: bool,
}

/// Pick this step's conversions.
///
/// `scores` and `eligible` are indexed by landscape position, like
/// `states`. When fewer than `quota` candidates exist, all of them are
/// converted and the result is marked exhausted.
pub fn allocate(
    states: &[ConversionState],
    scores: &[f64],
    eligible: &[bool],
    quota: Quota,
) -> Allocation {
    let mut pool: Vec<usize> = states
        .iter()
        .enumerate()
        .filter(|&(pos, s)| matches!(s, ConversionState::NeverConverted) && eligible[pos])
        .map(|(pos, _)| pos)
        .collect();
    let available = pool.len();
    let quota = quota.get() as usize;

    let by_rank = |a: &usize, b: &usize| rank(scores, *a, *b);
    if available > quota {
        pool.select_nth_unstable_by(quota - 1, by_rank);
        pool.truncate(quota);
    }
    pool.sort_unstable_by(by_rank);

    Allocation {
        converted: pool,
        pool: available,
        exhausted: available < quota,
    }
}

/// Descending score, then ascending position.
fn rank(scores: &[f64], a: usize, b: usize) -> Ordering {
    scores[b].total_cmp(&scores[a]).then(a.cmp(&b))
}
