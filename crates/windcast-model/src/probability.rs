//! Logistic probability of conversion.

use windcast_core::Landscape;

use crate::coefficients::CoefficientSet;
use crate::error::ModelError;

/// `1 / (1 + e^(−z))`, evaluated without overflow for large `|z|`.
pub fn logistic(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// A coefficient set bound to a landscape's predictor columns.
///
/// Binding resolves each predictor name to its column once, so scoring
/// a cell is a dot product over its predictor row.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearPredictor {
    intercept: f64,
    terms: Vec<(usize, f64)>,
}

impl LinearPredictor {
    /// Resolve every coefficient of `set` against `landscape`.
    ///
    /// Returns `Err(ModelError::MissingPredictor)` if a coefficient
    /// names a predictor the landscape lacks.
    pub fn bind(set: &CoefficientSet, landscape: &Landscape) -> Result<Self, ModelError> {
        let terms = set
            .coefficients
            .iter()
            .map(|(name, &c)| {
                landscape
                    .predictor_column(name)
                    .map(|col| (col, c))
                    .ok_or_else(|| ModelError::MissingPredictor {
                        predictor: name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            intercept: set.intercept,
            terms,
        })
    }

    /// `intercept + Σ coefᵢ · xᵢ` for one predictor row.
    pub fn linear(&self, row: &[f64]) -> f64 {
        self.terms
            .iter()
            .fold(self.intercept, |acc, &(col, c)| acc + c * row[col])
    }

    /// Conversion probability for one predictor row.
    pub fn probability(&self, row: &[f64]) -> f64 {
        logistic(self.linear(row))
    }

    /// Number of bound predictors.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether only the intercept contributes.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use windcast_core::{CellId, CellRecord};

    fn landscape() -> Landscape {
        Landscape::new(vec![
            CellRecord::new(CellId(0), false)
                .with_predictor("a", 1.0)
                .with_predictor("b", 2.0),
            CellRecord::new(CellId(1), false)
                .with_predictor("a", -1.0)
                .with_predictor("b", 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn logistic_midpoint_and_symmetry() {
        assert_eq!(logistic(0.0), 0.5);
        assert!((logistic(2.0) + logistic(-2.0) - 1.0).abs() < 1e-12);
        assert!(logistic(-800.0) >= 0.0);
        assert!(logistic(800.0) <= 1.0);
    }

    #[test]
    fn bound_predictor_uses_columns() {
        let l = landscape();
        // Insertion order differs from column order on purpose.
        let set = CoefficientSet::intercept_only(0.5).with("b", 0.25).with("a", -1.0);
        let lp = LinearPredictor::bind(&set, &l).unwrap();
        assert_eq!(lp.len(), 2);
        assert!((lp.linear(l.predictor_row(0)) - 0.0).abs() < 1e-12);
        assert!((lp.linear(l.predictor_row(1)) - 1.5).abs() < 1e-12);
        assert_eq!(lp.probability(l.predictor_row(0)), 0.5);
    }

    #[test]
    fn missing_predictor_rejected() {
        let set = CoefficientSet::intercept_only(0.0).with("c", 1.0);
        assert_eq!(
            LinearPredictor::bind(&set, &landscape()),
            Err(ModelError::MissingPredictor {
                predictor: "c".to_string()
            })
        );
    }

    #[test]
    fn intercept_only_scores_every_cell_equally() {
        let l = landscape();
        let lp = LinearPredictor::bind(&CoefficientSet::intercept_only(-1.0), &l).unwrap();
        assert!(lp.is_empty());
        assert_eq!(lp.probability(l.predictor_row(0)), lp.probability(l.predictor_row(1)));
    }

    proptest! {
        #[test]
        fn probability_in_unit_interval(z in -1e6f64..1e6) {
            let p = logistic(z);
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }
}
