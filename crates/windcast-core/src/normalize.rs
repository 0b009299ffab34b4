//! Predictor normalization from raw cell attributes.
//!
//! The fitted models expect quantitative predictors standardized to
//! zero mean and unit sample standard deviation, and categorical
//! predictors encoded as `1` (present) or `0`. Predictors that take the
//! same value in every cell carry no information and are dropped.

use crate::cell::CellRecord;
use crate::error::CoreError;

/// Predictor codes that are presence flags rather than measurements.
pub const CATEGORICAL_PREDICTORS: [&str; 14] = [
    "Critical",
    "Historical",
    "Military",
    "Mining",
    "Nat_Parks",
    "Trib_Land",
    "Wild_Refug",
    "ISO_YN",
    "In_Tax_Cre",
    "Tax_Prop",
    "Tax_Sale",
    "Interconn",
    "Net_Meter",
    "Renew_Port",
];

/// What [`PredictorNormalizer::normalize`] did to each predictor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizationReport {
    /// Quantitative predictors that were z-scored.
    pub standardized: Vec<String>,
    /// Categorical predictors that were encoded as 0/1.
    pub encoded: Vec<String>,
    /// Predictors constant across every cell, left out of the vectors.
    pub dropped_constant: Vec<String>,
}

/// Fills [`CellRecord::predictors`] from [`CellRecord::attributes`].
#[derive(Clone, Debug)]
pub struct PredictorNormalizer {
    categorical: Vec<String>,
}

impl Default for PredictorNormalizer {
    fn default() -> Self {
        Self {
            categorical: CATEGORICAL_PREDICTORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PredictorNormalizer {
    /// A normalizer treating the given codes as categorical.
    pub fn with_categorical<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categorical: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `code` is encoded rather than standardized.
    pub fn is_categorical(&self, code: &str) -> bool {
        self.categorical.iter().any(|c| c == code)
    }

    /// Normalize `predictors` for every record in place.
    ///
    /// Existing entries in each record's predictor vector are replaced
    /// for the named predictors and left alone otherwise. Returns
    /// `CoreError::InconsistentPredictors` if a record lacks one of the
    /// named raw attributes.
    pub fn normalize(
        &self,
        records: &mut [CellRecord],
        predictors: &[&str],
    ) -> Result<NormalizationReport, CoreError> {
        let mut report = NormalizationReport::default();

        for &code in predictors {
            let categorical = self.is_categorical(code);
            let mut column = Vec::with_capacity(records.len());
            for record in records.iter() {
                let raw = record.attributes.get(code).ok_or_else(|| {
                    CoreError::InconsistentPredictors {
                        id: record.id,
                        predictor: code.to_string(),
                    }
                })?;
                let value = if categorical {
                    if raw.is_present() {
                        1.0
                    } else {
                        0.0
                    }
                } else {
                    raw.as_f64()
                };
                if !value.is_finite() {
                    return Err(CoreError::NonFinitePredictor {
                        id: record.id,
                        predictor: code.to_string(),
                    });
                }
                column.push(value);
            }

            let first = column.first().copied().unwrap_or(0.0);
            if column.iter().all(|v| *v == first) {
                tracing::debug!(predictor = code, "dropping constant predictor");
                for record in records.iter_mut() {
                    record.predictors.shift_remove(code);
                }
                report.dropped_constant.push(code.to_string());
                continue;
            }

            if categorical {
                for (record, v) in records.iter_mut().zip(column) {
                    record.predictors.insert(code.to_string(), v);
                }
                report.encoded.push(code.to_string());
            } else {
                let (mean, std) = mean_and_sample_std(&column);
                for (record, v) in records.iter_mut().zip(column) {
                    record.predictors.insert(code.to_string(), (v - mean) / std);
                }
                report.standardized.push(code.to_string());
            }
        }

        Ok(report)
    }
}

/// Mean and sample (n − 1) standard deviation of a non-constant column.
fn mean_and_sample_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    (mean, (ss / (n - 1.0)).sqrt())
}
