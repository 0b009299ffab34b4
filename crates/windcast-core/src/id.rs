//! Strongly-typed identifiers for cells and predictor configurations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Identifies one cell of the simulated grid.
///
/// Cell identifiers are assigned by the collaborator that produces the
/// grid and are stable across runs. Ordering on `CellId` is the
/// deterministic tie-break used by allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(pub u32);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CellId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// A named set of predictors with its own fitted coefficients.
///
/// `Null` carries no predictors at all and serves as the reference
/// allocation every other configuration is compared against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PredictorConfig {
    /// Intercept-only reference model.
    Null,
    /// Every retained predictor.
    Full,
    /// All predictors except wind-resource ones.
    #[serde(rename = "No_Wind")]
    NoWind,
    /// Wind-resource predictors only.
    #[serde(rename = "Wind_Only")]
    WindOnly,
    /// Predictors surviving backward elimination.
    Reduced,
}

impl PredictorConfig {
    /// Configurations backed by a fitted model, in run order.
    pub const FITTED: [Self; 4] = [Self::Full, Self::NoWind, Self::WindOnly, Self::Reduced];

    /// The name used for storage keys and log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Full => "Full",
            Self::NoWind => "No_Wind",
            Self::WindOnly => "Wind_Only",
            Self::Reduced => "Reduced",
        }
    }

    /// Whether this is the intercept-only reference configuration.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for PredictorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PredictorConfig {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Null" => Ok(Self::Null),
            "Full" => Ok(Self::Full),
            "No_Wind" => Ok(Self::NoWind),
            "Wind_Only" => Ok(Self::WindOnly),
            "Reduced" => Ok(Self::Reduced),
            other => Err(CoreError::UnknownName {
                kind: "predictor configuration",
                name: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_names_parse_back() {
        for cfg in std::iter::once(PredictorConfig::Null).chain(PredictorConfig::FITTED) {
            assert_eq!(cfg.name().parse::<PredictorConfig>().unwrap(), cfg);
        }
    }

    #[test]
    fn unknown_config_is_rejected() {
        match "Everything".parse::<PredictorConfig>() {
            Err(CoreError::UnknownName { kind, .. }) => {
                assert_eq!(kind, "predictor configuration")
            }
            other => panic!("expected UnknownName, got {other:?}"),
        }
    }

    #[test]
    fn serde_uses_storage_names() {
        let json = serde_json::to_string(&PredictorConfig::WindOnly).unwrap();
        assert_eq!(json, "\"Wind_Only\"");
        let cell: CellId = serde_json::from_str("17").unwrap();
        assert_eq!(cell, CellId(17));
    }
}
