//! The per-cell input record and conversion state.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::id::CellId;
use crate::time::StepIndex;

/// Whether and when a cell acquired a facility.
///
/// Transitions are monotonic: once a cell leaves `NeverConverted` it
/// never returns to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversionState {
    /// No facility, before or during the run.
    NeverConverted,
    /// Held a facility before the first simulated step.
    ExistingPriorToRun,
    /// Acquired a facility at the given step.
    Converted(StepIndex),
}

impl ConversionState {
    /// Whether the cell currently holds a facility.
    pub fn is_converted(&self) -> bool {
        !matches!(self, Self::NeverConverted)
    }

    /// The step at which a simulated conversion happened, if any.
    pub fn step(&self) -> Option<StepIndex> {
        match self {
            Self::Converted(step) => Some(*step),
            _ => None,
        }
    }
}

impl fmt::Display for ConversionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NeverConverted => f.write_str("N"),
            Self::ExistingPriorToRun => f.write_str("Y"),
            Self::Converted(step) => write!(f, "Y (step {step})"),
        }
    }
}

/// The fitted model's classification of a cell on its training data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelCellState {
    /// Predicted a facility where one exists.
    #[serde(rename = "True_Pos")]
    TruePositive,
    /// Predicted a facility where none exists.
    #[serde(rename = "False_Pos")]
    FalsePositive,
    /// Predicted no facility where none exists.
    #[serde(rename = "True_Neg")]
    TrueNegative,
    /// Predicted no facility where one exists.
    #[serde(rename = "False_Neg")]
    FalseNegative,
}

/// A raw attribute value as delivered by the grid collaborator.
///
/// Constraints read these directly; distance thresholds are in metres
/// and categorical attributes are presence flags.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A quantitative measurement.
    Number(f64),
    /// A categorical presence flag (`"Y"` in the source tables).
    Flag(bool),
}

impl AttributeValue {
    /// Numeric view: flags map to `1.0`/`0.0`.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Number(v) => *v,
            Self::Flag(true) => 1.0,
            Self::Flag(false) => 0.0,
        }
    }

    /// Presence view: numbers are present when non-zero.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Number(v) => *v != 0.0,
            Self::Flag(b) => *b,
        }
    }
}

/// One grid cell as supplied by the cell-record collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    /// Stable cell identifier.
    pub id: CellId,
    /// Raw attributes, keyed by predictor code (e.g. `"Near_Air"`).
    pub attributes: IndexMap<String, AttributeValue>,
    /// Normalized predictor vector used by the probability model.
    ///
    /// Empty when the caller intends to normalize with
    /// [`PredictorNormalizer`](crate::normalize::PredictorNormalizer).
    pub predictors: IndexMap<String, f64>,
    /// Whether the cell held a facility before the run.
    pub existing: bool,
    /// Fitted-model classification, when the study area has one.
    pub model_state: Option<ModelCellState>,
}

impl CellRecord {
    /// A record with no attributes or predictors.
    pub fn new(id: CellId, existing: bool) -> Self {
        Self {
            id,
            attributes: IndexMap::new(),
            predictors: IndexMap::new(),
            existing,
            model_state: None,
        }
    }

    /// Builder-style raw attribute setter.
    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Builder-style normalized predictor setter.
    pub fn with_predictor(mut self, name: impl Into<String>, value: f64) -> Self {
        self.predictors.insert(name.into(), value);
        self
    }

    /// Builder-style model classification setter.
    pub fn with_model_state(mut self, state: ModelCellState) -> Self {
        self.model_state = Some(state);
        self
    }

    /// The state this cell starts the run in.
    pub fn initial_state(&self) -> ConversionState {
        if self.existing {
            ConversionState::ExistingPriorToRun
        } else {
            ConversionState::NeverConverted
        }
    }
}

// ── Final classification ───────────────────────────────────────────

/// Follow-up of the fitted model's cluster analysis for one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClusterTag {
    /// Holds a facility; the model had predicted none on training data.
    #[serde(rename = "Y (False_Pos)")]
    ConvertedFalsePositive,
    /// Holds a facility; the model correctly predicted none before.
    #[serde(rename = "Y (True_Neg)")]
    ConvertedTrueNegative,
    /// Holds a facility, any other model state.
    #[serde(rename = "Y")]
    Converted,
    /// Holds no facility.
    #[serde(rename = "N")]
    NotConverted,
}

impl ClusterTag {
    /// Tag a cell from its end-of-run state and model classification.
    pub fn classify(state: ConversionState, model: ModelCellState) -> Self {
        match (state.is_converted(), model) {
            (false, _) => Self::NotConverted,
            (true, ModelCellState::FalsePositive) => Self::ConvertedFalsePositive,
            (true, ModelCellState::TrueNegative) => Self::ConvertedTrueNegative,
            (true, _) => Self::Converted,
        }
    }
}

impl fmt::Display for ClusterTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ConvertedFalsePositive => "Y (False_Pos)",
            Self::ConvertedTrueNegative => "Y (True_Neg)",
            Self::Converted => "Y",
            Self::NotConverted => "N",
        })
    }
}

/// A cell's state at the end of a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellClassification {
    /// The cell.
    pub id: CellId,
    /// Final conversion state.
    pub state: ConversionState,
    /// Cluster follow-up tag, when the study area has a fitted model
    /// classification.
    pub cluster: Option<ClusterTag>,
}
