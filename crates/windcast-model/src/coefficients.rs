//! Coefficient sets and their evolution across simulated steps.
//!
//! The evolution rule is compounding and magnitude based:
//!
//! ```text
//! c_t = c_{t-1} + |c_{t-1}| · δ / 100
//! ```
//!
//! A positive delta always pushes a coefficient toward +∞ and a
//! negative delta toward −∞, whatever the coefficient's sign. A zero
//! coefficient never moves. The intercept is never evolved.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use windcast_core::{Horizon, Landscape, PredictorConfig, StepIndex, StudyArea};

use crate::error::ModelError;
use crate::scenario::Scenario;

/// Predictors only fitted by the national model.
///
/// Areas that borrow the CONUS model drop these coefficients, since
/// their cells carry no state-level variation for them.
pub const NATIONWIDE_PREDICTORS: [&str; 15] = [
    "Cost_15_19",
    "Farm_15_19",
    "Prop_15_19",
    "In_Tax_Cre",
    "Tax_Prop",
    "Tax_Sale",
    "Numb_Incen",
    "Rep_Wins",
    "Interconn",
    "Net_Meter",
    "Renew_Port",
    "Renew_Targ",
    "Numb_Pols",
    "Foss_Lobbs",
    "Gree_Lobbs",
];

/// Advance one coefficient by `steps` steps under a percent delta.
///
/// Returns `steps + 1` values: the base coefficient followed by one
/// value per step.
///
/// ```
/// use windcast_model::evolve_coefficient;
///
/// let c = evolve_coefficient(-5.0, 10.0, 3);
/// assert!((c[1] + 4.5).abs() < 1e-9);
/// assert!((c[2] + 4.05).abs() < 1e-9);
/// assert!((c[3] + 3.645).abs() < 1e-9);
/// ```
pub fn evolve_coefficient(base: f64, delta_percent: f64, steps: u32) -> Vec<f64> {
    let mut out = Vec::with_capacity(steps as usize + 1);
    let mut c = base;
    out.push(c);
    for _ in 0..steps {
        c = evolve_once(c, delta_percent);
        out.push(c);
    }
    out
}

fn evolve_once(c: f64, delta_percent: f64) -> f64 {
    if delta_percent == 0.0 {
        c
    } else {
        c + c.abs() * delta_percent / 100.0
    }
}

// ── CoefficientSet ─────────────────────────────────────────────────

/// Intercept plus one coefficient per predictor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoefficientSet {
    /// Model intercept.
    pub intercept: f64,
    /// Coefficient per predictor name.
    pub coefficients: IndexMap<String, f64>,
}

impl CoefficientSet {
    /// A set with no predictors.
    pub fn intercept_only(intercept: f64) -> Self {
        Self {
            intercept,
            coefficients: IndexMap::new(),
        }
    }

    /// Builder-style coefficient insertion.
    pub fn with(mut self, predictor: impl Into<String>, coefficient: f64) -> Self {
        self.coefficients.insert(predictor.into(), coefficient);
        self
    }

    /// Coefficient of a predictor.
    pub fn get(&self, predictor: &str) -> Option<f64> {
        self.coefficients.get(predictor).copied()
    }

    /// Number of predictors.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Whether the set has no predictors.
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Predictor names in insertion order.
    pub fn predictors(&self) -> impl Iterator<Item = &str> {
        self.coefficients.keys().map(String::as_str)
    }

    /// Reject NaN or infinite values.
    pub fn check_finite(&self) -> Result<(), ModelError> {
        if !self.intercept.is_finite() {
            return Err(ModelError::NonFiniteCoefficient {
                predictor: "(intercept)".to_string(),
            });
        }
        match self.coefficients.iter().find(|(_, c)| !c.is_finite()) {
            Some((name, _)) => Err(ModelError::NonFiniteCoefficient {
                predictor: name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// The set one step later under `scenario`.
    pub fn evolved(&self, scenario: &Scenario) -> Self {
        Self {
            intercept: self.intercept,
            coefficients: self
                .coefficients
                .iter()
                .map(|(name, &c)| (name.clone(), evolve_once(c, scenario.delta(name))))
                .collect(),
        }
    }

    /// Remove predictors for which `keep` returns false, returning
    /// their names.
    pub fn retain_predictors(&mut self, mut keep: impl FnMut(&str) -> bool) -> Vec<String> {
        let mut removed = Vec::new();
        self.coefficients.retain(|name, _| {
            let k = keep(name);
            if !k {
                removed.push(name.clone());
            }
            k
        });
        removed
    }
}

// ── CoefficientSchedule ────────────────────────────────────────────

/// One configuration's coefficient sets for the base step and every
/// simulated step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoefficientSchedule {
    config: PredictorConfig,
    sets: Vec<CoefficientSet>,
    ignored: Vec<String>,
    dropped: Vec<String>,
}

impl CoefficientSchedule {
    /// Prepare a fitted base set and evolve it over the horizon.
    ///
    /// Preparation removes nationwide-only predictors when the study
    /// area borrows the national model, then predictors the landscape
    /// does not carry (constant columns dropped during normalization).
    /// Scenario entries naming predictors outside the prepared set are
    /// recorded as ignored.
    pub fn build(
        config: PredictorConfig,
        mut base: CoefficientSet,
        scenario: &Scenario,
        study_area: &StudyArea,
        landscape: &Landscape,
        horizon: &Horizon,
    ) -> Result<Self, ModelError> {
        base.check_finite()?;

        let mut dropped = Vec::new();
        if study_area.uses_national_model() {
            dropped.extend(base.retain_predictors(|p| !NATIONWIDE_PREDICTORS.contains(&p)));
        }
        dropped.extend(base.retain_predictors(|p| landscape.predictor_column(p).is_some()));
        if !dropped.is_empty() {
            tracing::debug!(
                study_area = %study_area,
                config = %config,
                dropped = ?dropped,
                "predictors removed before evolution"
            );
        }

        let ignored: Vec<String> = scenario
            .iter()
            .filter(|(name, _)| base.get(name).is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        if !ignored.is_empty() && !config.is_null() {
            tracing::warn!(
                study_area = %study_area,
                config = %config,
                ignored = ?ignored,
                "scenario names predictors absent from this configuration"
            );
        }

        let mut sets = Vec::with_capacity(horizon.steps as usize + 1);
        sets.push(base);
        for _ in 0..horizon.steps {
            let next = sets[sets.len() - 1].evolved(scenario);
            sets.push(next);
        }

        Ok(Self {
            config,
            sets,
            ignored,
            dropped,
        })
    }

    /// Schedule of the null configuration: `intercept` alone at every
    /// step.
    pub fn null(intercept: f64, horizon: &Horizon) -> Result<Self, ModelError> {
        let base = CoefficientSet::intercept_only(intercept);
        base.check_finite()?;
        Ok(Self {
            config: PredictorConfig::Null,
            sets: vec![base; horizon.steps as usize + 1],
            ignored: Vec::new(),
            dropped: Vec::new(),
        })
    }

    /// The configuration this schedule belongs to.
    pub fn config(&self) -> PredictorConfig {
        self.config
    }

    /// Coefficients in effect at `step`.
    ///
    /// Steps past the horizon reuse the last set.
    pub fn at(&self, step: StepIndex) -> &CoefficientSet {
        let i = (step.0 as usize).min(self.sets.len() - 1);
        &self.sets[i]
    }

    /// The prepared base (step 0) set.
    pub fn base(&self) -> &CoefficientSet {
        &self.sets[0]
    }

    /// Every set, base first.
    pub fn sets(&self) -> &[CoefficientSet] {
        &self.sets
    }

    /// Scenario predictors ignored for this configuration.
    pub fn ignored_scenario_predictors(&self) -> &[String] {
        &self.ignored
    }

    /// Fitted predictors removed during preparation.
    pub fn dropped_predictors(&self) -> &[String] {
        &self.dropped
    }
}
