//! Hard eligibility constraints on raw cell attributes.
//!
//! A cell is eligible when it fails none of the enabled constraints.
//! Eligibility is evaluated once per run and never changes while
//! stepping. Diagnostics (how many cells each constraint would
//! prohibit) are gathered even when the subsystem is switched off.

use serde::{Deserialize, Serialize};

use windcast_core::{AttributeValue, Landscape};

use crate::config::ConfigError;

// ── ConstraintRule ─────────────────────────────────────────────────

/// How a constraint judges an attribute value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintRule {
    /// Fails when `value <= min`.
    Min {
        /// Lower bound (exclusive pass).
        min: f64,
    },
    /// Fails when `value >= max`.
    Max {
        /// Upper bound (exclusive pass).
        max: f64,
    },
    /// Fails when `value <= min` or `value >= max`.
    Range {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// Fails when the categorical flag is present.
    Presence,
}

impl ConstraintRule {
    /// Whether `value` violates the rule. Missing attributes never fail.
    pub fn fails(&self, value: Option<AttributeValue>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match *self {
            Self::Min { min } => value.as_f64() <= min,
            Self::Max { max } => value.as_f64() >= max,
            Self::Range { min, max } => {
                let v = value.as_f64();
                v <= min || v >= max
            }
            Self::Presence => value.is_present(),
        }
    }
}

// ── Constraint ─────────────────────────────────────────────────────

/// A named, individually switchable rule on one attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Unique name within a set.
    pub name: String,
    /// Attribute the rule reads.
    pub attribute: String,
    /// The rule.
    pub rule: ConstraintRule,
    /// Whether the rule participates in eligibility.
    pub enabled: bool,
}

impl Constraint {
    /// An enabled constraint.
    pub fn new(name: impl Into<String>, attribute: impl Into<String>, rule: ConstraintRule) -> Self {
        Self {
            name: name.into(),
            attribute: attribute.into(),
            rule,
            enabled: true,
        }
    }

    /// Fails at or below `min`. Named after the attribute.
    pub fn min(attribute: &str, min: f64) -> Self {
        Self::new(attribute, attribute, ConstraintRule::Min { min })
    }

    /// Fails at or above `max`. Named after the attribute.
    pub fn max(attribute: &str, max: f64) -> Self {
        Self::new(attribute, attribute, ConstraintRule::Max { max })
    }

    /// Fails when the flag is present. Named after the attribute.
    pub fn presence(attribute: &str) -> Self {
        Self::new(attribute, attribute, ConstraintRule::Presence)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidConstraint {
            name: self.name.clone(),
            reason,
        };
        match self.rule {
            ConstraintRule::Min { min: v } | ConstraintRule::Max { max: v } if !v.is_finite() => {
                Err(invalid(format!("threshold {v} is not finite")))
            }
            ConstraintRule::Range { min, max } if !min.is_finite() || !max.is_finite() => {
                Err(invalid(format!("thresholds {min}..{max} are not finite")))
            }
            ConstraintRule::Range { min, max } if min >= max => {
                Err(invalid(format!("min {min} must be below max {max}")))
            }
            _ => Ok(()),
        }
    }
}

// ── ConstraintSet ──────────────────────────────────────────────────

/// The constraints of a run and the global switch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSet {
    /// When false every cell is eligible.
    pub enabled: bool,
    /// Constraints in evaluation order.
    pub constraints: Vec<Constraint>,
}

impl Default for ConstraintSet {
    /// Siting buffers in metres, wind and climate limits, and
    /// protected-land presence rules.
    fn default() -> Self {
        let mut constraints = vec![
            Constraint::min("Near_Air", 2500.0),
            Constraint::min("Near_Plant", 10000.0),
            Constraint::min("Near_Hosp", 2500.0),
            Constraint::min("Near_Sch", 2500.0),
            Constraint::new("Near_Roads_Min", "Near_Roads", ConstraintRule::Min { min: 500.0 }),
            Constraint::new("Near_Roads_Max", "Near_Roads", ConstraintRule::Max { max: 10000.0 }),
            Constraint::new("Near_Trans_Min", "Near_Trans", ConstraintRule::Min { min: 250.0 }),
            Constraint::new("Near_Trans_Max", "Near_Trans", ConstraintRule::Max { max: 10000.0 }),
            Constraint::max("Avg_Elevat", 2000.0),
            Constraint::min("Avg_Wind", 4.0),
            Constraint::min("Avg_Temp", 0.0),
        ];
        for flag in [
            "Military",
            "Nat_Parks",
            "Critical",
            "Historical",
            "Mining",
            "Wild_Refug",
            "Trib_Land",
        ] {
            constraints.push(Constraint::presence(flag));
        }
        Self {
            enabled: true,
            constraints,
        }
    }
}

impl ConstraintSet {
    /// The default constraints with the subsystem switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Look up a constraint by name.
    pub fn get(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    /// Mutable lookup, for overriding thresholds.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Constraint> {
        self.constraints.iter_mut().find(|c| c.name == name)
    }

    /// Switch one constraint on or off.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<(), ConfigError> {
        let c = self
            .get_mut(name)
            .ok_or_else(|| ConfigError::UnknownConstraint {
                name: name.to_string(),
            })?;
        c.enabled = enabled;
        Ok(())
    }

    /// Check thresholds and name uniqueness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, c) in self.constraints.iter().enumerate() {
            c.validate()?;
            if self.constraints[..i].iter().any(|o| o.name == c.name) {
                return Err(ConfigError::InvalidConstraint {
                    name: c.name.clone(),
                    reason: "name is used twice".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Evaluate every cell of a landscape.
    pub fn evaluate(&self, landscape: &Landscape) -> ConstraintEvaluation {
        let mut per_constraint: Vec<ConstraintCount> = self
            .constraints
            .iter()
            .map(|c| ConstraintCount {
                name: c.name.clone(),
                enabled: c.enabled,
                failing: 0,
                failing_existing: 0,
            })
            .collect();

        let mut passes = Vec::with_capacity(landscape.len());
        let mut prohibited = 0;
        let mut prohibited_existing = 0;
        for pos in 0..landscape.len() {
            let existing = landscape.initial_state(pos).is_converted();
            let mut ok = true;
            for (c, count) in self.constraints.iter().zip(per_constraint.iter_mut()) {
                if !c.enabled {
                    continue;
                }
                if c.rule.fails(landscape.attribute(pos, &c.attribute)) {
                    ok = false;
                    count.failing += 1;
                    if existing {
                        count.failing_existing += 1;
                    }
                }
            }
            if !ok {
                prohibited += 1;
                if existing {
                    prohibited_existing += 1;
                }
            }
            passes.push(ok);
        }

        let existing_total = landscape.existing_count();
        let diagnostics = ConstraintDiagnostics {
            per_constraint,
            prohibited,
            allowed: landscape.len() - prohibited,
            prohibited_existing,
            allowed_existing: existing_total - prohibited_existing,
        };
        let eligible = if self.enabled {
            passes
        } else {
            vec![true; landscape.len()]
        };
        ConstraintEvaluation {
            enabled: self.enabled,
            eligible,
            diagnostics,
        }
    }
}

// ── Evaluation results ─────────────────────────────────────────────

/// Cells failing one constraint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintCount {
    /// Constraint name.
    pub name: String,
    /// Whether the constraint was switched on.
    pub enabled: bool,
    /// Cells failing it.
    pub failing: usize,
    /// Cells with a pre-existing facility failing it.
    pub failing_existing: usize,
}

/// Counts describing what the enabled constraints would prohibit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintDiagnostics {
    /// Per-constraint failure counts, in set order.
    pub per_constraint: Vec<ConstraintCount>,
    /// Cells failing at least one enabled constraint.
    pub prohibited: usize,
    /// Cells failing none.
    pub allowed: usize,
    /// Pre-existing facility cells failing at least one.
    pub prohibited_existing: usize,
    /// Pre-existing facility cells failing none.
    pub allowed_existing: usize,
}

/// Per-cell eligibility for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstraintEvaluation {
    enabled: bool,
    eligible: Vec<bool>,
    diagnostics: ConstraintDiagnostics,
}

impl ConstraintEvaluation {
    /// Whether the subsystem filtered anything.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Eligibility of the cell at `pos`.
    pub fn is_eligible(&self, pos: usize) -> bool {
        self.eligible[pos]
    }

    /// Eligibility as a score factor.
    pub fn factor(&self, pos: usize) -> f64 {
        if self.eligible[pos] {
            1.0
        } else {
            0.0
        }
    }

    /// Eligibility flags in position order.
    pub fn eligibility(&self) -> &[bool] {
        &self.eligible
    }

    /// Failure counts.
    pub fn diagnostics(&self) -> &ConstraintDiagnostics {
        &self.diagnostics
    }
}
