//! Named per-predictor percentage deltas applied across future steps.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use windcast_core::{CoreError, StudyArea};

use crate::error::ModelError;

/// A built-in bundle of ±10 % deltas describing one storyline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioPreset {
    /// No change to any coefficient.
    Default,
    /// Warmer, windier climate with declining wildlife counts.
    ClimateChange,
    /// Older, more diverse population.
    DemographicChanges,
    /// More Democratic wins and public support for renewables.
    SociopoliticalLandscape,
    /// Growing energy sector, falling unemployment.
    ChangingEnergyEconomies,
    /// Wider road and transmission networks.
    NewInfrastructure,
    /// Stronger protection of natural and cultural land.
    NaturalAndCulturalProtection,
    /// Larger buffers around urban infrastructure.
    UrbanProtection,
    /// National policy and lobbying shifts. Only meaningful for CONUS.
    Nationwide,
}

impl ScenarioPreset {
    /// Every preset, in menu order.
    pub const ALL: [Self; 9] = [
        Self::Default,
        Self::ClimateChange,
        Self::DemographicChanges,
        Self::SociopoliticalLandscape,
        Self::ChangingEnergyEconomies,
        Self::NewInfrastructure,
        Self::NaturalAndCulturalProtection,
        Self::UrbanProtection,
        Self::Nationwide,
    ];

    /// Upper-case preset name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::ClimateChange => "CLIMATE_CHANGE",
            Self::DemographicChanges => "DEMOGRAPHIC_CHANGES",
            Self::SociopoliticalLandscape => "SOCIOPOLITICAL_LANDSCAPE",
            Self::ChangingEnergyEconomies => "CHANGING_ENERGY_ECONOMIES",
            Self::NewInfrastructure => "NEW_INFRASTRUCTURE",
            Self::NaturalAndCulturalProtection => "NATURAL_AND_CULTURAL_PROTECTION",
            Self::UrbanProtection => "URBAN_PROTECTION",
            Self::Nationwide => "NATIONWIDE",
        }
    }

    /// Whether the preset only applies to the CONUS study area.
    pub fn is_conus_only(&self) -> bool {
        matches!(self, Self::Nationwide)
    }

    /// The deltas this preset assigns, in percent.
    pub fn deltas(&self) -> &'static [(&'static str, f64)] {
        match self {
            Self::Default => &[],
            Self::ClimateChange => &[
                ("Avg_Wind", 10.0),
                ("Avg_Temp", 10.0),
                ("Bat_Count", -10.0),
                ("Bird_Count", -10.0),
            ],
            Self::DemographicChanges => &[
                ("Avg_25", 10.0),
                ("Hisp_15_19", 10.0),
                ("Fem_15_19", 10.0),
                ("Whit_15_19", -10.0),
            ],
            Self::SociopoliticalLandscape => &[("Dem_Wins", 10.0), ("supp_2018", 10.0)],
            Self::ChangingEnergyEconomies => &[
                ("Type_15_19", 10.0),
                ("ISO_YN", 10.0),
                ("Dens_15_19", 10.0),
                ("Plant_Year", 10.0),
                ("Farm_Year", 10.0),
                ("Unem_15_19", -10.0),
            ],
            Self::NewInfrastructure => &[("Near_Roads", 10.0), ("Near_Trans", 10.0)],
            Self::NaturalAndCulturalProtection => &[
                ("Undev_Land", -10.0),
                ("Critical", -10.0),
                ("Historical", -10.0),
                ("Nat_Parks", -10.0),
                ("Trib_Land", -10.0),
                ("Wild_Refug", -10.0),
            ],
            Self::UrbanProtection => &[
                ("Near_Air", 10.0),
                ("Near_Hosp", 10.0),
                ("Near_Plant", 10.0),
                ("Near_Sch", 10.0),
                ("Mining", -10.0),
                ("Military", -10.0),
            ],
            Self::Nationwide => &[
                ("Gree_Lobbs", 10.0),
                ("Interconn", 10.0),
                ("In_Tax_Cre", 10.0),
                ("Net_Meter", 10.0),
                ("Tax_Prop", 10.0),
                ("Renew_Port", 10.0),
                ("Renew_Targ", 10.0),
                ("Tax_Sale", 10.0),
                ("Numb_Incen", 10.0),
                ("Numb_Pols", 10.0),
                ("Cost_15_19", -10.0),
                ("Farm_15_19", -10.0),
                ("Foss_Lobbs", -10.0),
                ("Rep_Wins", -10.0),
                ("Prop_15_19", -10.0),
            ],
        }
    }
}

impl fmt::Display for ScenarioPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioPreset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownName {
                kind: "scenario preset",
                name: s.to_string(),
            })
    }
}

// ── Scenario ───────────────────────────────────────────────────────

/// Percent delta per predictor, shared by every configuration of a run.
///
/// Predictors without an entry evolve with delta 0. Entries naming a
/// predictor that a configuration does not use are ignored for that
/// configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    deltas: IndexMap<String, f64>,
}

impl Scenario {
    /// The all-zero scenario.
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine presets for a study area.
    ///
    /// Later presets overwrite earlier ones on shared predictors.
    /// CONUS-only presets are skipped for other areas.
    pub fn from_presets(presets: &[ScenarioPreset], study_area: &StudyArea) -> Self {
        let mut scenario = Self::new();
        for &preset in presets {
            if preset.is_conus_only() && !study_area.is_conus() {
                tracing::warn!(
                    study_area = %study_area,
                    preset = preset.name(),
                    "preset applies to CONUS only, skipped"
                );
                continue;
            }
            scenario.apply(preset);
        }
        scenario
    }

    /// A user-defined scenario.
    pub fn custom<I, S>(deltas: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut scenario = Self::new();
        for (name, delta) in deltas {
            scenario.set(name, delta)?;
        }
        Ok(scenario)
    }

    /// Assign every delta of `preset`.
    pub fn apply(&mut self, preset: ScenarioPreset) {
        for &(name, delta) in preset.deltas() {
            self.deltas.insert(name.to_string(), delta);
        }
    }

    /// Assign one delta, replacing any previous value.
    pub fn set(&mut self, predictor: impl Into<String>, delta: f64) -> Result<(), ModelError> {
        let predictor = predictor.into();
        if !delta.is_finite() {
            return Err(ModelError::NonFiniteDelta { predictor });
        }
        self.deltas.insert(predictor, delta);
        Ok(())
    }

    /// Delta for a predictor, 0 if unspecified.
    pub fn delta(&self, predictor: &str) -> f64 {
        self.deltas.get(predictor).copied().unwrap_or(0.0)
    }

    /// Non-zero entries, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.deltas
            .iter()
            .filter(|(_, d)| **d != 0.0)
            .map(|(n, d)| (n.as_str(), *d))
    }

    /// Whether every delta is zero.
    pub fn is_neutral(&self) -> bool {
        self.iter().next().is_none()
    }
}
