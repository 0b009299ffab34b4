//! Benchmark profiles and utilities for the Windcast simulation engine.
//!
//! Provides pre-built landscapes and run configurations:
//!
//! - [`reference_profile`]: 100x100 hex grid (10K cells)
//! - [`stress_profile`]: 316x316 hex grid (~100K cells)
//! - [`existing_positions`]: deterministic facility placement via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::HashSet;

use windcast_core::{AttributeValue, CellRecord, Landscape, PredictorConfig, StudyArea};
use windcast_engine::{Quota, RunConfiguration};
use windcast_model::{CoefficientSchedule, CoefficientSet, Scenario, ScenarioPreset};
use windcast_space::{HexGeometry, HexGrid};

/// A landscape together with the grid that answers its neighbor
/// queries.
pub struct Profile {
    /// Cells of the profile.
    pub landscape: Landscape,
    /// Geometry source for neighbor scans.
    pub grid: HexGrid,
}

/// Build a reference benchmark profile: 100x100 grid (10K cells) with
/// 1% of cells holding a facility.
pub fn reference_profile(seed: u64) -> Profile {
    build_profile(100, 100, 100, seed)
}

/// Build a stress benchmark profile: 316x316 grid (~100K cells).
///
/// Same layout as [`reference_profile`] at 10x the cell count.
pub fn stress_profile(seed: u64) -> Profile {
    build_profile(316, 316, 1000, seed)
}

fn build_profile(rows: u32, cols: u32, existing: usize, seed: u64) -> Profile {
    let config = reference_config();
    let grid = HexGrid::new(rows, cols, HexGeometry::from_resolution(config.resolution))
        .expect("benchmark grid dimensions are valid");
    let cell_count = grid.cell_count();
    let existing: HashSet<usize> = existing_positions(cell_count, existing, seed)
        .into_iter()
        .collect();

    let records = grid
        .ids()
        .map(|id| {
            let i = id.0 as u64;
            let wind = unit(seed, i, 1);
            CellRecord::new(id, existing.contains(&(id.0 as usize)))
                .with_predictor("Avg_Wind", wind)
                .with_predictor("Near_Trans", unit(seed, i, 2))
                .with_predictor("Near_Air", unit(seed, i, 3))
                .with_attribute("Avg_Wind", AttributeValue::Number(3.0 + 6.0 * wind))
                .with_attribute("Military", AttributeValue::Flag(i % 97 == 0))
        })
        .collect();
    let landscape = Landscape::new(records).expect("benchmark records are consistent");
    Profile { landscape, grid }
}

/// Generate deterministic facility positions.
///
/// Places `n` facilities using a simple hash of the seed, probing
/// linearly past collisions.
pub fn existing_positions(cell_count: usize, n: usize, seed: u64) -> Vec<usize> {
    let mut positions = Vec::with_capacity(n);
    let mut occupied = HashSet::new();

    for i in 0..n.min(cell_count) {
        let mut pos = (seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(i as u64 * 1442695040888963407)
            % cell_count as u64) as usize;

        while occupied.contains(&pos) {
            pos = (pos + 1) % cell_count;
        }
        occupied.insert(pos);
        positions.push(pos);
    }

    positions
}

/// Deterministic value in `[0, 1)` for cell `i` and predictor `salt`.
fn unit(seed: u64, i: u64, salt: u64) -> f64 {
    let h = seed
        .wrapping_add(salt.wrapping_mul(2862933555777941757))
        .wrapping_add(i)
        .wrapping_mul(6364136223846793005)
        .rotate_left(29)
        .wrapping_mul(1442695040888963407);
    (h >> 11) as f64 / (1u64 << 53) as f64
}

/// CONUS defaults with 25 facilities per step.
pub fn reference_config() -> RunConfiguration {
    let mut config = RunConfiguration::default();
    config.quota = Quota::new(25).expect("quota is non-zero");
    config
}

/// A fitted-style coefficient set over the profile predictors.
pub fn reference_model() -> CoefficientSet {
    CoefficientSet::intercept_only(-3.0)
        .with("Avg_Wind", 2.5)
        .with("Near_Trans", -1.2)
        .with("Near_Air", 0.4)
}

/// The reference model evolved under the climate-change preset.
pub fn reference_schedule(profile: &Profile, config: &RunConfiguration) -> CoefficientSchedule {
    let scenario = Scenario::from_presets(&[ScenarioPreset::ClimateChange], &StudyArea::conus());
    CoefficientSchedule::build(
        PredictorConfig::Full,
        reference_model(),
        &scenario,
        &config.study_area,
        &profile.landscape,
        &config.horizon,
    )
    .expect("reference model predictors exist in the profile")
}

#[cfg(test)]
mod tests {
    use super::*;
    use windcast_engine::Simulator;

    #[test]
    fn reference_profile_runs() {
        let profile = reference_profile(42);
        assert_eq!(profile.landscape.len(), 10_000);
        assert_eq!(profile.landscape.existing_count(), 100);

        let config = reference_config();
        let schedule = reference_schedule(&profile, &config);
        let sim = Simulator::new(config, &profile.landscape, &profile.grid).unwrap();
        let result = sim.run(schedule).unwrap();
        assert_eq!(result.conversions(), 6 * 25);
    }

    #[test]
    fn existing_positions_no_collisions() {
        let positions = existing_positions(100, 10, 42);
        assert_eq!(positions.len(), 10);
        let unique: HashSet<usize> = positions.iter().copied().collect();
        assert_eq!(unique.len(), 10, "all positions should be unique");
        assert!(positions.iter().all(|&p| p < 100));
    }

    #[test]
    fn profile_values_are_deterministic() {
        assert_eq!(existing_positions(1000, 5, 42), existing_positions(1000, 5, 42));
        for i in 0..1000 {
            let u = unit(7, i, 3);
            assert!((0.0..1.0).contains(&u));
            assert_eq!(u, unit(7, i, 3));
        }
    }
}
