//! Windcast: cellular-automaton projection of wind facility siting.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Windcast sub-crates. For most users, adding `windcast` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use windcast::prelude::*;
//! use windcast::space::HexGrid;
//!
//! let config = RunConfiguration {
//!     quota: Quota::new(3).unwrap(),
//!     ..RunConfiguration::default()
//! };
//! // A 4×4 patch of hexagons with facilities on cells 0 and 1.
//! let grid = HexGrid::new(4, 4, config.geometry()).unwrap();
//! let records = grid
//!     .ids()
//!     .map(|id| {
//!         CellRecord::new(id, id.0 < 2).with_predictor("Avg_Wind", f64::from(id.0 % 5) / 4.0)
//!     })
//!     .collect();
//! let landscape = Landscape::new(records).unwrap();
//!
//! let schedule = CoefficientSchedule::build(
//!     PredictorConfig::Full,
//!     CoefficientSet::intercept_only(-1.0).with("Avg_Wind", 2.0),
//!     &Scenario::from_presets(&[ScenarioPreset::ClimateChange], &config.study_area),
//!     &config.study_area,
//!     &landscape,
//!     &config.horizon,
//! )
//! .unwrap();
//!
//! let sim = Simulator::new(config, &landscape, &grid).unwrap();
//! let result = sim.run(schedule).unwrap();
//! // Three conversions per step exhaust the 14 open cells at step 5.
//! assert_eq!(result.outcome, RunOutcome::TerminatedEarly(StepIndex(5)));
//! assert_eq!(result.conversions(), 14);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `windcast-core` | Study areas, resolutions, cells, landscapes, horizons |
//! | [`space`] | `windcast-space` | Hexagon geometry, neighbor sources and tables |
//! | [`model`] | `windcast-model` | Scenarios, coefficient evolution, logistic scoring |
//! | [`engine`] | `windcast-engine` | Constraints, allocation, the simulation loop, batches |
//! | [`compare`] | `windcast-compare` | Disagreement tables and QADI |
//! | [`store`] | `windcast-store` | Persistence of coefficients, classifications, settings |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and collaborator traits (`windcast-core`).
///
/// Contains study areas, resolutions, cell records, the [`types::Landscape`]
/// and the [`types::CellSource`] trait for loading cells.
pub use windcast_core as types;

/// Hexagon geometry and neighbor queries (`windcast-space`).
///
/// Provides the [`space::NeighborSource`] trait, two sources
/// ([`space::HexGrid`] and [`space::CentroidIndex`]) and the precomputed
/// [`space::NeighborTable`].
pub use windcast_space as space;

/// Fitted models and scoring (`windcast-model`).
pub use windcast_model as model;

/// The simulation engine (`windcast-engine`).
///
/// [`engine::Simulator`] runs one configuration at a time;
/// [`engine::run_batch`] runs null and fitted configurations concurrently.
pub use windcast_engine as engine;

/// Quantity and allocation disagreement (`windcast-compare`).
pub use windcast_compare as compare;

/// Artifact persistence (`windcast-store`).
///
/// [`store::MemoryStore`] for tests, [`store::JsonDirStore`] for durable
/// output.
pub use windcast_store as store;

/// Common imports for typical Windcast usage.
///
/// ```rust
/// use windcast::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use windcast_core::{
        CellClassification, CellId, CellRecord, CellSource, ConversionState, Horizon, Landscape,
        PredictorConfig, Resolution, StepIndex, StudyArea,
    };

    // Space
    pub use windcast_space::{NeighborSource, RingCount};

    // Model
    pub use windcast_model::{
        CoefficientSchedule, CoefficientSet, CompositeTable, ModelSource, Scenario,
        ScenarioPreset,
    };

    // Engine
    pub use windcast_engine::{
        run_batch, BatchReport, ConstraintSet, Quota, RunConfiguration, RunOutcome, RunSettings,
        SimulationError, SimulationResult, Simulator,
    };

    // Comparison
    pub use windcast_compare::DisagreementReport;

    // Storage
    pub use windcast_store::{ArtifactStore, RunKey};
}
