//! Test utilities and mock collaborators for Windcast development.
//!
//! Provides in-memory implementations of the collaborator traits
//! ([`CellSource`], [`ModelSource`], [`NeighborSource`]) and, in
//! [`fixtures`], small synthetic landscapes for engine tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use windcast_core::{CellId, CellRecord, CellSource, CoreError, PredictorConfig, Resolution, StudyArea};
use windcast_model::{CoefficientSet, ModelError, ModelSource};
use windcast_space::{NeighborSource, SpaceError};

/// Mock implementation of [`CellSource`].
///
/// Backed by a `HashMap<(StudyArea, Resolution), Vec<CellRecord>>`.
/// Unknown keys fail with [`CoreError::SourceFailed`].
#[derive(Default)]
pub struct MockCellSource {
    cells: HashMap<(StudyArea, Resolution), Vec<CellRecord>>,
}

impl MockCellSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the records of one study area and resolution.
    pub fn insert(&mut self, area: StudyArea, resolution: Resolution, records: Vec<CellRecord>) {
        self.cells.insert((area, resolution), records);
    }
}

impl CellSource for MockCellSource {
    fn cell_records(
        &self,
        area: &StudyArea,
        resolution: Resolution,
    ) -> Result<Vec<CellRecord>, CoreError> {
        self.cells
            .get(&(area.clone(), resolution))
            .cloned()
            .ok_or_else(|| CoreError::SourceFailed {
                reason: format!("no cells for {area} at {resolution}"),
            })
    }
}

/// Mock implementation of [`ModelSource`].
///
/// Keys are `(study area, resolution, configuration)`; unknown keys fail
/// with [`ModelError::MissingModel`]. Counts lookups so tests can assert
/// that a batch fetched every model up front.
#[derive(Default)]
pub struct MockModelSource {
    models: HashMap<(StudyArea, Resolution, PredictorConfig), CoefficientSet>,
    calls: AtomicUsize,
}

impl MockModelSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fitted model.
    pub fn insert(
        &mut self,
        area: StudyArea,
        resolution: Resolution,
        config: PredictorConfig,
        model: CoefficientSet,
    ) {
        self.models.insert((area, resolution, config), model);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(
        mut self,
        area: StudyArea,
        resolution: Resolution,
        config: PredictorConfig,
        model: CoefficientSet,
    ) -> Self {
        self.insert(area, resolution, config, model);
        self
    }

    /// Number of lookups so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl ModelSource for MockModelSource {
    fn fitted_model(
        &self,
        study_area: &StudyArea,
        resolution: Resolution,
        config: PredictorConfig,
    ) -> Result<CoefficientSet, ModelError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.models
            .get(&(study_area.clone(), resolution, config))
            .cloned()
            .ok_or_else(|| ModelError::MissingModel {
                study_area: study_area.clone(),
                resolution,
                config,
            })
    }
}

/// [`NeighborSource`] with hand-written adjacency, ignoring the radius.
///
/// Links are symmetric: `link(a, b)` makes each a neighbor of the other.
#[derive(Default)]
pub struct FixedNeighbors {
    links: HashMap<CellId, HashSet<CellId>>,
}

impl FixedNeighbors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `a` and `b` neighbors.
    pub fn link(mut self, a: u32, b: u32) -> Self {
        self.links.entry(CellId(a)).or_default().insert(CellId(b));
        self.links.entry(CellId(b)).or_default().insert(CellId(a));
        self
    }

    /// Register a cell with no neighbors.
    pub fn isolated(mut self, id: u32) -> Self {
        self.links.entry(CellId(id)).or_default();
        self
    }
}

impl NeighborSource for FixedNeighbors {
    fn find_neighbors(&self, cell: CellId, _radius: f64) -> Result<Vec<CellId>, SpaceError> {
        let set = self
            .links
            .get(&cell)
            .ok_or(SpaceError::UnknownCell { id: cell })?;
        let mut out: Vec<CellId> = set.iter().copied().collect();
        out.sort_unstable();
        Ok(out)
    }
}

/// [`NeighborSource`] that fails every query.
pub struct FailingNeighbors;

impl NeighborSource for FailingNeighbors {
    fn find_neighbors(&self, cell: CellId, _radius: f64) -> Result<Vec<CellId>, SpaceError> {
        Err(SpaceError::QueryFailed {
            id: cell,
            reason: "spatial store unavailable".to_string(),
        })
    }
}
